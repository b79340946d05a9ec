//! Payload types carried by attribute values.
//!
//! These mirror the renderer-side parameter shapes: fixed-shape geometry
//! types, plugin references, image payloads, instancer tables and named map
//! channels. All float components are IEEE-754 32-bit.

use bytes::Bytes;

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttrColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl AttrColor {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Grey color with all components equal.
    pub fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }
}

/// RGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrAColor {
    pub color: AttrColor,
    pub alpha: f32,
}

impl AttrAColor {
    pub fn new(color: AttrColor, alpha: f32) -> Self {
        Self { color, alpha }
    }
}

impl Default for AttrAColor {
    fn default() -> Self {
        Self {
            color: AttrColor::default(),
            alpha: 1.0,
        }
    }
}

/// 3-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttrVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AttrVector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &AttrVector) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn len(&self) -> f32 {
        self.dot(self).sqrt()
    }
}

/// 2-component vector (UV coordinates and the like).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttrVector2 {
    pub x: f32,
    pub y: f32,
}

impl AttrVector2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Row-major 3x3 matrix stored as three row vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttrMatrix {
    pub v0: AttrVector,
    pub v1: AttrVector,
    pub v2: AttrVector,
}

impl AttrMatrix {
    pub fn new(v0: AttrVector, v1: AttrVector, v2: AttrVector) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn identity() -> Self {
        Self {
            v0: AttrVector::new(1.0, 0.0, 0.0),
            v1: AttrVector::new(0.0, 1.0, 0.0),
            v2: AttrVector::new(0.0, 0.0, 1.0),
        }
    }
}

/// Affine transform: rotation/scale matrix plus translation offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttrTransform {
    pub matrix: AttrMatrix,
    pub offset: AttrVector,
}

impl AttrTransform {
    pub fn new(matrix: AttrMatrix, offset: AttrVector) -> Self {
        Self { matrix, offset }
    }

    pub fn identity() -> Self {
        Self {
            matrix: AttrMatrix::identity(),
            offset: AttrVector::default(),
        }
    }
}

/// Reference to a renderer-side plugin instance.
///
/// `output` selects an output port of the referenced plugin; empty means the
/// default output. A reference with an empty `plugin` identifier is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttrPlugin {
    /// Plugin instance identifier.
    pub plugin: String,
    /// Selected output port name; empty selects the default output.
    pub output: String,
}

impl AttrPlugin {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            output: String::new(),
        }
    }

    pub fn with_output(plugin: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            output: output.into(),
        }
    }

    /// A reference is valid iff the plugin identifier is non-empty.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.plugin.is_empty()
    }
}

impl From<&str> for AttrPlugin {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Pixel format of an image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ImageFormat {
    None = 0,
    RgbaReal = 1,
    RgbReal = 2,
    BwReal = 3,
    Jpg = 4,
}

impl ImageFormat {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::RgbaReal),
            2 => Some(Self::RgbReal),
            3 => Some(Self::BwReal),
            4 => Some(Self::Jpg),
            _ => None,
        }
    }
}

/// Raw image payload: either a full frame or a bucket sub-image.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrImage {
    /// Pixel data, interpreted per `format`.
    pub data: Bytes,
    pub format: ImageFormat,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// X of the bucket's top-left corner; negative for a full frame.
    pub x: i32,
    /// Y of the bucket's top-left corner; negative for a full frame.
    pub y: i32,
}

impl AttrImage {
    /// Full-frame image (no bucket origin).
    pub fn full(data: Bytes, format: ImageFormat, width: i32, height: i32) -> Self {
        Self {
            data,
            format,
            width,
            height,
            x: -1,
            y: -1,
        }
    }

    /// Bucket sub-image with its top-left corner inside the frame.
    pub fn bucket(data: Bytes, format: ImageFormat, width: i32, height: i32, x: i32, y: i32) -> Self {
        Self {
            data,
            format,
            width,
            height,
            x,
            y,
        }
    }

    /// Whether this image is a bucket sub-image rather than a full frame.
    #[inline]
    pub fn is_bucket(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

/// Why an image set was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ImageSourceType {
    Invalid = 0,
    RtImageUpdate = 1,
    ImageReady = 2,
    BucketImageReady = 3,
}

impl ImageSourceType {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Invalid),
            1 => Some(Self::RtImageUpdate),
            2 => Some(Self::ImageReady),
            3 => Some(Self::BucketImageReady),
            _ => None,
        }
    }
}

/// Render-element channel code.
///
/// A 16-bit code identifying an output layer (beauty, diffuse, depth, ...).
/// The set grows server-side over time, so unknown codes are carried through
/// rather than rejected; the named constants cover the established set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderChannel(i16);

impl RenderChannel {
    pub const NONE: Self = Self(-1);

    // Fragment buffer channels.
    pub const FRAG_COLOR: Self = Self(1);
    pub const FRAG_TRANSP: Self = Self(2);
    pub const FRAG_REALTRANSP: Self = Self(3);
    pub const FRAG_BACKGROUND: Self = Self(4);
    pub const FRAG_ZBUF: Self = Self(5);
    pub const FRAG_RENDER_ID: Self = Self(6);
    pub const FRAG_NORMAL: Self = Self(7);
    pub const FRAG_ALPHATRANSP: Self = Self(8);
    pub const FRAG_EXTRA_AA: Self = Self(9);
    pub const FRAG_WEIGHT: Self = Self(10);
    pub const FRAG_LAST: Self = Self(11);

    // Frame buffer channels start at 100.
    pub const ATMOSPHERE: Self = Self(100);
    pub const DIFFUSE: Self = Self(101);
    pub const REFLECT: Self = Self(102);
    pub const REFRACT: Self = Self(103);
    pub const SELF_ILLUM: Self = Self(104);
    pub const SHADOW: Self = Self(105);
    pub const SPECULAR: Self = Self(106);
    pub const LIGHTING: Self = Self(107);
    pub const GI: Self = Self(108);
    pub const CAUSTICS: Self = Self(109);
    pub const RAW_GI: Self = Self(110);
    pub const RAW_LIGHT: Self = Self(111);
    pub const RAW_SHADOW: Self = Self(112);
    pub const VELOCITY: Self = Self(113);
    pub const RENDER_ID: Self = Self(114);
    pub const MTL_ID: Self = Self(115);
    pub const NODE_ID: Self = Self(116);
    pub const Z_DEPTH: Self = Self(117);
    pub const REFLECTION_FILTER: Self = Self(118);
    pub const RAW_REFLECTION: Self = Self(119);
    pub const REFRACTION_FILTER: Self = Self(120);
    pub const RAW_REFRACTION: Self = Self(121);
    pub const REAL_COLOR: Self = Self(122);
    pub const NORMAL: Self = Self(123);
    pub const BACKGROUND: Self = Self(124);
    pub const ALPHA: Self = Self(125);
    pub const COLOR: Self = Self(126);
    pub const WIRE_COLOR: Self = Self(127);
    pub const MATTE_SHADOW: Self = Self(128);
    pub const TOTAL_LIGHT: Self = Self(129);
    pub const RAW_TOTAL_LIGHT: Self = Self(130);
    pub const BUMP_NORMAL: Self = Self(131);
    pub const SAMPLE_RATE: Self = Self(132);
    pub const SSS2: Self = Self(133);
    pub const DR_BUCKET: Self = Self(134);
    pub const REFLECT_GLOSS: Self = Self(135);
    pub const REFLECT_HI_GLOSS: Self = Self(136);
    pub const REFRACT_GLOSS: Self = Self(137);
    pub const SHADEMAP_EXPORT: Self = Self(138);
    pub const REFLECT_ALPHA: Self = Self(139);
    pub const REFLECT_IOR: Self = Self(140);
    pub const MTL_RENDER_ID: Self = Self(141);
    pub const NOISE_LEVEL: Self = Self(142);
    pub const WORLD_POSITION: Self = Self(143);
    pub const DENOISED: Self = Self(144);
    pub const WORLD_BUMP_NORMAL: Self = Self(145);
    pub const DEFOCUS_AMOUNT: Self = Self(146);

    #[inline]
    pub fn from_code(code: i16) -> Self {
        Self(code)
    }

    #[inline]
    pub fn code(self) -> i16 {
        self.0
    }
}

/// A set of rendered channels delivered together.
///
/// Entries keep insertion order so serialisation is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrImageSet {
    pub source: ImageSourceType,
    pub images: Vec<(RenderChannel, AttrImage)>,
}

impl AttrImageSet {
    pub fn new(source: ImageSourceType) -> Self {
        Self {
            source,
            images: Vec::new(),
        }
    }

    /// Append a channel image.
    pub fn insert(&mut self, channel: RenderChannel, image: AttrImage) {
        self.images.push((channel, image));
    }

    /// Look up the first image for a channel.
    pub fn get(&self, channel: RenderChannel) -> Option<&AttrImage> {
        self.images
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, img)| img)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// One instanced copy inside an [`AttrInstancer`] table.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancerItem {
    pub index: i32,
    pub transform: AttrTransform,
    pub velocity: AttrTransform,
    pub node: AttrPlugin,
}

/// Table of instanced geometry copies for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrInstancer {
    /// Frame the table samples; fractional for sub-frame motion sampling.
    pub frame: f32,
    pub items: Vec<InstancerItem>,
}

/// One named map channel: per-vertex data plus face indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMapChannel {
    pub key: String,
    pub vertices: Vec<AttrVector>,
    pub faces: Vec<i32>,
    pub name: String,
}

/// Named map channels of a mesh (UV sets, vertex colors, ...).
///
/// Channels keep insertion order so serialisation is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMapChannels {
    pub channels: Vec<AttrMapChannel>,
}

impl AttrMapChannels {
    /// Look up a channel by its key.
    pub fn get(&self, key: &str) -> Option<&AttrMapChannel> {
        self.channels.iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_validity() {
        assert!(AttrPlugin::new("teapot_01").is_valid());
        assert!(AttrPlugin::with_output("node", "out").is_valid());
        assert!(!AttrPlugin::default().is_valid());
        assert!(!AttrPlugin::new("").is_valid());
    }

    #[test]
    fn test_image_bucket_detection() {
        let full = AttrImage::full(Bytes::new(), ImageFormat::Jpg, 640, 480);
        assert!(!full.is_bucket());

        let bucket = AttrImage::bucket(Bytes::new(), ImageFormat::RgbaReal, 32, 32, 0, 64);
        assert!(bucket.is_bucket());

        // one negative coordinate keeps it a full frame
        let half = AttrImage::bucket(Bytes::new(), ImageFormat::RgbaReal, 32, 32, 5, -1);
        assert!(!half.is_bucket());
    }

    #[test]
    fn test_transform_identity() {
        let t = AttrTransform::identity();
        assert_eq!(t.matrix.v0, AttrVector::new(1.0, 0.0, 0.0));
        assert_eq!(t.matrix.v1, AttrVector::new(0.0, 1.0, 0.0));
        assert_eq!(t.matrix.v2, AttrVector::new(0.0, 0.0, 1.0));
        assert_eq!(t.offset, AttrVector::default());
    }

    #[test]
    fn test_render_channel_codes() {
        assert_eq!(RenderChannel::NONE.code(), -1);
        assert_eq!(RenderChannel::ATMOSPHERE.code(), 100);
        assert_eq!(RenderChannel::DEFOCUS_AMOUNT.code(), 146);
        // unknown codes carry through untouched
        assert_eq!(RenderChannel::from_code(999).code(), 999);
    }

    #[test]
    fn test_image_set_lookup() {
        let mut set = AttrImageSet::new(ImageSourceType::RtImageUpdate);
        set.insert(
            RenderChannel::COLOR,
            AttrImage::full(Bytes::from_static(&[1, 2, 3]), ImageFormat::RgbReal, 1, 1),
        );
        assert_eq!(set.len(), 1);
        assert!(set.get(RenderChannel::COLOR).is_some());
        assert!(set.get(RenderChannel::ALPHA).is_none());
    }

    #[test]
    fn test_map_channels_lookup() {
        let mut channels = AttrMapChannels::default();
        channels.channels.push(AttrMapChannel {
            key: "uv".into(),
            vertices: vec![AttrVector::new(0.0, 1.0, 0.0)],
            faces: vec![0, 0, 0],
            name: "UVMap".into(),
        });
        assert!(channels.get("uv").is_some());
        assert!(channels.get("missing").is_none());
    }

    #[test]
    fn test_format_codes_roundtrip() {
        for code in 0..=4 {
            let fmt = ImageFormat::from_code(code).unwrap();
            assert_eq!(fmt.code(), code);
        }
        assert!(ImageFormat::from_code(5).is_none());
        assert!(ImageSourceType::from_code(4).is_none());
    }
}
