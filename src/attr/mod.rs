//! Attribute values - the tagged union every parameter travels as.
//!
//! [`AttrValue`] is a closed sum type over the supported value kinds. The
//! discriminant and the storage can never disagree: constructing a variant
//! fixes its [`ValueKind`], and reading the wrong variant is impossible by
//! construction (checked accessors return `None` instead).
//!
//! The on-wire encoding is one kind byte followed by the variant payload;
//! see [`encode`]/[`decode`] submodules for the exact layout.
//!
//! # Example
//!
//! ```
//! use renderwire::attr::{AttrValue, ValueKind};
//!
//! let v = AttrValue::from(0.7854_f32);
//! assert_eq!(v.kind(), ValueKind::Float);
//! assert_eq!(v.as_float(), Some(0.7854));
//! assert_eq!(v.as_int(), None);
//! ```

mod decode;
mod encode;
mod types;

pub use decode::MAX_VALUE_DEPTH;
pub use types::{
    AttrAColor, AttrColor, AttrImage, AttrImageSet, AttrInstancer, AttrMapChannel,
    AttrMapChannels, AttrMatrix, AttrPlugin, AttrTransform, AttrVector, AttrVector2,
    ImageFormat, ImageSourceType, InstancerItem, RenderChannel,
};

use crate::error::{Result, WireError};

/// Wire code of every value kind.
///
/// The numeric assignment is load-bearing: peers across versions agree on
/// these codes, including the reserved slot 13 a historical generic list
/// kind occupied. Never renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    Unknown = 0,
    Int = 1,
    Float = 2,
    Double = 3,
    Color = 4,
    AColor = 5,
    Vector = 6,
    Vector2 = 7,
    Matrix = 8,
    Transform = 9,
    String = 10,
    Plugin = 11,
    ImageSet = 12,
    // 13 reserved
    ListInt = 14,
    ListFloat = 15,
    ListColor = 16,
    ListVector = 17,
    ListVector2 = 18,
    ListMatrix = 19,
    ListTransform = 20,
    ListString = 21,
    ListPlugin = 22,
    ListValue = 23,
    Instancer = 24,
    MapChannels = 25,
}

impl ValueKind {
    /// The single byte written on the wire for this kind.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a wire byte back to a kind; unknown codes are a hard parse error.
    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Unknown,
            1 => Self::Int,
            2 => Self::Float,
            3 => Self::Double,
            4 => Self::Color,
            5 => Self::AColor,
            6 => Self::Vector,
            7 => Self::Vector2,
            8 => Self::Matrix,
            9 => Self::Transform,
            10 => Self::String,
            11 => Self::Plugin,
            12 => Self::ImageSet,
            14 => Self::ListInt,
            15 => Self::ListFloat,
            16 => Self::ListColor,
            17 => Self::ListVector,
            18 => Self::ListVector2,
            19 => Self::ListMatrix,
            20 => Self::ListTransform,
            21 => Self::ListString,
            22 => Self::ListPlugin,
            23 => Self::ListValue,
            24 => Self::Instancer,
            25 => Self::MapChannels,
            other => return Err(WireError::UnknownKind(other)),
        })
    }

    /// Stable human-readable label for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Color => "Color",
            Self::AColor => "AColor",
            Self::Vector => "Vector",
            Self::Vector2 => "Vector2",
            Self::Matrix => "Matrix",
            Self::Transform => "Transform",
            Self::String => "String",
            Self::Plugin => "Plugin",
            Self::ImageSet => "ImageSet",
            Self::ListInt => "ListInt",
            Self::ListFloat => "ListFloat",
            Self::ListColor => "ListColor",
            Self::ListVector => "ListVector",
            Self::ListVector2 => "ListVector2",
            Self::ListMatrix => "ListMatrix",
            Self::ListTransform => "ListTransform",
            Self::ListString => "ListString",
            Self::ListPlugin => "ListPlugin",
            Self::ListValue => "ListValue",
            Self::Instancer => "Instancer",
            Self::MapChannels => "MapChannels",
        }
    }
}

/// Any parameter value the protocol can carry.
///
/// Booleans travel as `Int` 0/1; there is no separate Bool kind on the wire.
/// A default-constructed value is `Unknown` and cannot be serialised.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    #[default]
    Unknown,
    Int(i32),
    Float(f32),
    Double(f64),
    Color(AttrColor),
    AColor(AttrAColor),
    Vector(AttrVector),
    Vector2(AttrVector2),
    Matrix(AttrMatrix),
    Transform(AttrTransform),
    String(String),
    Plugin(AttrPlugin),
    ImageSet(AttrImageSet),
    ListInt(Vec<i32>),
    ListFloat(Vec<f32>),
    ListColor(Vec<AttrColor>),
    ListVector(Vec<AttrVector>),
    ListVector2(Vec<AttrVector2>),
    ListMatrix(Vec<AttrMatrix>),
    ListTransform(Vec<AttrTransform>),
    ListString(Vec<String>),
    ListPlugin(Vec<AttrPlugin>),
    ListValue(Vec<AttrValue>),
    Instancer(AttrInstancer),
    MapChannels(AttrMapChannels),
}

impl AttrValue {
    /// The kind matching the active variant.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Unknown => ValueKind::Unknown,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Color(_) => ValueKind::Color,
            Self::AColor(_) => ValueKind::AColor,
            Self::Vector(_) => ValueKind::Vector,
            Self::Vector2(_) => ValueKind::Vector2,
            Self::Matrix(_) => ValueKind::Matrix,
            Self::Transform(_) => ValueKind::Transform,
            Self::String(_) => ValueKind::String,
            Self::Plugin(_) => ValueKind::Plugin,
            Self::ImageSet(_) => ValueKind::ImageSet,
            Self::ListInt(_) => ValueKind::ListInt,
            Self::ListFloat(_) => ValueKind::ListFloat,
            Self::ListColor(_) => ValueKind::ListColor,
            Self::ListVector(_) => ValueKind::ListVector,
            Self::ListVector2(_) => ValueKind::ListVector2,
            Self::ListMatrix(_) => ValueKind::ListMatrix,
            Self::ListTransform(_) => ValueKind::ListTransform,
            Self::ListString(_) => ValueKind::ListString,
            Self::ListPlugin(_) => ValueKind::ListPlugin,
            Self::ListValue(_) => ValueKind::ListValue,
            Self::Instancer(_) => ValueKind::Instancer,
            Self::MapChannels(_) => ValueKind::MapChannels,
        }
    }

    /// Stable label of the active kind for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether this value may be serialised and used.
    ///
    /// `Unknown` is invalid, and a `Plugin` reference with an empty
    /// identifier is invalid; everything else is valid.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Unknown => false,
            Self::Plugin(p) => p.is_valid(),
            _ => true,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_plugin(&self) -> Option<&AttrPlugin> {
        match self {
            Self::Plugin(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_image_set(&self) -> Option<&AttrImageSet> {
        match self {
            Self::ImageSet(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_int(&self) -> Option<&[i32]> {
        match self {
            Self::ListInt(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_float(&self) -> Option<&[f32]> {
        match self {
            Self::ListFloat(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_value(&self) -> Option<&[AttrValue]> {
        match self {
            Self::ListValue(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

// Booleans are carried as Int 0/1.
impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Int(v as i32)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<AttrColor> for AttrValue {
    fn from(v: AttrColor) -> Self {
        Self::Color(v)
    }
}

impl From<AttrAColor> for AttrValue {
    fn from(v: AttrAColor) -> Self {
        Self::AColor(v)
    }
}

impl From<AttrVector> for AttrValue {
    fn from(v: AttrVector) -> Self {
        Self::Vector(v)
    }
}

impl From<AttrVector2> for AttrValue {
    fn from(v: AttrVector2) -> Self {
        Self::Vector2(v)
    }
}

impl From<AttrMatrix> for AttrValue {
    fn from(v: AttrMatrix) -> Self {
        Self::Matrix(v)
    }
}

impl From<AttrTransform> for AttrValue {
    fn from(v: AttrTransform) -> Self {
        Self::Transform(v)
    }
}

impl From<AttrPlugin> for AttrValue {
    fn from(v: AttrPlugin) -> Self {
        Self::Plugin(v)
    }
}

impl From<AttrImageSet> for AttrValue {
    fn from(v: AttrImageSet) -> Self {
        Self::ImageSet(v)
    }
}

impl From<AttrInstancer> for AttrValue {
    fn from(v: AttrInstancer) -> Self {
        Self::Instancer(v)
    }
}

impl From<AttrMapChannels> for AttrValue {
    fn from(v: AttrMapChannels) -> Self {
        Self::MapChannels(v)
    }
}

impl From<Vec<i32>> for AttrValue {
    fn from(v: Vec<i32>) -> Self {
        Self::ListInt(v)
    }
}

impl From<Vec<f32>> for AttrValue {
    fn from(v: Vec<f32>) -> Self {
        Self::ListFloat(v)
    }
}

impl From<Vec<AttrColor>> for AttrValue {
    fn from(v: Vec<AttrColor>) -> Self {
        Self::ListColor(v)
    }
}

impl From<Vec<AttrVector>> for AttrValue {
    fn from(v: Vec<AttrVector>) -> Self {
        Self::ListVector(v)
    }
}

impl From<Vec<AttrVector2>> for AttrValue {
    fn from(v: Vec<AttrVector2>) -> Self {
        Self::ListVector2(v)
    }
}

impl From<Vec<AttrMatrix>> for AttrValue {
    fn from(v: Vec<AttrMatrix>) -> Self {
        Self::ListMatrix(v)
    }
}

impl From<Vec<AttrTransform>> for AttrValue {
    fn from(v: Vec<AttrTransform>) -> Self {
        Self::ListTransform(v)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(v: Vec<String>) -> Self {
        Self::ListString(v)
    }
}

impl From<Vec<AttrPlugin>> for AttrValue {
    fn from(v: Vec<AttrPlugin>) -> Self {
        Self::ListPlugin(v)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(v: Vec<AttrValue>) -> Self {
        Self::ListValue(v)
    }
}
