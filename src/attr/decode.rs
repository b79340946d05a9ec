//! Wire decoding for attribute values.
//!
//! The decoder is recursive because `ListValue` elements are themselves full
//! values. Recursion depth is bounded by [`MAX_VALUE_DEPTH`] so adversarial
//! payloads cannot overflow the stack; exceeding the bound is a parse error
//! like any other malformed frame.

use crate::codec::ReadStream;
use crate::error::{Result, WireError};

use super::types::{
    AttrAColor, AttrColor, AttrImage, AttrImageSet, AttrInstancer, AttrMapChannel,
    AttrMapChannels, AttrMatrix, AttrPlugin, AttrTransform, AttrVector, AttrVector2, ImageFormat,
    ImageSourceType, InstancerItem, RenderChannel,
};
use super::{AttrValue, ValueKind};

/// Maximum nesting depth of `ListValue` payloads the decoder accepts.
pub const MAX_VALUE_DEPTH: usize = 64;

// Wire sizes of the fixed-width list element kinds, used to validate a list
// count against the remaining input before allocating.
const INT_SIZE: usize = 4;
const FLOAT_SIZE: usize = 4;
const COLOR_SIZE: usize = 12;
const VECTOR_SIZE: usize = 12;
const VECTOR2_SIZE: usize = 8;
const MATRIX_SIZE: usize = 36;
const TRANSFORM_SIZE: usize = 48;

impl AttrValue {
    /// Consume one kind byte plus payload from the stream.
    pub fn decode(input: &mut ReadStream<'_>) -> Result<AttrValue> {
        decode_value(input, 0)
    }

    /// Decode a standalone payload, requiring it to be fully consumed.
    pub fn decode_from_slice(payload: &[u8]) -> Result<AttrValue> {
        let mut input = ReadStream::new(payload);
        let value = AttrValue::decode(&mut input)?;
        if input.has_more() {
            return Err(WireError::MalformedMessage("trailing bytes after value"));
        }
        Ok(value)
    }
}

fn decode_value(input: &mut ReadStream<'_>, depth: usize) -> Result<AttrValue> {
    if depth >= MAX_VALUE_DEPTH {
        return Err(WireError::DepthExceeded(MAX_VALUE_DEPTH));
    }

    let kind = ValueKind::from_code(input.read_u8()?)?;
    Ok(match kind {
        ValueKind::Unknown => return Err(WireError::EmptyValue),
        ValueKind::Int => AttrValue::Int(input.read_i32()?),
        ValueKind::Float => AttrValue::Float(input.read_f32()?),
        ValueKind::Double => AttrValue::Double(input.read_f64()?),
        ValueKind::Color => AttrValue::Color(read_color(input)?),
        ValueKind::AColor => AttrValue::AColor(read_acolor(input)?),
        ValueKind::Vector => AttrValue::Vector(read_vector(input)?),
        ValueKind::Vector2 => AttrValue::Vector2(read_vector2(input)?),
        ValueKind::Matrix => AttrValue::Matrix(read_matrix(input)?),
        ValueKind::Transform => AttrValue::Transform(read_transform(input)?),
        ValueKind::String => AttrValue::String(input.read_string()?),
        ValueKind::Plugin => AttrValue::Plugin(read_plugin(input)?),
        ValueKind::ImageSet => AttrValue::ImageSet(read_image_set(input)?),
        ValueKind::ListInt => AttrValue::ListInt(read_pod_list(input, INT_SIZE, |i| i.read_i32())?),
        ValueKind::ListFloat => {
            AttrValue::ListFloat(read_pod_list(input, FLOAT_SIZE, |i| i.read_f32())?)
        }
        ValueKind::ListColor => AttrValue::ListColor(read_pod_list(input, COLOR_SIZE, read_color)?),
        ValueKind::ListVector => {
            AttrValue::ListVector(read_pod_list(input, VECTOR_SIZE, read_vector)?)
        }
        ValueKind::ListVector2 => {
            AttrValue::ListVector2(read_pod_list(input, VECTOR2_SIZE, read_vector2)?)
        }
        ValueKind::ListMatrix => {
            AttrValue::ListMatrix(read_pod_list(input, MATRIX_SIZE, read_matrix)?)
        }
        ValueKind::ListTransform => {
            AttrValue::ListTransform(read_pod_list(input, TRANSFORM_SIZE, read_transform)?)
        }
        ValueKind::ListString => {
            let count = input.read_u32()? as usize;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(input.read_string()?);
            }
            AttrValue::ListString(items)
        }
        ValueKind::ListPlugin => {
            let count = input.read_u32()? as usize;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(read_plugin(input)?);
            }
            AttrValue::ListPlugin(items)
        }
        ValueKind::ListValue => {
            let count = input.read_u32()? as usize;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(decode_value(input, depth + 1)?);
            }
            AttrValue::ListValue(items)
        }
        ValueKind::Instancer => AttrValue::Instancer(read_instancer(input)?),
        ValueKind::MapChannels => AttrValue::MapChannels(read_map_channels(input)?),
    })
}

/// Read a `u32`-counted list of fixed-width elements.
///
/// The count is validated against the remaining input before any allocation
/// so a forged count cannot trigger a huge reservation.
fn read_pod_list<T>(
    input: &mut ReadStream<'_>,
    elem_size: usize,
    mut read: impl FnMut(&mut ReadStream<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let count = input.read_u32()? as usize;
    let needed = count
        .checked_mul(elem_size)
        .ok_or(WireError::MalformedMessage("list count overflow"))?;
    if needed > input.remaining() {
        return Err(WireError::Truncated {
            needed,
            available: input.remaining(),
        });
    }

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read(input)?);
    }
    Ok(items)
}

fn read_color(input: &mut ReadStream<'_>) -> Result<AttrColor> {
    Ok(AttrColor {
        r: input.read_f32()?,
        g: input.read_f32()?,
        b: input.read_f32()?,
    })
}

fn read_acolor(input: &mut ReadStream<'_>) -> Result<AttrAColor> {
    Ok(AttrAColor {
        color: read_color(input)?,
        alpha: input.read_f32()?,
    })
}

fn read_vector(input: &mut ReadStream<'_>) -> Result<AttrVector> {
    Ok(AttrVector {
        x: input.read_f32()?,
        y: input.read_f32()?,
        z: input.read_f32()?,
    })
}

fn read_vector2(input: &mut ReadStream<'_>) -> Result<AttrVector2> {
    Ok(AttrVector2 {
        x: input.read_f32()?,
        y: input.read_f32()?,
    })
}

fn read_matrix(input: &mut ReadStream<'_>) -> Result<AttrMatrix> {
    Ok(AttrMatrix {
        v0: read_vector(input)?,
        v1: read_vector(input)?,
        v2: read_vector(input)?,
    })
}

fn read_transform(input: &mut ReadStream<'_>) -> Result<AttrTransform> {
    Ok(AttrTransform {
        matrix: read_matrix(input)?,
        offset: read_vector(input)?,
    })
}

fn read_plugin(input: &mut ReadStream<'_>) -> Result<AttrPlugin> {
    Ok(AttrPlugin {
        plugin: input.read_string()?,
        output: input.read_string()?,
    })
}

fn read_image(input: &mut ReadStream<'_>) -> Result<AttrImage> {
    let format_code = input.read_i32()?;
    let format =
        ImageFormat::from_code(format_code).ok_or(WireError::UnknownImageFormat(format_code))?;
    let size = input.read_u32()? as usize;
    let width = input.read_i32()?;
    let height = input.read_i32()?;
    let x = input.read_i32()?;
    let y = input.read_i32()?;
    let data = input.read_bytes(size)?;
    Ok(AttrImage {
        data,
        format,
        width,
        height,
        x,
        y,
    })
}

fn read_image_set(input: &mut ReadStream<'_>) -> Result<AttrImageSet> {
    let source_code = input.read_i32()?;
    let source = ImageSourceType::from_code(source_code)
        .ok_or(WireError::UnknownImageSource(source_code))?;
    let count = input.read_u32()? as usize;

    let mut set = AttrImageSet::new(source);
    for _ in 0..count {
        let channel = RenderChannel::from_code(input.read_i16()?);
        set.insert(channel, read_image(input)?);
    }
    Ok(set)
}

fn read_instancer(input: &mut ReadStream<'_>) -> Result<AttrInstancer> {
    let frame = input.read_f32()?;
    let count = input.read_u32()? as usize;

    let mut items = Vec::new();
    for _ in 0..count {
        items.push(InstancerItem {
            index: input.read_i32()?,
            transform: read_transform(input)?,
            velocity: read_transform(input)?,
            node: read_plugin(input)?,
        });
    }
    Ok(AttrInstancer { frame, items })
}

fn read_map_channels(input: &mut ReadStream<'_>) -> Result<AttrMapChannels> {
    let count = input.read_u32()? as usize;

    let mut channels = Vec::new();
    for _ in 0..count {
        let key = input.read_string()?;
        let vertices = read_pod_list(input, VECTOR_SIZE, read_vector)?;
        let faces = read_pod_list(input, INT_SIZE, |i| i.read_i32())?;
        let name = input.read_string()?;
        channels.push(AttrMapChannel {
            key,
            vertices,
            faces,
            name,
        });
    }
    Ok(AttrMapChannels { channels })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::codec::WriteStream;

    fn roundtrip(value: AttrValue) {
        let encoded = value.encode_to_bytes().unwrap();
        let decoded = AttrValue::decode_from_slice(&encoded).unwrap();
        assert_eq!(decoded, value);

        // re-encoding the decoded value reproduces the payload bytes exactly
        let reencoded = decoded.encode_to_bytes().unwrap();
        assert_eq!(reencoded, encoded);
    }

    #[test]
    fn test_roundtrip_scalars() {
        roundtrip(AttrValue::Int(-42));
        roundtrip(AttrValue::Float(0.7854));
        roundtrip(AttrValue::Double(-2.5e10));
        roundtrip(AttrValue::String("GeomMeshFile".into()));
        roundtrip(AttrValue::String(String::new()));
    }

    #[test]
    fn test_roundtrip_geometry() {
        roundtrip(AttrValue::Color(AttrColor::new(0.1, 0.2, 0.3)));
        roundtrip(AttrValue::AColor(AttrAColor::new(
            AttrColor::new(1.0, 0.5, 0.25),
            0.8,
        )));
        roundtrip(AttrValue::Vector(AttrVector::new(1.0, -2.0, 3.0)));
        roundtrip(AttrValue::Vector2(AttrVector2::new(0.5, 0.25)));
        roundtrip(AttrValue::Matrix(AttrMatrix::identity()));
        roundtrip(AttrValue::Transform(AttrTransform::new(
            AttrMatrix::identity(),
            AttrVector::new(10.0, 20.0, 30.0),
        )));
    }

    #[test]
    fn test_roundtrip_plugin() {
        roundtrip(AttrValue::Plugin(AttrPlugin::new("cam_01")));
        roundtrip(AttrValue::Plugin(AttrPlugin::with_output(
            "texture_01",
            "out_alpha",
        )));
    }

    #[test]
    fn test_roundtrip_pod_lists() {
        roundtrip(AttrValue::ListInt(vec![1, -2, 3]));
        roundtrip(AttrValue::ListInt(Vec::new()));
        roundtrip(AttrValue::ListFloat(vec![0.5, 1.5]));
        roundtrip(AttrValue::ListColor(vec![
            AttrColor::new(1.0, 0.0, 0.0),
            AttrColor::new(0.0, 1.0, 0.0),
        ]));
        roundtrip(AttrValue::ListVector(vec![AttrVector::new(1.0, 2.0, 3.0)]));
        roundtrip(AttrValue::ListVector2(vec![AttrVector2::new(0.0, 1.0)]));
        roundtrip(AttrValue::ListMatrix(vec![AttrMatrix::identity()]));
        roundtrip(AttrValue::ListTransform(vec![AttrTransform::identity()]));
    }

    #[test]
    fn test_roundtrip_nonpod_lists() {
        roundtrip(AttrValue::ListString(vec!["a".into(), String::new(), "c".into()]));
        roundtrip(AttrValue::ListPlugin(vec![
            AttrPlugin::new("n1"),
            AttrPlugin::with_output("n2", "out"),
        ]));
        roundtrip(AttrValue::ListValue(vec![
            AttrValue::Int(1),
            AttrValue::String("mixed".into()),
            AttrValue::ListValue(vec![AttrValue::Float(2.0)]),
        ]));
    }

    #[test]
    fn test_roundtrip_image_set() {
        let mut set = AttrImageSet::new(ImageSourceType::BucketImageReady);
        set.insert(
            RenderChannel::COLOR,
            AttrImage::bucket(
                Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]),
                ImageFormat::Jpg,
                2,
                2,
                16,
                32,
            ),
        );
        set.insert(
            RenderChannel::Z_DEPTH,
            AttrImage::full(Bytes::new(), ImageFormat::BwReal, 0, 0),
        );
        roundtrip(AttrValue::ImageSet(set));
    }

    #[test]
    fn test_roundtrip_instancer() {
        roundtrip(AttrValue::Instancer(AttrInstancer {
            frame: 12.5,
            items: vec![InstancerItem {
                index: 7,
                transform: AttrTransform::identity(),
                velocity: AttrTransform::default(),
                node: AttrPlugin::new("tree_proto"),
            }],
        }));
    }

    #[test]
    fn test_roundtrip_map_channels() {
        roundtrip(AttrValue::MapChannels(AttrMapChannels {
            channels: vec![AttrMapChannel {
                key: "0".into(),
                vertices: vec![AttrVector::new(0.0, 0.0, 0.0), AttrVector::new(1.0, 1.0, 0.0)],
                faces: vec![0, 1, 1],
                name: "UVMap".into(),
            }],
        }));
    }

    #[test]
    fn test_float_value_layout() {
        // kind byte 2, then the f32 little-endian
        let encoded = AttrValue::Float(0.7854).encode_to_bytes().unwrap();
        let mut expected = vec![2u8];
        expected.extend_from_slice(&0.7854_f32.to_le_bytes());
        assert_eq!(&encoded[..], &expected[..]);
    }

    #[test]
    fn test_list_int_uses_code_14() {
        let encoded = AttrValue::ListInt(vec![5]).encode_to_bytes().unwrap();
        assert_eq!(encoded[0], 14);
    }

    #[test]
    fn test_unknown_value_not_serialisable() {
        assert!(matches!(
            AttrValue::Unknown.encode_to_bytes(),
            Err(WireError::EmptyValue)
        ));
    }

    #[test]
    fn test_unknown_kind_code_is_parse_error() {
        assert!(matches!(
            AttrValue::decode_from_slice(&[13, 0, 0, 0, 0]),
            Err(WireError::UnknownKind(13))
        ));
        assert!(matches!(
            AttrValue::decode_from_slice(&[200]),
            Err(WireError::UnknownKind(200))
        ));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        // Float kind with only two payload bytes
        assert!(matches!(
            AttrValue::decode_from_slice(&[2, 0, 0]),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn test_forged_list_count_rejected_without_allocation() {
        // ListInt claiming u32::MAX elements with a four-byte body
        let mut out = WriteStream::new();
        out.write_u8(ValueKind::ListInt.code());
        out.write_u32(u32::MAX);
        out.write_i32(1);
        assert!(matches!(
            AttrValue::decode_from_slice(out.as_slice()),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn test_nesting_depth_bound() {
        // 100 nested single-element ListValue headers, never terminated
        let mut payload = Vec::new();
        for _ in 0..100 {
            payload.push(ValueKind::ListValue.code());
            payload.extend_from_slice(&1u32.to_le_bytes());
        }
        payload.push(ValueKind::Int.code());
        payload.extend_from_slice(&1i32.to_le_bytes());

        assert!(matches!(
            AttrValue::decode_from_slice(&payload),
            Err(WireError::DepthExceeded(MAX_VALUE_DEPTH))
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut encoded = AttrValue::Int(1).encode_to_bytes().unwrap().to_vec();
        encoded.push(0xFF);
        assert!(matches!(
            AttrValue::decode_from_slice(&encoded),
            Err(WireError::MalformedMessage(_))
        ));
    }
}
