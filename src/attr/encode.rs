//! Wire encoding for attribute values.
//!
//! Layout per value: one kind byte, then the variant payload. POD lists are
//! a `u32` count followed by the contiguous element block; non-POD lists
//! (strings, plugin references, nested values) serialise element by element.

use bytes::Bytes;

use crate::codec::WriteStream;
use crate::error::{Result, WireError};

use super::types::{
    AttrAColor, AttrColor, AttrImage, AttrImageSet, AttrInstancer, AttrMapChannels, AttrMatrix,
    AttrPlugin, AttrTransform, AttrVector, AttrVector2,
};
use super::AttrValue;

impl AttrValue {
    /// Append the kind byte and variant payload.
    ///
    /// Serialising a default-constructed (`Unknown`) value is an error.
    pub fn encode(&self, out: &mut WriteStream) -> Result<()> {
        if matches!(self, AttrValue::Unknown) {
            return Err(WireError::EmptyValue);
        }
        out.write_u8(self.kind().code());
        self.encode_payload(out)
    }

    /// Encode into a standalone payload.
    pub fn encode_to_bytes(&self) -> Result<Bytes> {
        let mut out = WriteStream::new();
        self.encode(&mut out)?;
        Ok(out.into_bytes())
    }

    fn encode_payload(&self, out: &mut WriteStream) -> Result<()> {
        match self {
            AttrValue::Unknown => return Err(WireError::EmptyValue),
            AttrValue::Int(v) => out.write_i32(*v),
            AttrValue::Float(v) => out.write_f32(*v),
            AttrValue::Double(v) => out.write_f64(*v),
            AttrValue::Color(v) => write_color(out, v),
            AttrValue::AColor(v) => write_acolor(out, v),
            AttrValue::Vector(v) => write_vector(out, v),
            AttrValue::Vector2(v) => write_vector2(out, v),
            AttrValue::Matrix(v) => write_matrix(out, v),
            AttrValue::Transform(v) => write_transform(out, v),
            AttrValue::String(v) => out.write_string(v),
            AttrValue::Plugin(v) => write_plugin(out, v),
            AttrValue::ImageSet(v) => write_image_set(out, v),
            AttrValue::ListInt(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    out.write_i32(*item);
                }
            }
            AttrValue::ListFloat(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    out.write_f32(*item);
                }
            }
            AttrValue::ListColor(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    write_color(out, item);
                }
            }
            AttrValue::ListVector(v) => write_vector_list(out, v),
            AttrValue::ListVector2(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    write_vector2(out, item);
                }
            }
            AttrValue::ListMatrix(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    write_matrix(out, item);
                }
            }
            AttrValue::ListTransform(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    write_transform(out, item);
                }
            }
            AttrValue::ListString(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    out.write_string(item);
                }
            }
            AttrValue::ListPlugin(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    write_plugin(out, item);
                }
            }
            AttrValue::ListValue(v) => {
                out.write_u32(v.len() as u32);
                for item in v {
                    item.encode(out)?;
                }
            }
            AttrValue::Instancer(v) => write_instancer(out, v),
            AttrValue::MapChannels(v) => write_map_channels(out, v),
        }
        Ok(())
    }
}

fn write_color(out: &mut WriteStream, c: &AttrColor) {
    out.write_f32(c.r);
    out.write_f32(c.g);
    out.write_f32(c.b);
}

fn write_acolor(out: &mut WriteStream, c: &AttrAColor) {
    write_color(out, &c.color);
    out.write_f32(c.alpha);
}

fn write_vector(out: &mut WriteStream, v: &AttrVector) {
    out.write_f32(v.x);
    out.write_f32(v.y);
    out.write_f32(v.z);
}

fn write_vector2(out: &mut WriteStream, v: &AttrVector2) {
    out.write_f32(v.x);
    out.write_f32(v.y);
}

fn write_matrix(out: &mut WriteStream, m: &AttrMatrix) {
    write_vector(out, &m.v0);
    write_vector(out, &m.v1);
    write_vector(out, &m.v2);
}

fn write_transform(out: &mut WriteStream, t: &AttrTransform) {
    write_matrix(out, &t.matrix);
    write_vector(out, &t.offset);
}

fn write_plugin(out: &mut WriteStream, p: &AttrPlugin) {
    out.write_string(&p.plugin);
    out.write_string(&p.output);
}

fn write_vector_list(out: &mut WriteStream, items: &[AttrVector]) {
    out.write_u32(items.len() as u32);
    for item in items {
        write_vector(out, item);
    }
}

fn write_image(out: &mut WriteStream, img: &AttrImage) {
    out.write_i32(img.format.code());
    out.write_u32(img.data.len() as u32);
    out.write_i32(img.width);
    out.write_i32(img.height);
    out.write_i32(img.x);
    out.write_i32(img.y);
    out.write_bytes(&img.data);
}

fn write_image_set(out: &mut WriteStream, set: &AttrImageSet) {
    out.write_i32(set.source.code());
    out.write_u32(set.images.len() as u32);
    for (channel, image) in &set.images {
        out.write_i16(channel.code());
        write_image(out, image);
    }
}

fn write_instancer(out: &mut WriteStream, inst: &AttrInstancer) {
    out.write_f32(inst.frame);
    out.write_u32(inst.items.len() as u32);
    for item in &inst.items {
        out.write_i32(item.index);
        write_transform(out, &item.transform);
        write_transform(out, &item.velocity);
        write_plugin(out, &item.node);
    }
}

fn write_map_channels(out: &mut WriteStream, map: &AttrMapChannels) {
    out.write_u32(map.channels.len() as u32);
    for channel in &map.channels {
        out.write_string(&channel.key);
        write_vector_list(out, &channel.vertices);
        out.write_u32(channel.faces.len() as u32);
        for face in &channel.faces {
            out.write_i32(*face);
        }
        out.write_string(&channel.name);
    }
}
