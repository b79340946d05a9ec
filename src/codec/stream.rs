//! Primitive little-endian stream codec.
//!
//! The wire format is a flat sequence of little-endian fields with no
//! alignment or padding. Strings carry a `u32` length prefix and no
//! terminator.
//!
//! # Example
//!
//! ```
//! use renderwire::codec::{ReadStream, WriteStream};
//!
//! let mut out = WriteStream::new();
//! out.write_i32(1920);
//! out.write_string("fov");
//!
//! let mut input = ReadStream::new(out.as_slice());
//! assert_eq!(input.read_i32().unwrap(), 1920);
//! assert_eq!(input.read_string().unwrap(), "fov");
//! assert!(!input.has_more());
//! ```

use bytes::Bytes;

use crate::error::{Result, WireError};

/// Append-only output buffer for building wire payloads.
#[derive(Debug, Default)]
pub struct WriteStream {
    buf: Vec<u8>,
}

impl WriteStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an empty stream with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the stream into an immutable payload.
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }

    /// Append raw bytes verbatim.
    #[inline]
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a `u32` length prefix followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }
}

/// Bounded cursor over an immutable byte span.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`WireError::Truncated`] and leaves the cursor where it was, so a parser
/// can report the failure without corrupting later diagnostics.
#[derive(Debug)]
pub struct ReadStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ReadStream<'a> {
    /// Wrap a byte span; the cursor starts at the first byte.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left between the cursor and the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether any unconsumed bytes remain.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Current cursor offset from the start of the span.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reset the cursor to the start of the span.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Advance the cursor by `count` bytes if they are available.
    pub fn forward(&mut self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(WireError::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        self.pos += count;
        Ok(())
    }

    /// Consume exactly `count` bytes and return them as a sub-slice.
    pub fn read_exact(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(WireError::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Consume `count` bytes into an owned payload.
    pub fn read_bytes(&mut self, count: usize) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(self.read_exact(count)?))
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.read_exact(1)?;
        Ok(b[0])
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        let b = self.read_exact(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.read_exact(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_exact(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        let b = self.read_exact(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        let b = self.read_exact(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Consume a `u32` length prefix and that many UTF-8 bytes.
    ///
    /// The length prefix is only consumed if the full string body is also
    /// available, keeping the whole read atomic.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        match self.read_exact(len) {
            Ok(body) => Ok(String::from_utf8(body.to_vec())?),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_roundtrip() {
        let mut out = WriteStream::new();
        out.write_u8(0xAB);
        out.write_i16(-2);
        out.write_i32(-7);
        out.write_u32(0xDEADBEEF);
        out.write_f32(0.25);
        out.write_f64(-1.5);

        let mut input = ReadStream::new(out.as_slice());
        assert_eq!(input.read_u8().unwrap(), 0xAB);
        assert_eq!(input.read_i16().unwrap(), -2);
        assert_eq!(input.read_i32().unwrap(), -7);
        assert_eq!(input.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(input.read_f32().unwrap(), 0.25);
        assert_eq!(input.read_f64().unwrap(), -1.5);
        assert!(!input.has_more());
    }

    #[test]
    fn test_little_endian_byte_order() {
        let mut out = WriteStream::new();
        out.write_i32(0x01020304);
        assert_eq!(out.as_slice(), &[0x04, 0x03, 0x02, 0x01]);

        let mut out = WriteStream::new();
        out.write_i16(0x0102);
        assert_eq!(out.as_slice(), &[0x02, 0x01]);
    }

    #[test]
    fn test_string_layout() {
        let mut out = WriteStream::new();
        out.write_string("fov");

        // u32 length prefix, UTF-8 body, no terminator
        assert_eq!(out.as_slice(), &[3, 0, 0, 0, b'f', b'o', b'v']);
    }

    #[test]
    fn test_empty_string() {
        let mut out = WriteStream::new();
        out.write_string("");
        assert_eq!(out.as_slice(), &[0, 0, 0, 0]);

        let mut input = ReadStream::new(out.as_slice());
        assert_eq!(input.read_string().unwrap(), "");
    }

    #[test]
    fn test_underrun_leaves_cursor_unchanged() {
        let data = [1u8, 2, 3];
        let mut input = ReadStream::new(&data);
        input.read_u8().unwrap();

        let err = input.read_i32().unwrap_err();
        assert!(matches!(
            err,
            WireError::Truncated {
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(input.position(), 1);

        // the remaining bytes are still readable
        assert_eq!(input.read_i16().unwrap(), 0x0302);
    }

    #[test]
    fn test_string_underrun_is_atomic() {
        // prefix claims 10 bytes, only 2 present
        let data = [10u8, 0, 0, 0, b'h', b'i'];
        let mut input = ReadStream::new(&data);

        assert!(input.read_string().is_err());
        // the length prefix must not have been consumed
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_string_invalid_utf8() {
        let data = [2u8, 0, 0, 0, 0xFF, 0xFE];
        let mut input = ReadStream::new(&data);
        assert!(matches!(
            input.read_string(),
            Err(WireError::InvalidString(_))
        ));
    }

    #[test]
    fn test_forward_and_rewind() {
        let data = [0u8; 8];
        let mut input = ReadStream::new(&data);

        input.forward(5).unwrap();
        assert_eq!(input.remaining(), 3);
        assert!(input.forward(4).is_err());
        assert_eq!(input.remaining(), 3);

        input.rewind();
        assert_eq!(input.remaining(), 8);
    }

    #[test]
    fn test_read_bytes() {
        let data = [9u8, 8, 7, 6];
        let mut input = ReadStream::new(&data);
        let payload = input.read_bytes(3).unwrap();
        assert_eq!(&payload[..], &[9, 8, 7]);
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_into_bytes() {
        let mut out = WriteStream::with_capacity(16);
        out.write_u32(42);
        let bytes = out.into_bytes();
        assert_eq!(&bytes[..], &[42, 0, 0, 0]);
    }
}
