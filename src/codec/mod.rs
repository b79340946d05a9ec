//! Codec module - byte-level streams for the wire format.
//!
//! Everything the protocol puts on the wire is little-endian and built from
//! a handful of primitive fields. Two dual objects cover both directions:
//!
//! - [`WriteStream`] - append-only growable output buffer
//! - [`ReadStream`] - bounded cursor over an immutable byte span
//!
//! Higher layers ([`crate::attr`], [`crate::message`]) never touch raw byte
//! slices directly; they compose these primitives.

mod stream;

pub use stream::{ReadStream, WriteStream};
