//! # renderwire
//!
//! Client SDK for driving a remote rendering backend over an asynchronous,
//! dealer-style message transport.
//!
//! A 3D content host embeds this crate to push scene mutations and renderer
//! control to a render server and to receive images and log lines back.
//! Two concerns dominate:
//!
//! - **Value codec**: a tagged-union codec ([`attr::AttrValue`]) that
//!   round-trips every parameter shape - scalars, geometry types, nested
//!   lists, image payloads, instancer tables, map channels - with exact
//!   little-endian byte layout.
//! - **Duplex client**: [`client::Client`] owns a worker thread that
//!   performs the versioned handshake, drains the outbound FIFO, dispatches
//!   inbound callbacks, heartbeats the peer, and tears down cleanly.
//!
//! ## Architecture
//!
//! ```text
//! caller ──▶ Client::send ──▶ FIFO ─┐
//!                                   ├─ worker ──▶ [ControlFrame | Payload] ──▶ transport
//! callback ◀── Message::parse ◀─────┘
//! ```
//!
//! The transport itself is an opaque capability behind
//! [`transport::Transport`]; an in-process pair ([`transport::pair`]) backs
//! the test suite and documents the contract a real socket binding must
//! honour.
//!
//! ## Example
//!
//! ```no_run
//! use renderwire::attr::AttrValue;
//! use renderwire::client::Client;
//! use renderwire::message::Message;
//! use renderwire::protocol::ClientRole;
//! use renderwire::transport::pair;
//!
//! let (transport, _peer) = pair();
//! let mut client = Client::new(ClientRole::Exporter, move || Ok(transport)).unwrap();
//! client.set_callback(|message, _sender| {
//!     println!("server says: {message:?}");
//! });
//! client.connect("tcp://127.0.0.1:5555").unwrap();
//!
//! client.send(&Message::plugin_create("teapot_01", "GeomMeshFile")).unwrap();
//! client.send(&Message::plugin_update("cam_01", "fov", AttrValue::from(0.7854_f32))).unwrap();
//! client.sync_stop();
//! ```

pub mod attr;
pub mod client;
pub mod codec;
pub mod error;
pub mod message;
pub mod protocol;
pub mod transport;

pub use attr::{AttrValue, ValueKind};
pub use client::{Client, ClientConfig, Sender};
pub use error::{Result, WireError};
pub use message::{Message, MessageType, PluginAction, RendererAction};
pub use protocol::{ClientRole, ControlFrame, PROTOCOL_VERSION};
