//! Transport module - the opaque socket capability the client drives.
//!
//! The client consumes a dealer-style, message-oriented socket: framed
//! multipart send/receive, non-blocking poll, and a settable identity. The
//! concrete socket library stays behind this trait; [`memory`] provides an
//! in-process implementation used by the test suite and as the reference
//! for binding a real socket library.

mod memory;

pub use memory::{pair, MemoryPeer, MemoryTransport};

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

/// Failure surfaced by a transport implementation.
///
/// Timeouts are not errors - they come back through the `Ok` channel of
/// [`Transport::send_multipart`] / [`Transport::recv_multipart`]. Anything
/// here is fatal for the connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The socket was closed or interrupted out from under the caller.
    #[error("transport closed")]
    Closed,

    /// Implementation-specific failure.
    #[error("transport failure: {0}")]
    Failed(String),
}

/// Result of a poll: which directions are ready right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
}

/// A dealer-style message socket.
///
/// One logical wire transfer is one multipart message (`Vec<Bytes>`); parts
/// are never delivered split or interleaved. Implementations must be safe
/// to hand to the client worker thread (`Send`); all calls happen from that
/// one thread except [`Transport::interrupter`], whose returned closure may
/// fire from any thread to abort a blocked call.
pub trait Transport: Send {
    /// Connect to a peer endpoint.
    fn connect(&mut self, endpoint: &str) -> Result<(), TransportError>;

    /// Attach the connection identity; must be set before `connect`.
    fn set_identity(&mut self, identity: u64) -> Result<(), TransportError>;

    /// How long `close` may block flushing queued data.
    fn set_linger(&mut self, linger: Duration) -> Result<(), TransportError>;

    /// Timeout for `send_multipart`; `None` blocks indefinitely.
    fn set_send_timeout(&mut self, timeout: Option<Duration>) -> Result<(), TransportError>;

    /// Timeout for `recv_multipart`; `None` blocks indefinitely.
    fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the socket to become readable or writable.
    fn poll(&mut self, timeout: Duration) -> Result<Readiness, TransportError>;

    /// Send one multipart message.
    ///
    /// Returns `Ok(false)` if the send timeout expired before the message
    /// could be queued.
    fn send_multipart(&mut self, parts: Vec<Bytes>) -> Result<bool, TransportError>;

    /// Receive one multipart message.
    ///
    /// Returns `Ok(None)` if the receive timeout expired first.
    fn recv_multipart(&mut self) -> Result<Option<Vec<Bytes>>, TransportError>;

    /// A handle that aborts any blocked transport call from another thread.
    ///
    /// After it fires, subsequent calls fail with [`TransportError::Closed`].
    fn interrupter(&self) -> Arc<dyn Fn() + Send + Sync>;

    /// Close the socket; honours the configured linger.
    fn close(&mut self);
}
