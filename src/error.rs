//! Error types for renderwire.

use thiserror::Error;

use crate::transport::TransportError;

/// Main error type for all renderwire operations.
#[derive(Debug, Error)]
pub enum WireError {
    /// Input stream ran out of bytes mid-field.
    #[error("truncated payload: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes the failed read required.
        needed: usize,
        /// Bytes left in the stream.
        available: usize,
    },

    /// A string field did not decode as UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidString(#[from] std::string::FromUtf8Error),

    /// Unknown value-kind code on the wire.
    #[error("unknown value kind code: {0}")]
    UnknownKind(u8),

    /// Unknown logical message type code.
    #[error("unknown message type code: {0}")]
    UnknownMessageType(u8),

    /// Unknown plugin action code.
    #[error("unknown plugin action code: {0}")]
    UnknownPluginAction(u8),

    /// Unknown renderer action code (possibly from a newer peer).
    #[error("unknown renderer action code: {0}")]
    UnknownRendererAction(u8),

    /// Unknown renderer state code.
    #[error("unknown renderer state code: {0}")]
    UnknownRendererState(u8),

    /// Unknown image format code.
    #[error("unknown image format code: {0}")]
    UnknownImageFormat(i32),

    /// Unknown image source-type code.
    #[error("unknown image source type code: {0}")]
    UnknownImageSource(i32),

    /// Nested list values exceeded the decoder depth bound.
    #[error("value nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    /// Attempt to serialise a default-constructed (`Unknown`) value.
    #[error("cannot serialise a value of unknown kind")]
    EmptyValue,

    /// A frame violated the message grammar (missing value, wrong kind, ...).
    #[error("malformed message: {0}")]
    MalformedMessage(&'static str),

    /// An argument was supplied to a renderer action that takes none.
    #[error("renderer action {0} takes no argument")]
    UnexpectedArgument(&'static str),

    /// A renderer action that requires an argument was built without one.
    #[error("renderer action {0} requires an argument")]
    MissingArgument(&'static str),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Operation requires `connect()` to have been called first.
    #[error("client is not connected")]
    NotConnected,

    /// `connect()` called on an already connected client.
    #[error("client is already connected")]
    AlreadyConnected,

    /// The worker thread failed to come up.
    #[error("worker failed to initialise: {0}")]
    WorkerInit(String),
}

/// Result type alias using WireError.
pub type Result<T> = std::result::Result<T, WireError>;
