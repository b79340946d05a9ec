//! Control-plane protocol: the fixed header on every wire transfer.
//!
//! Every logical transmission is a two-part transport message:
//!
//! ```text
//! ┌───────────────┬────────────────────────────┐
//! │ ControlFrame  │ Payload (possibly empty)   │
//! │ 9 bytes       │ logical message body       │
//! └───────────────┴────────────────────────────┘
//! ```
//!
//! `ControlFrame` layout, little-endian:
//!
//! ```text
//! ┌───────────┬────────┬───────────┐
//! │ version   │ role   │ control   │
//! │ i32 LE    │ u8     │ i32 LE    │
//! └───────────┴────────┴───────────┘
//! ```
//!
//! A header that does not parse, or whose version differs from
//! [`PROTOCOL_VERSION`], marks the whole frame malformed.

use std::time::Duration;

/// Protocol version stamped on every control frame.
pub const PROTOCOL_VERSION: i32 = 1000;

/// Control frame size in bytes (fixed, exactly 9).
pub const CONTROL_FRAME_SIZE: usize = 9;

/// Handshake receive timeout and exporter ping timeout.
pub const EXPORTER_TIMEOUT: Duration = Duration::from_millis(5000);

/// Heartbeat-role ping timeout; peer silence beyond this is fatal.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Upper bound on messages moved per direction in one serve iteration.
pub const MAX_BATCH_MESSAGES: usize = 10;

/// Which kind of client a connection speaks for.
///
/// An `Exporter` carries scene-mutation and renderer-control data. A
/// `Heartbeat` carries no user data and exists only to detect peer death;
/// the recommended deployment pairs one of each against the same peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClientRole {
    None = 0,
    Exporter = 1,
    Heartbeat = 2,
}

impl ClientRole {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Exporter),
            2 => Some(Self::Heartbeat),
            _ => None,
        }
    }

    /// Control code this role sends to open the handshake.
    pub fn connect_code(self) -> Option<ControlCode> {
        match self {
            Self::Exporter => Some(ControlCode::ExporterConnect),
            Self::Heartbeat => Some(ControlCode::HeartbeatConnect),
            Self::None => None,
        }
    }

    /// Control code the peer must answer the handshake with.
    pub fn create_code(self) -> Option<ControlCode> {
        match self {
            Self::Exporter => Some(ControlCode::RendererCreate),
            Self::Heartbeat => Some(ControlCode::HeartbeatCreate),
            Self::None => None,
        }
    }

    /// Ping timeout for this role.
    pub fn ping_timeout(self) -> Duration {
        match self {
            Self::Heartbeat => HEARTBEAT_TIMEOUT,
            _ => EXPORTER_TIMEOUT,
        }
    }
}

/// Control code of a wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ControlCode {
    /// The payload part carries a logical message.
    Data = 0,
    ExporterConnect = 1000,
    HeartbeatConnect = 1001,
    RendererCreate = 2000,
    HeartbeatCreate = 2001,
    Ping = 3000,
    Pong = 3001,
}

impl ControlCode {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Data),
            1000 => Some(Self::ExporterConnect),
            1001 => Some(Self::HeartbeatConnect),
            2000 => Some(Self::RendererCreate),
            2001 => Some(Self::HeartbeatCreate),
            3000 => Some(Self::Ping),
            3001 => Some(Self::Pong),
            _ => None,
        }
    }
}

/// Fixed header prepended to every wire transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFrame {
    pub version: i32,
    pub role: ClientRole,
    pub control: ControlCode,
}

impl ControlFrame {
    /// Create a header stamped with the local protocol version.
    pub fn new(role: ClientRole, control: ControlCode) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            role,
            control,
        }
    }

    /// Encode to the 9-byte wire layout.
    ///
    /// # Example
    ///
    /// ```
    /// use renderwire::protocol::{ClientRole, ControlCode, ControlFrame, CONTROL_FRAME_SIZE};
    ///
    /// let frame = ControlFrame::new(ClientRole::Exporter, ControlCode::Data);
    /// assert_eq!(frame.encode().len(), CONTROL_FRAME_SIZE);
    /// ```
    pub fn encode(&self) -> [u8; CONTROL_FRAME_SIZE] {
        let mut buf = [0u8; CONTROL_FRAME_SIZE];
        buf[0..4].copy_from_slice(&self.version.to_le_bytes());
        buf[4] = self.role.code();
        buf[5..9].copy_from_slice(&self.control.code().to_le_bytes());
        buf
    }

    /// Decode from wire bytes.
    ///
    /// Returns `None` if the buffer is not exactly [`CONTROL_FRAME_SIZE`]
    /// bytes or the role/control codes are unknown. Version mismatch does
    /// not fail decoding - callers check [`ControlFrame::version_ok`] so the
    /// offending version can be reported.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != CONTROL_FRAME_SIZE {
            return None;
        }
        let version = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let role = ClientRole::from_code(buf[4])?;
        let control = ControlCode::from_code(i32::from_le_bytes([buf[5], buf[6], buf[7], buf[8]]))?;
        Some(Self {
            version,
            role,
            control,
        })
    }

    /// Whether this frame speaks the local protocol version.
    #[inline]
    pub fn version_ok(&self) -> bool {
        self.version == PROTOCOL_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_frame_layout() {
        let frame = ControlFrame::new(ClientRole::Exporter, ControlCode::Ping);
        let bytes = frame.encode();

        // version 1000 LE
        assert_eq!(&bytes[0..4], &1000i32.to_le_bytes());
        // role byte
        assert_eq!(bytes[4], 1);
        // control 3000 LE
        assert_eq!(&bytes[5..9], &3000i32.to_le_bytes());
    }

    #[test]
    fn test_control_frame_roundtrip() {
        for role in [ClientRole::None, ClientRole::Exporter, ClientRole::Heartbeat] {
            for control in [
                ControlCode::Data,
                ControlCode::ExporterConnect,
                ControlCode::HeartbeatConnect,
                ControlCode::RendererCreate,
                ControlCode::HeartbeatCreate,
                ControlCode::Ping,
                ControlCode::Pong,
            ] {
                let frame = ControlFrame::new(role, control);
                let decoded = ControlFrame::decode(&frame.encode()).unwrap();
                assert_eq!(decoded, frame);
                assert!(decoded.version_ok());
            }
        }
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        assert!(ControlFrame::decode(&[0u8; 8]).is_none());
        assert!(ControlFrame::decode(&[0u8; 10]).is_none());
        assert!(ControlFrame::decode(&[]).is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_codes() {
        let mut bytes = ControlFrame::new(ClientRole::Exporter, ControlCode::Data).encode();
        bytes[4] = 9; // bogus role
        assert!(ControlFrame::decode(&bytes).is_none());

        let mut bytes = ControlFrame::new(ClientRole::Exporter, ControlCode::Data).encode();
        bytes[5..9].copy_from_slice(&77i32.to_le_bytes()); // bogus control
        assert!(ControlFrame::decode(&bytes).is_none());
    }

    #[test]
    fn test_version_mismatch_still_decodes() {
        let mut bytes = ControlFrame::new(ClientRole::Exporter, ControlCode::Data).encode();
        bytes[0..4].copy_from_slice(&999i32.to_le_bytes());

        let frame = ControlFrame::decode(&bytes).unwrap();
        assert_eq!(frame.version, 999);
        assert!(!frame.version_ok());
    }

    #[test]
    fn test_role_handshake_codes() {
        assert_eq!(
            ClientRole::Exporter.connect_code(),
            Some(ControlCode::ExporterConnect)
        );
        assert_eq!(
            ClientRole::Exporter.create_code(),
            Some(ControlCode::RendererCreate)
        );
        assert_eq!(
            ClientRole::Heartbeat.connect_code(),
            Some(ControlCode::HeartbeatConnect)
        );
        assert_eq!(
            ClientRole::Heartbeat.create_code(),
            Some(ControlCode::HeartbeatCreate)
        );
        assert_eq!(ClientRole::None.connect_code(), None);
    }

    #[test]
    fn test_role_ping_timeouts() {
        assert_eq!(ClientRole::Exporter.ping_timeout(), EXPORTER_TIMEOUT);
        assert_eq!(ClientRole::Heartbeat.ping_timeout(), HEARTBEAT_TIMEOUT);
    }
}
