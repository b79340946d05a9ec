//! Logical messages exchanged with the renderer.
//!
//! Builds and parses the high-level message grammar on top of the value
//! codec. Every message body starts with one type byte; everything after it
//! is conditioned on that type:
//!
//! ```text
//! ChangePlugin   | plugin | action | action-specific fields
//! ChangeRenderer | action | action-specific fields
//! Image          | Value(ImageSet)
//! VRayLog        | level: i32 | Value(String)
//! ```
//!
//! Renderer actions are partitioned by a sentinel code: actions ordered
//! before it carry no argument, actions after it carry exactly one value.
//! `Resize`, `Init` and `SetRendererState` have dedicated layouts and
//! dedicated builders.
//!
//! # Example
//!
//! ```
//! use renderwire::message::Message;
//! use renderwire::attr::AttrValue;
//!
//! let msg = Message::plugin_update("cam_01", "fov", AttrValue::from(0.7854_f32));
//! let payload = msg.encode().unwrap();
//! assert_eq!(Message::parse(&payload).unwrap(), msg);
//! ```

use bytes::Bytes;

use crate::attr::{AttrImageSet, AttrValue};
use crate::codec::{ReadStream, WriteStream};
use crate::error::{Result, WireError};

/// Wire code partitioning renderer actions: actions with a code above it
/// carry exactly one argument value.
const ARGUMENT_ACTION_SENTINEL: u8 = 8;

/// Type byte of a logical message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    None = 0,
    Image = 1,
    ChangePlugin = 2,
    ChangeRenderer = 3,
    VRayLog = 4,
}

impl MessageType {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Image),
            2 => Ok(Self::ChangePlugin),
            3 => Ok(Self::ChangeRenderer),
            4 => Ok(Self::VRayLog),
            other => Err(WireError::UnknownMessageType(other)),
        }
    }
}

/// Action byte of a `ChangePlugin` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PluginAction {
    Create = 1,
    Remove = 2,
    Update = 3,
    Replace = 4,
}

impl PluginAction {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Create),
            2 => Ok(Self::Remove),
            3 => Ok(Self::Update),
            4 => Ok(Self::Replace),
            other => Err(WireError::UnknownPluginAction(other)),
        }
    }
}

/// How the server applies an updated property value.
///
/// `AsString` tells the server to coerce a string into the property's real
/// type instead of requiring the typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueSetter {
    Default = 1,
    AsString = 2,
}

impl ValueSetter {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Default),
            2 => Ok(Self::AsString),
            _ => Err(WireError::MalformedMessage("unknown value setter code")),
        }
    }
}

/// Renderer-control action codes.
///
/// Relative ordering around the argument sentinel (code 8) is load-bearing:
/// `Init` and later actions carry exactly one argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RendererAction {
    None = 0,
    Free = 1,
    Start = 2,
    Stop = 3,
    Pause = 4,
    Resume = 5,
    Resize = 6,
    Reset = 7,
    // 8 is the argument sentinel, not an action
    Init = 9,
    ResetHosts = 10,
    LoadScene = 11,
    AppendScene = 12,
    ExportScene = 13,
    SetRenderMode = 14,
    SetAnimationProperties = 15,
    SetCurrentTime = 16,
    SetCurrentFrame = 17,
    ClearFrameValues = 18,
    SetRendererState = 19,
    GetImage = 20,
    SetQuality = 21,
    SetCurrentCamera = 22,
    SetCommitAction = 23,
    SetVfbShow = 24,
    SetViewportImageFormat = 25,
    SetRenderRegion = 26,
    SetCropRegion = 27,
}

impl RendererAction {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::None,
            1 => Self::Free,
            2 => Self::Start,
            3 => Self::Stop,
            4 => Self::Pause,
            5 => Self::Resume,
            6 => Self::Resize,
            7 => Self::Reset,
            9 => Self::Init,
            10 => Self::ResetHosts,
            11 => Self::LoadScene,
            12 => Self::AppendScene,
            13 => Self::ExportScene,
            14 => Self::SetRenderMode,
            15 => Self::SetAnimationProperties,
            16 => Self::SetCurrentTime,
            17 => Self::SetCurrentFrame,
            18 => Self::ClearFrameValues,
            19 => Self::SetRendererState,
            20 => Self::GetImage,
            21 => Self::SetQuality,
            22 => Self::SetCurrentCamera,
            23 => Self::SetCommitAction,
            24 => Self::SetVfbShow,
            25 => Self::SetViewportImageFormat,
            26 => Self::SetRenderRegion,
            27 => Self::SetCropRegion,
            other => return Err(WireError::UnknownRendererAction(other)),
        })
    }

    /// Whether this action carries exactly one argument value.
    #[inline]
    pub fn takes_argument(self) -> bool {
        self.code() > ARGUMENT_ACTION_SENTINEL
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Free => "Free",
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Resize => "Resize",
            Self::Reset => "Reset",
            Self::Init => "Init",
            Self::ResetHosts => "ResetHosts",
            Self::LoadScene => "LoadScene",
            Self::AppendScene => "AppendScene",
            Self::ExportScene => "ExportScene",
            Self::SetRenderMode => "SetRenderMode",
            Self::SetAnimationProperties => "SetAnimationProperties",
            Self::SetCurrentTime => "SetCurrentTime",
            Self::SetCurrentFrame => "SetCurrentFrame",
            Self::ClearFrameValues => "ClearFrameValues",
            Self::SetRendererState => "SetRendererState",
            Self::GetImage => "GetImage",
            Self::SetQuality => "SetQuality",
            Self::SetCurrentCamera => "SetCurrentCamera",
            Self::SetCommitAction => "SetCommitAction",
            Self::SetVfbShow => "SetVfbShow",
            Self::SetViewportImageFormat => "SetViewportImageFormat",
            Self::SetRenderRegion => "SetRenderRegion",
            Self::SetCropRegion => "SetCropRegion",
        }
    }
}

/// State transitions carried by `SetRendererState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RendererState {
    Abort = 1,
    Continue = 2,
    Progress = 3,
    ProgressMessage = 4,
}

impl RendererState {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Abort),
            2 => Ok(Self::Continue),
            3 => Ok(Self::Progress),
            4 => Ok(Self::ProgressMessage),
            other => Err(WireError::UnknownRendererState(other)),
        }
    }
}

/// Renderer flavour requested by `Init`; packed at bit offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RendererType {
    None = 0,
    Rt = 1,
    Animation = 2,
    SingleFrame = 3,
    Preview = 4,
}

impl RendererType {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Rt),
            2 => Some(Self::Animation),
            3 => Some(Self::SingleFrame),
            4 => Some(Self::Preview),
            _ => None,
        }
    }
}

/// Distributed-rendering flags requested by `Init`; packed at bit offset 8.
///
/// Unknown bits from newer peers are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrFlags(u8);

impl DrFlags {
    pub const NONE: Self = Self(0);
    pub const ENABLE_DR: Self = Self(2);
    pub const RENDER_ONLY_ON_HOSTS: Self = Self(4);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for DrFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Render mode values carried as the `SetRenderMode` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RenderMode {
    Production = -1,
    RtCpu = 0,
    RtGpuOpenCl = 1,
    RtGpuCuda = 4,
}

impl RenderMode {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Commit policy values carried as the `SetCommitAction` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CommitAction {
    None = 0,
    Now = 1,
    NowForce = 2,
    AutoOff = 3,
    AutoOn = 4,
}

impl CommitAction {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// One logical message, ready to build or freshly parsed.
///
/// Messages are immutable once encoded; the payload owns all its storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Image delivery from the renderer.
    Image(AttrImageSet),
    /// Create a plugin instance; `None` plugin type means the server picks
    /// the implicit default type.
    PluginCreate {
        plugin: String,
        plugin_type: Option<String>,
    },
    PluginRemove {
        plugin: String,
    },
    /// Replace `plugin` with the instance named `new_plugin`.
    PluginReplace {
        plugin: String,
        new_plugin: String,
    },
    PluginUpdate {
        plugin: String,
        property: String,
        setter: ValueSetter,
        value: AttrValue,
    },
    /// A renderer action; `value` is present iff the action takes one.
    RendererAction {
        action: RendererAction,
        value: Option<AttrValue>,
    },
    RendererResize {
        width: i32,
        height: i32,
    },
    RendererInit {
        renderer: RendererType,
        dr_flags: DrFlags,
    },
    RendererState {
        state: RendererState,
        value: AttrValue,
    },
    /// Renderer log line forwarded to the caller.
    Log {
        level: i32,
        message: String,
    },
}

impl Message {
    pub fn plugin_create(plugin: impl Into<String>, plugin_type: impl Into<String>) -> Self {
        Self::PluginCreate {
            plugin: plugin.into(),
            plugin_type: Some(plugin_type.into()),
        }
    }

    pub fn plugin_remove(plugin: impl Into<String>) -> Self {
        Self::PluginRemove {
            plugin: plugin.into(),
        }
    }

    pub fn plugin_replace(plugin: impl Into<String>, new_plugin: impl Into<String>) -> Self {
        Self::PluginReplace {
            plugin: plugin.into(),
            new_plugin: new_plugin.into(),
        }
    }

    /// Update a plugin property with a typed value.
    pub fn plugin_update(
        plugin: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Self {
        Self::PluginUpdate {
            plugin: plugin.into(),
            property: property.into(),
            setter: ValueSetter::Default,
            value: value.into(),
        }
    }

    /// Update a plugin property from a string the server coerces.
    pub fn plugin_update_as_string(
        plugin: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::PluginUpdate {
            plugin: plugin.into(),
            property: property.into(),
            setter: ValueSetter::AsString,
            value: AttrValue::String(value.into()),
        }
    }

    pub fn image_set(set: AttrImageSet) -> Self {
        Self::Image(set)
    }

    pub fn vray_log(level: i32, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// An argument-less renderer action.
    ///
    /// Passing an argument-bearing action is a caller error.
    pub fn renderer_action(action: RendererAction) -> Result<Self> {
        if action.takes_argument() {
            return Err(WireError::MissingArgument(action.name()));
        }
        Ok(Self::RendererAction {
            action,
            value: None,
        })
    }

    /// An argument-bearing renderer action.
    ///
    /// Passing an argument-less action is a caller error, and
    /// `SetRendererState` has its own builder with the extra state byte.
    pub fn renderer_action_with(action: RendererAction, value: impl Into<AttrValue>) -> Result<Self> {
        if !action.takes_argument() {
            return Err(WireError::UnexpectedArgument(action.name()));
        }
        if action == RendererAction::SetRendererState {
            return Err(WireError::MalformedMessage(
                "SetRendererState carries a state byte; use Message::renderer_state",
            ));
        }
        Ok(Self::RendererAction {
            action,
            value: Some(value.into()),
        })
    }

    pub fn renderer_resize(width: i32, height: i32) -> Self {
        Self::RendererResize { width, height }
    }

    pub fn renderer_init(renderer: RendererType, dr_flags: DrFlags) -> Self {
        Self::RendererInit { renderer, dr_flags }
    }

    pub fn renderer_state(state: RendererState, value: impl Into<AttrValue>) -> Self {
        Self::RendererState {
            state,
            value: value.into(),
        }
    }

    pub fn set_render_mode(mode: RenderMode) -> Self {
        Self::RendererAction {
            action: RendererAction::SetRenderMode,
            value: Some(AttrValue::Int(mode.code())),
        }
    }

    pub fn set_commit_action(commit: CommitAction) -> Self {
        Self::RendererAction {
            action: RendererAction::SetCommitAction,
            value: Some(AttrValue::Int(commit.code())),
        }
    }

    /// Serialise into a payload ready for the transport.
    pub fn encode(&self) -> Result<Bytes> {
        let mut out = WriteStream::new();
        match self {
            Self::Image(set) => {
                out.write_u8(MessageType::Image.code());
                AttrValue::ImageSet(set.clone()).encode(&mut out)?;
            }
            Self::PluginCreate {
                plugin,
                plugin_type,
            } => {
                out.write_u8(MessageType::ChangePlugin.code());
                out.write_string(plugin);
                out.write_u8(PluginAction::Create.code());
                if let Some(type_name) = plugin_type {
                    out.write_string(type_name);
                }
            }
            Self::PluginRemove { plugin } => {
                out.write_u8(MessageType::ChangePlugin.code());
                out.write_string(plugin);
                out.write_u8(PluginAction::Remove.code());
            }
            Self::PluginReplace { plugin, new_plugin } => {
                out.write_u8(MessageType::ChangePlugin.code());
                out.write_string(plugin);
                out.write_u8(PluginAction::Replace.code());
                AttrValue::String(new_plugin.clone()).encode(&mut out)?;
            }
            Self::PluginUpdate {
                plugin,
                property,
                setter,
                value,
            } => {
                out.write_u8(MessageType::ChangePlugin.code());
                out.write_string(plugin);
                out.write_u8(PluginAction::Update.code());
                out.write_string(property);
                out.write_u8(setter.code());
                value.encode(&mut out)?;
            }
            Self::RendererAction { action, value } => {
                out.write_u8(MessageType::ChangeRenderer.code());
                out.write_u8(action.code());
                match (action.takes_argument(), value) {
                    (true, Some(v)) => v.encode(&mut out)?,
                    (true, None) => return Err(WireError::MissingArgument(action.name())),
                    (false, None) => {}
                    (false, Some(_)) => {
                        return Err(WireError::UnexpectedArgument(action.name()))
                    }
                }
            }
            Self::RendererResize { width, height } => {
                out.write_u8(MessageType::ChangeRenderer.code());
                out.write_u8(RendererAction::Resize.code());
                out.write_i32(*width);
                out.write_i32(*height);
            }
            Self::RendererInit { renderer, dr_flags } => {
                let packed = ((dr_flags.bits() as i32) << 8) | (renderer.code() as i32);
                out.write_u8(MessageType::ChangeRenderer.code());
                out.write_u8(RendererAction::Init.code());
                AttrValue::Int(packed).encode(&mut out)?;
            }
            Self::RendererState { state, value } => {
                out.write_u8(MessageType::ChangeRenderer.code());
                out.write_u8(RendererAction::SetRendererState.code());
                out.write_u8(state.code());
                value.encode(&mut out)?;
            }
            Self::Log { level, message } => {
                out.write_u8(MessageType::VRayLog.code());
                out.write_i32(*level);
                AttrValue::String(message.clone()).encode(&mut out)?;
            }
        }
        Ok(out.into_bytes())
    }

    /// Parse a payload back into a structured message.
    ///
    /// Unknown future type/action codes are reported as named errors, never
    /// panics; the caller treats the whole frame as malformed and drops it.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut input = ReadStream::new(payload);
        let message_type = MessageType::from_code(input.read_u8()?)?;

        match message_type {
            MessageType::None => Err(WireError::MalformedMessage("message type None")),
            MessageType::Image => {
                match AttrValue::decode(&mut input)? {
                    AttrValue::ImageSet(set) => Ok(Self::Image(set)),
                    _ => Err(WireError::MalformedMessage(
                        "image message value must be an ImageSet",
                    )),
                }
            }
            MessageType::ChangePlugin => Self::parse_change_plugin(&mut input),
            MessageType::ChangeRenderer => Self::parse_change_renderer(&mut input),
            MessageType::VRayLog => {
                let level = input.read_i32()?;
                match AttrValue::decode(&mut input)? {
                    AttrValue::String(message) => Ok(Self::Log { level, message }),
                    _ => Err(WireError::MalformedMessage("log value must be a String")),
                }
            }
        }
    }

    fn parse_change_plugin(input: &mut ReadStream<'_>) -> Result<Self> {
        let plugin = input.read_string()?;
        let action = PluginAction::from_code(input.read_u8()?)?;

        match action {
            PluginAction::Create => {
                let plugin_type = if input.has_more() {
                    Some(input.read_string()?)
                } else {
                    None
                };
                Ok(Self::PluginCreate {
                    plugin,
                    plugin_type,
                })
            }
            PluginAction::Remove => Ok(Self::PluginRemove { plugin }),
            PluginAction::Replace => {
                if !input.has_more() {
                    return Err(WireError::MalformedMessage(
                        "plugin replace without replacement name",
                    ));
                }
                match AttrValue::decode(input)? {
                    AttrValue::String(new_plugin) => Ok(Self::PluginReplace { plugin, new_plugin }),
                    _ => Err(WireError::MalformedMessage(
                        "plugin replace value must be a String",
                    )),
                }
            }
            PluginAction::Update => {
                let property = input.read_string()?;
                let setter = ValueSetter::from_code(input.read_u8()?)?;
                if !input.has_more() {
                    return Err(WireError::MalformedMessage("plugin update without value"));
                }
                let value = AttrValue::decode(input)?;
                Ok(Self::PluginUpdate {
                    plugin,
                    property,
                    setter,
                    value,
                })
            }
        }
    }

    fn parse_change_renderer(input: &mut ReadStream<'_>) -> Result<Self> {
        let action = RendererAction::from_code(input.read_u8()?)?;

        match action {
            RendererAction::Resize => Ok(Self::RendererResize {
                width: input.read_i32()?,
                height: input.read_i32()?,
            }),
            RendererAction::Init => {
                let packed = match AttrValue::decode(input)? {
                    AttrValue::Int(v) => v,
                    _ => {
                        return Err(WireError::MalformedMessage(
                            "renderer init argument must be an Int",
                        ))
                    }
                };
                let renderer = RendererType::from_code((packed & 0xFF) as u8)
                    .ok_or(WireError::MalformedMessage("unknown renderer type in init"))?;
                let dr_flags = DrFlags::from_bits(((packed >> 8) & 0xFF) as u8);
                Ok(Self::RendererInit { renderer, dr_flags })
            }
            RendererAction::SetRendererState => {
                let state = RendererState::from_code(input.read_u8()?)?;
                let value = AttrValue::decode(input)?;
                Ok(Self::RendererState { state, value })
            }
            _ if action.takes_argument() => {
                let value = AttrValue::decode(input)?;
                Ok(Self::RendererAction {
                    action,
                    value: Some(value),
                })
            }
            _ => Ok(Self::RendererAction {
                action,
                value: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(msg: Message) {
        let payload = msg.encode().unwrap();
        assert_eq!(Message::parse(&payload).unwrap(), msg);
    }

    /// Scenario: create plugin, exact byte layout.
    #[test]
    fn test_plugin_create_layout() {
        let payload = Message::plugin_create("teapot_01", "GeomMeshFile")
            .encode()
            .unwrap();

        let mut expected = vec![2u8]; // ChangePlugin
        expected.extend_from_slice(&9u32.to_le_bytes());
        expected.extend_from_slice(b"teapot_01");
        expected.push(1); // Create
        expected.extend_from_slice(&12u32.to_le_bytes());
        expected.extend_from_slice(b"GeomMeshFile");

        assert_eq!(&payload[..], &expected[..]);
    }

    /// Scenario: set float property, exact byte layout.
    #[test]
    fn test_plugin_update_layout() {
        let payload = Message::plugin_update("cam_01", "fov", AttrValue::Float(0.7854))
            .encode()
            .unwrap();

        let mut expected = vec![2u8]; // ChangePlugin
        expected.extend_from_slice(&6u32.to_le_bytes());
        expected.extend_from_slice(b"cam_01");
        expected.push(3); // Update
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.extend_from_slice(b"fov");
        expected.push(1); // ValueSetter::Default
        expected.push(2); // ValueKind::Float
        expected.extend_from_slice(&0.7854_f32.to_le_bytes());

        assert_eq!(&payload[..], &expected[..]);
    }

    /// Scenario: renderer init packs type and DR flags into one Int.
    #[test]
    fn test_renderer_init_layout() {
        let payload = Message::renderer_init(RendererType::Rt, DrFlags::ENABLE_DR)
            .encode()
            .unwrap();

        let mut expected = vec![3u8, 9, 1]; // ChangeRenderer | Init | Int kind
        expected.extend_from_slice(&0x0201_i32.to_le_bytes());
        assert_eq!(&payload[..], &expected[..]);
    }

    /// Scenario: resize carries two raw ints with no kind byte.
    #[test]
    fn test_renderer_resize_layout() {
        let payload = Message::renderer_resize(1920, 1080).encode().unwrap();

        let mut expected = vec![3u8, 6]; // ChangeRenderer | Resize
        expected.extend_from_slice(&1920i32.to_le_bytes());
        expected.extend_from_slice(&1080i32.to_le_bytes());
        assert_eq!(&payload[..], &expected[..]);

        match Message::parse(&payload).unwrap() {
            Message::RendererResize { width, height } => {
                assert_eq!((width, height), (1920, 1080));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_roundtrip_plugin_messages() {
        roundtrip(Message::plugin_create("node_01", "BRDFVRayMtl"));
        roundtrip(Message::PluginCreate {
            plugin: "node_02".into(),
            plugin_type: None,
        });
        roundtrip(Message::plugin_remove("node_01"));
        roundtrip(Message::plugin_replace("old_node", "new_node"));
        roundtrip(Message::plugin_update(
            "geom",
            "vertices",
            AttrValue::ListVector(vec![crate::attr::AttrVector::new(0.0, 1.0, 2.0)]),
        ));
        roundtrip(Message::plugin_update_as_string("cam", "fov", "45deg"));
    }

    #[test]
    fn test_roundtrip_renderer_messages() {
        roundtrip(Message::renderer_action(RendererAction::None).unwrap());
        roundtrip(Message::renderer_action(RendererAction::Start).unwrap());
        roundtrip(Message::renderer_action(RendererAction::Free).unwrap());
        roundtrip(Message::renderer_action_with(RendererAction::LoadScene, "scene.vrscene").unwrap());
        roundtrip(Message::renderer_init(
            RendererType::Animation,
            DrFlags::ENABLE_DR | DrFlags::RENDER_ONLY_ON_HOSTS,
        ));
        roundtrip(Message::renderer_state(
            RendererState::Progress,
            AttrValue::Float(0.5),
        ));
        roundtrip(Message::set_render_mode(RenderMode::RtGpuCuda));
        roundtrip(Message::set_commit_action(CommitAction::AutoOn));
    }

    #[test]
    fn test_roundtrip_log_and_image() {
        roundtrip(Message::vray_log(3, "rendering started"));

        let mut set = AttrImageSet::new(crate::attr::ImageSourceType::ImageReady);
        set.insert(
            crate::attr::RenderChannel::COLOR,
            crate::attr::AttrImage::full(
                bytes::Bytes::from_static(&[1, 2, 3, 4]),
                crate::attr::ImageFormat::RgbaReal,
                1,
                1,
            ),
        );
        roundtrip(Message::image_set(set));
    }

    #[test]
    fn test_log_layout() {
        let payload = Message::vray_log(4, "hi").encode().unwrap();

        let mut expected = vec![4u8]; // VRayLog
        expected.extend_from_slice(&4i32.to_le_bytes());
        expected.push(10); // ValueKind::String
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(b"hi");
        assert_eq!(&payload[..], &expected[..]);
    }

    #[test]
    fn test_argument_arity_enforced() {
        // argument-less action built with an argument
        assert!(matches!(
            Message::renderer_action_with(RendererAction::Start, 1),
            Err(WireError::UnexpectedArgument("Start"))
        ));

        // argument-bearing action built without one
        assert!(matches!(
            Message::renderer_action(RendererAction::LoadScene),
            Err(WireError::MissingArgument("LoadScene"))
        ));

        // hand-built variants are checked at encode time
        assert!(matches!(
            Message::RendererAction {
                action: RendererAction::Stop,
                value: Some(AttrValue::Int(1)),
            }
            .encode(),
            Err(WireError::UnexpectedArgument("Stop"))
        ));
        assert!(matches!(
            Message::RendererAction {
                action: RendererAction::GetImage,
                value: None,
            }
            .encode(),
            Err(WireError::MissingArgument("GetImage"))
        ));
    }

    #[test]
    fn test_set_renderer_state_requires_dedicated_builder() {
        assert!(Message::renderer_action_with(RendererAction::SetRendererState, 1).is_err());
    }

    #[test]
    fn test_parse_update_without_value_is_malformed() {
        let mut out = WriteStream::new();
        out.write_u8(MessageType::ChangePlugin.code());
        out.write_string("node");
        out.write_u8(PluginAction::Update.code());
        out.write_string("prop");
        out.write_u8(ValueSetter::Default.code());
        // value missing

        assert!(matches!(
            Message::parse(out.as_slice()),
            Err(WireError::MalformedMessage("plugin update without value"))
        ));
    }

    #[test]
    fn test_parse_create_without_type_uses_default() {
        let mut out = WriteStream::new();
        out.write_u8(MessageType::ChangePlugin.code());
        out.write_string("node");
        out.write_u8(PluginAction::Create.code());

        match Message::parse(out.as_slice()).unwrap() {
            Message::PluginCreate {
                plugin,
                plugin_type,
            } => {
                assert_eq!(plugin, "node");
                assert_eq!(plugin_type, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_log_with_non_string_value_is_malformed() {
        let mut out = WriteStream::new();
        out.write_u8(MessageType::VRayLog.code());
        out.write_i32(1);
        AttrValue::Int(7).encode(&mut out).unwrap();

        assert!(matches!(
            Message::parse(out.as_slice()),
            Err(WireError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_parse_unknown_codes_are_named_errors() {
        assert!(matches!(
            Message::parse(&[9]),
            Err(WireError::UnknownMessageType(9))
        ));

        // unknown renderer action from a future peer
        let payload = [MessageType::ChangeRenderer.code(), 200];
        assert!(matches!(
            Message::parse(&payload),
            Err(WireError::UnknownRendererAction(200))
        ));

        // the argument sentinel is not a real action
        let payload = [MessageType::ChangeRenderer.code(), 8];
        assert!(matches!(
            Message::parse(&payload),
            Err(WireError::UnknownRendererAction(8))
        ));
    }

    #[test]
    fn test_parse_truncated_payload() {
        let payload = Message::plugin_create("teapot_01", "GeomMeshFile")
            .encode()
            .unwrap();
        assert!(Message::parse(&payload[..4]).is_err());
    }
}
