pub mod config;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod head;
pub mod input;
pub mod link;
pub mod profile;
pub mod ws;

pub use config::{load_settings, ClientSettings, SettingsOverrides, SharedSecret};
pub use controller::{ControllerView, DispatchOutcome};
pub use encoder::CommandEncoder;
pub use error::{ConfigError, SendError, TransportError};
pub use head::HeadTracker;
pub use input::{ControlButton, InputBus, InputEvent, InputRouter, InputSource};
pub use link::{LinkSession, LinkState, Transport, TransportEvent};
pub use profile::{ControlProfile, Key, KeyBindings, KeymapPreset};
pub use ws::{spawn_ws_link, WsLink, WsTransport};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
