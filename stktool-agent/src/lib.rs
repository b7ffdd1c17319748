//! StkTool Agent Library
//!
//! Core types and plumbing for the StkTool SIM Toolkit client. This crate talks
//! to ofono over D-Bus, serves the `org.ofono.SimToolkitAgent` object and hands
//! every prompt the SIM raises to a front-end as an [`request::AgentRequest`].
//! It has no GUI dependency.

pub mod agent;
pub mod call_hold;
pub mod config;
pub mod error;
pub mod navigation;
pub mod ofono;
pub mod properties;
pub mod request;
pub mod session;
pub mod tone;

pub use error::StkError;

/// One entry of a SIM Toolkit menu or selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown for the entry
    pub label: String,
    /// SIM icon identifier (0 = no icon)
    pub icon_id: u8,
}

impl MenuItem {
    pub fn new(label: &str, icon_id: u8) -> Self {
        Self {
            label: label.to_string(),
            icon_id,
        }
    }
}

impl From<(String, u8)> for MenuItem {
    fn from((label, icon_id): (String, u8)) -> Self {
        Self { label, icon_id }
    }
}

/// D-Bus well-known names, interfaces and paths
pub mod dbus {
    /// ofono bus name
    pub const OFONO_BUS_NAME: &str = "org.ofono";
    /// ofono manager object path
    pub const OFONO_MANAGER_PATH: &str = "/";

    /// Modem interface exposing the SIM Toolkit menu
    pub const SIM_TOOLKIT_INTERFACE: &str = "org.ofono.SimToolkit";
    /// Modem interface reporting voice calls
    pub const VOICE_CALL_MANAGER_INTERFACE: &str = "org.ofono.VoiceCallManager";
    /// Interface served by the agent object
    pub const AGENT_INTERFACE: &str = "org.ofono.SimToolkitAgent";

    /// Default object path the agent is exported at
    pub const DEFAULT_AGENT_PATH: &str = "/appagent";
}
