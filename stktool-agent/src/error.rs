//! Error type shared by the ofono client side of the crate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StkError {
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    #[error("D-Bus call failed: {0}")]
    Fdo(#[from] zbus::fdo::Error),

    #[error("no modem is available")]
    NoModem,

    #[error("no modem exposes {}", crate::dbus::SIM_TOOLKIT_INTERFACE)]
    NoSimToolkit,

    #[error("invalid value for property {name}: {reason}")]
    InvalidProperty { name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StkError>;
