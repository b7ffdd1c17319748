use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub ui: UiConfig,
    pub call_hold: CallHoldConfig,
    pub tones: TonesConfig,
}

/// Which message bus to find ofono on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    #[default]
    System,
    /// Useful against a fake ofono during development
    Session,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Object path the agent is exported and registered at
    pub path: String,
    pub bus: BusKind,
    /// Modem object path; empty means pick one from `GetModems`
    pub modem: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            path: crate::dbus::DEFAULT_AGENT_PATH.to_string(),
            bus: BusKind::System,
            modem: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long toasts stay on screen
    pub toast_seconds: u64,
    /// Auto-dismiss for PlayTone dialogs (0 = wait for the user)
    pub play_tone_seconds: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_seconds: 3,
            play_tone_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CallHoldConfig {
    pub timeout_seconds: u64,
}

impl Default for CallHoldConfig {
    fn default() -> Self {
        Self { timeout_seconds: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TonesConfig {
    pub enabled: bool,
    /// Playback volume between 0.0 and 1.0
    pub volume: f64,
}

impl Default for TonesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
        }
    }
}

impl Config {
    /// Load configuration from the default path (~/.config/stktool/config.toml)
    /// Creates the config file with defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    /// Creates the config file with defaults if it doesn't exist
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found at {:?}, creating with defaults", path);
            Self::write_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), crate::StkError> {
        zbus::zvariant::ObjectPath::try_from(self.agent.path.as_str()).map_err(|e| {
            crate::StkError::Config(format!("agent.path {:?} is not an object path: {}", self.agent.path, e))
        })?;
        if !self.agent.modem.is_empty() {
            zbus::zvariant::ObjectPath::try_from(self.agent.modem.as_str()).map_err(|e| {
                crate::StkError::Config(format!("agent.modem {:?} is not an object path: {}", self.agent.modem, e))
            })?;
        }
        if !(0.0..=1.0).contains(&self.tones.volume) {
            return Err(crate::StkError::Config(format!(
                "tones.volume {} is outside 0.0..=1.0",
                self.tones.volume
            )));
        }
        Ok(())
    }

    /// Write the default configuration to a file
    fn write_default_config(path: &PathBuf) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, Self::default_config_string())
            .with_context(|| format!("Failed to write default config: {:?}", path))?;

        tracing::info!("Created default config at {:?}", path);
        Ok(())
    }

    fn default_config_string() -> String {
        r#"# StkTool configuration

[agent]
# Object path the SIM Toolkit agent is registered at
path = "/appagent"
# Message bus ofono lives on: "system" or "session"
bus = "system"
# Modem object path, e.g. "/ril_0". Empty = first modem with a SIM Toolkit
modem = ""

[ui]
toast_seconds = 3
# Close PlayTone dialogs after this many seconds (0 = never)
play_tone_seconds = 5

[call_hold]
# How long "Wait" on a looping tone holds the SIM session without a call
timeout_seconds = 60

[tones]
enabled = true
volume = 0.3
"#
        .to_string()
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stktool")
            .join("config.toml")
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.ui.toast_seconds)
    }

    /// `None` when PlayTone dialogs wait for the user
    pub fn play_tone_timeout(&self) -> Option<Duration> {
        (self.ui.play_tone_seconds > 0).then(|| Duration::from_secs(self.ui.play_tone_seconds))
    }

    pub fn call_hold_timeout(&self) -> Duration {
        Duration::from_secs(self.call_hold.timeout_seconds)
    }

    /// Configured modem path, if any
    pub fn modem_override(&self) -> Option<&str> {
        (!self.agent.modem.is_empty()).then_some(self.agent.modem.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.path, "/appagent");
        assert_eq!(config.agent.bus, BusKind::System);
        assert_eq!(config.call_hold_timeout(), Duration::from_secs(60));
        assert_eq!(config.toast_duration(), Duration::from_secs(3));
        assert!(config.modem_override().is_none());
        assert!(config.tones.enabled);
    }

    #[test]
    fn test_default_config_string_parses() {
        let config = Config::parse(&Config::default_config_string()).unwrap();
        assert_eq!(config.agent.path, "/appagent");
        assert_eq!(config.play_tone_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[agent]
bus = "session"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.agent.bus, BusKind::Session);
        assert_eq!(config.agent.path, "/appagent");
        assert_eq!(config.call_hold.timeout_seconds, 60);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[agent]
path = "/org/stktool/agent"
bus = "system"
modem = "/ril_1"

[ui]
toast_seconds = 5
play_tone_seconds = 0

[call_hold]
timeout_seconds = 20

[tones]
enabled = false
volume = 0.8
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.agent.path, "/org/stktool/agent");
        assert_eq!(config.modem_override(), Some("/ril_1"));
        assert_eq!(config.play_tone_timeout(), None);
        assert_eq!(config.call_hold_timeout(), Duration::from_secs(20));
        assert!(!config.tones.enabled);
    }

    #[test]
    fn test_rejects_bad_agent_path() {
        let toml = r#"
[agent]
path = "appagent"
"#;
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_rejects_loud_volume() {
        let toml = r#"
[tones]
volume = 2.5
"#;
        assert!(Config::parse(toml).is_err());
    }
}
