//! SIM Toolkit property store
//!
//! Holds the latest known `org.ofono.SimToolkit` properties. The store is
//! refreshed wholesale from `GetProperties` and patched by `PropertyChanged`
//! signals. Every change is broadcast so the UI can redraw the main menu.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use zbus::zvariant::{OwnedValue, Value};

use crate::error::{Result, StkError};
use crate::MenuItem;

/// Events emitted by the property store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyEvent {
    /// All properties were replaced by a `GetProperties` result
    Refreshed,
    /// A single property was patched
    Changed(String),
}

/// Snapshot of the SIM Toolkit properties the client cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StkProperties {
    pub main_menu_title: Option<String>,
    pub main_menu_icon: Option<u8>,
    pub main_menu: Vec<MenuItem>,
    pub idle_mode_text: Option<String>,
    pub idle_mode_icon: Option<u8>,
}

impl StkProperties {
    /// Build a snapshot from a `GetProperties` reply
    ///
    /// Properties that fail to parse are skipped with a warning so one bad
    /// value does not hide the rest of the menu.
    pub fn from_map(map: &HashMap<String, OwnedValue>) -> Self {
        let mut props = Self::default();
        for (name, value) in map {
            match PropertyChange::parse(name, value) {
                Ok(Some(change)) => props.apply(change),
                Ok(None) => tracing::debug!("Ignoring SIM Toolkit property {}", name),
                Err(e) => tracing::warn!("Skipping property: {}", e),
            }
        }
        props
    }

    /// Apply a parsed change to this snapshot
    pub fn apply(&mut self, change: PropertyChange) {
        match change {
            PropertyChange::MainMenuTitle(title) => self.main_menu_title = Some(title),
            PropertyChange::MainMenuIcon(icon) => self.main_menu_icon = Some(icon),
            PropertyChange::MainMenu(items) => self.main_menu = items,
            PropertyChange::IdleModeText(text) => self.idle_mode_text = Some(text),
            PropertyChange::IdleModeIcon(icon) => self.idle_mode_icon = Some(icon),
        }
    }

    /// Whether the SIM currently offers a main menu
    pub fn has_main_menu(&self) -> bool {
        !self.main_menu.is_empty()
    }
}

/// A typed update to one SIM Toolkit property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChange {
    MainMenuTitle(String),
    MainMenuIcon(u8),
    MainMenu(Vec<MenuItem>),
    IdleModeText(String),
    IdleModeIcon(u8),
}

impl PropertyChange {
    /// Parse a property name and D-Bus value
    ///
    /// Returns `Ok(None)` for properties the client does not track.
    pub fn parse(name: &str, value: &Value<'_>) -> Result<Option<Self>> {
        let invalid = |reason: &str| StkError::InvalidProperty {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let change = match name {
            "MainMenuTitle" => {
                Self::MainMenuTitle(value_as_string(value).ok_or_else(|| invalid("expected string"))?)
            }
            "MainMenuIcon" => Self::MainMenuIcon(value_as_u8(value).ok_or_else(|| invalid("expected byte"))?),
            "MainMenu" => Self::MainMenu(value_as_menu(value).ok_or_else(|| invalid("expected a(sy)"))?),
            "IdleModeText" => {
                Self::IdleModeText(value_as_string(value).ok_or_else(|| invalid("expected string"))?)
            }
            "IdleModeIcon" => Self::IdleModeIcon(value_as_u8(value).ok_or_else(|| invalid("expected byte"))?),
            _ => return Ok(None),
        };

        Ok(Some(change))
    }
}

fn unwrap_variant<'v, 'a>(value: &'v Value<'a>) -> &'v Value<'a> {
    match value {
        Value::Value(inner) => unwrap_variant(inner),
        other => other,
    }
}

pub(crate) fn value_as_string(value: &Value<'_>) -> Option<String> {
    match unwrap_variant(value) {
        Value::Str(s) => Some(s.as_str().to_string()),
        _ => None,
    }
}

pub(crate) fn value_as_u8(value: &Value<'_>) -> Option<u8> {
    match unwrap_variant(value) {
        Value::U8(b) => Some(*b),
        _ => None,
    }
}

/// Parse an `as` value
pub(crate) fn value_as_string_list(value: &Value<'_>) -> Option<Vec<String>> {
    match unwrap_variant(value) {
        Value::Array(array) => array.iter().map(value_as_string).collect(),
        _ => None,
    }
}

/// Parse an `a(sy)` value
pub(crate) fn value_as_menu(value: &Value<'_>) -> Option<Vec<MenuItem>> {
    let Value::Array(array) = unwrap_variant(value) else {
        return None;
    };

    array
        .iter()
        .map(|entry| match unwrap_variant(entry) {
            Value::Structure(fields) => match fields.fields() {
                [label, icon] => Some(MenuItem {
                    label: value_as_string(label)?,
                    icon_id: value_as_u8(icon)?,
                }),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Shared, observable SIM Toolkit properties
pub struct PropertyStore {
    props: RwLock<StkProperties>,
    change_tx: broadcast::Sender<PropertyEvent>,
}

impl PropertyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribe to property change events
    pub fn subscribe(&self) -> broadcast::Receiver<PropertyEvent> {
        self.change_tx.subscribe()
    }

    /// Current properties
    pub async fn snapshot(&self) -> StkProperties {
        self.props.read().await.clone()
    }

    /// Replace everything with a fresh `GetProperties` result
    pub async fn replace(&self, props: StkProperties) {
        *self.props.write().await = props;
        // Ignore send errors (no receivers)
        let _ = self.change_tx.send(PropertyEvent::Refreshed);
    }

    /// Patch a single property from a `PropertyChanged` signal
    pub async fn apply(&self, name: &str, value: &Value<'_>) -> Result<()> {
        let Some(change) = PropertyChange::parse(name, value)? else {
            tracing::debug!("Ignoring change of untracked property {}", name);
            return Ok(());
        };

        self.props.write().await.apply(change);
        let _ = self.change_tx.send(PropertyEvent::Changed(name.to_string()));
        Ok(())
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        let (change_tx, _) = broadcast::channel(16);
        Self {
            props: RwLock::new(StkProperties::default()),
            change_tx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_value(labels: &[&str]) -> Value<'static> {
        let items: Vec<(String, u8)> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.to_string(), i as u8))
            .collect();
        Value::from(items)
    }

    #[test]
    fn test_parse_main_menu() {
        let change = PropertyChange::parse("MainMenu", &menu_value(&["Balance", "Services"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            change,
            PropertyChange::MainMenu(vec![MenuItem::new("Balance", 0), MenuItem::new("Services", 1)])
        );
    }

    #[test]
    fn test_parse_wrapped_variant() {
        let value = Value::Value(Box::new(Value::from("Operator")));
        let change = PropertyChange::parse("MainMenuTitle", &value).unwrap().unwrap();
        assert_eq!(change, PropertyChange::MainMenuTitle("Operator".to_string()));
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let err = PropertyChange::parse("MainMenuTitle", &Value::from(7u8)).unwrap_err();
        assert!(matches!(err, StkError::InvalidProperty { ref name, .. } if name == "MainMenuTitle"));
    }

    #[test]
    fn test_parse_unknown_property() {
        assert!(PropertyChange::parse("SomethingElse", &Value::from("x"))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_property_changed_reaches_snapshot() {
        let store = PropertyStore::new();
        let mut rx = store.subscribe();

        store
            .replace(StkProperties {
                main_menu_title: Some("SIM".to_string()),
                main_menu: vec![MenuItem::new("Old", 0)],
                ..Default::default()
            })
            .await;
        assert_eq!(rx.recv().await.unwrap(), PropertyEvent::Refreshed);

        store
            .apply("MainMenu", &menu_value(&["New A", "New B"]))
            .await
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            PropertyEvent::Changed("MainMenu".to_string())
        );

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.main_menu_title.as_deref(), Some("SIM"));
        assert_eq!(snapshot.main_menu.len(), 2);
        assert_eq!(snapshot.main_menu[1].label, "New B");
    }

    #[tokio::test]
    async fn test_untracked_change_is_silent() {
        let store = PropertyStore::new();
        let mut rx = store.subscribe();

        store.apply("Unknown", &Value::from(1u8)).await.unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!(store.snapshot().await, StkProperties::default());
    }
}
