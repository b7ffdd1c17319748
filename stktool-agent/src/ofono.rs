//! ofono D-Bus client side
//!
//! Proxies for the ofono interfaces the client consumes, modem discovery and
//! the [`SimToolkitService`] seam the session talks through.

use std::collections::HashMap;
use zbus::connection::Connection;
use zbus::proxy;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};

use crate::dbus::{
    OFONO_BUS_NAME, OFONO_MANAGER_PATH, SIM_TOOLKIT_INTERFACE, VOICE_CALL_MANAGER_INTERFACE,
};
use crate::error::{Result, StkError};
use crate::properties::{value_as_string_list, StkProperties};

/// Proxy for the ofono manager
#[proxy(
    interface = "org.ofono.Manager",
    default_service = "org.ofono",
    default_path = "/"
)]
pub trait Manager {
    fn get_modems(&self) -> zbus::Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;
}

/// Proxy for a modem's SIM Toolkit interface
#[proxy(interface = "org.ofono.SimToolkit", default_service = "org.ofono")]
pub trait SimToolkit {
    fn get_properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    fn select_item(&self, item: u8, agent: &ObjectPath<'_>) -> zbus::Result<()>;

    fn register_agent(&self, path: &ObjectPath<'_>) -> zbus::Result<()>;

    fn unregister_agent(&self, path: &ObjectPath<'_>) -> zbus::Result<()>;

    #[zbus(signal)]
    fn property_changed(&self, name: String, value: OwnedValue) -> zbus::Result<()>;
}

/// Proxy for a modem's voice call manager
#[proxy(interface = "org.ofono.VoiceCallManager", default_service = "org.ofono")]
pub trait VoiceCallManager {
    #[zbus(signal)]
    fn call_added(
        &self,
        path: OwnedObjectPath,
        properties: HashMap<String, OwnedValue>,
    ) -> zbus::Result<()>;
}

/// Modem object paths carrying the interfaces the client needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModemInterfaces {
    pub sim_toolkit: OwnedObjectPath,
    pub voice_call_manager: Option<OwnedObjectPath>,
}

/// Interfaces a modem advertises in its `Interfaces` property
fn modem_interfaces(properties: &HashMap<String, OwnedValue>) -> Vec<String> {
    properties
        .get("Interfaces")
        .and_then(|value| value_as_string_list(value))
        .unwrap_or_default()
}

/// Pick the modem to drive from a `GetModems` result
///
/// The first modem with a SIM Toolkit wins. Its voice call manager is
/// preferred; otherwise the first modem offering one is used.
pub fn select_modem(
    modems: &[(OwnedObjectPath, Vec<String>)],
) -> Result<ModemInterfaces> {
    if modems.is_empty() {
        return Err(StkError::NoModem);
    }

    let has = |ifaces: &[String], name: &str| ifaces.iter().any(|i| i == name);

    let (stk_path, stk_ifaces) = modems
        .iter()
        .find(|(_, ifaces)| has(ifaces, SIM_TOOLKIT_INTERFACE))
        .ok_or(StkError::NoSimToolkit)?;

    let voice_call_manager = if has(stk_ifaces, VOICE_CALL_MANAGER_INTERFACE) {
        Some(stk_path.clone())
    } else {
        modems
            .iter()
            .find(|(_, ifaces)| has(ifaces, VOICE_CALL_MANAGER_INTERFACE))
            .map(|(path, _)| path.clone())
    };

    Ok(ModemInterfaces {
        sim_toolkit: stk_path.clone(),
        voice_call_manager,
    })
}

/// Ask ofono for its modems and pick the one to drive
pub async fn discover_modem(connection: &Connection) -> Result<ModemInterfaces> {
    let manager = ManagerProxy::new(connection).await?;
    let modems: Vec<(OwnedObjectPath, Vec<String>)> = manager
        .get_modems()
        .await?
        .into_iter()
        .map(|(path, props)| {
            let ifaces = modem_interfaces(&props);
            tracing::debug!("Modem {} offers {:?}", path.as_str(), ifaces);
            (path, ifaces)
        })
        .collect();

    let selected = select_modem(&modems)?;
    if selected.voice_call_manager.is_none() {
        tracing::warn!("No voice call manager found; call hold will only end on timeout");
    }

    tracing::info!(
        "Using SIM Toolkit on {} (ofono at {}{})",
        selected.sim_toolkit.as_str(),
        OFONO_BUS_NAME,
        OFONO_MANAGER_PATH
    );
    Ok(selected)
}

/// Operations the session performs against `org.ofono.SimToolkit`
#[async_trait::async_trait]
pub trait SimToolkitService: Send + Sync {
    async fn get_properties(&self) -> Result<StkProperties>;

    async fn select_item(&self, index: u8, agent_path: &ObjectPath<'_>) -> Result<()>;

    async fn register_agent(&self, agent_path: &ObjectPath<'_>) -> Result<()>;

    async fn unregister_agent(&self, agent_path: &ObjectPath<'_>) -> Result<()>;
}

#[async_trait::async_trait]
impl SimToolkitService for SimToolkitProxy<'static> {
    async fn get_properties(&self) -> Result<StkProperties> {
        let map = SimToolkitProxy::get_properties(self).await?;
        Ok(StkProperties::from_map(&map))
    }

    async fn select_item(&self, index: u8, agent_path: &ObjectPath<'_>) -> Result<()> {
        SimToolkitProxy::select_item(self, index, agent_path).await?;
        Ok(())
    }

    async fn register_agent(&self, agent_path: &ObjectPath<'_>) -> Result<()> {
        SimToolkitProxy::register_agent(self, agent_path).await?;
        Ok(())
    }

    async fn unregister_agent(&self, agent_path: &ObjectPath<'_>) -> Result<()> {
        SimToolkitProxy::unregister_agent(self, agent_path).await?;
        Ok(())
    }
}

/// Build a SIM Toolkit proxy for the given modem
pub async fn sim_toolkit_proxy(
    connection: &Connection,
    modem: &OwnedObjectPath,
) -> Result<SimToolkitProxy<'static>> {
    let proxy = SimToolkitProxy::builder(connection)
        .path(modem.clone())?
        .build()
        .await?;
    Ok(proxy)
}

/// Build a voice call manager proxy for the given modem
pub async fn voice_call_manager_proxy(
    connection: &Connection,
    modem: &OwnedObjectPath,
) -> Result<VoiceCallManagerProxy<'static>> {
    let proxy = VoiceCallManagerProxy::builder(connection)
        .path(modem.clone())?
        .build()
        .await?;
    Ok(proxy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modem(path: &str, ifaces: &[&str]) -> (OwnedObjectPath, Vec<String>) {
        (
            OwnedObjectPath::try_from(path).unwrap(),
            ifaces.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_select_modem_with_both_interfaces() {
        let modems = vec![
            modem("/ril_0", &["org.ofono.SimManager"]),
            modem("/ril_1", &[SIM_TOOLKIT_INTERFACE, VOICE_CALL_MANAGER_INTERFACE]),
        ];
        let selected = select_modem(&modems).unwrap();
        assert_eq!(selected.sim_toolkit.as_str(), "/ril_1");
        assert_eq!(selected.voice_call_manager.unwrap().as_str(), "/ril_1");
    }

    #[test]
    fn test_select_modem_voice_calls_elsewhere() {
        let modems = vec![
            modem("/ril_0", &[VOICE_CALL_MANAGER_INTERFACE]),
            modem("/ril_1", &[SIM_TOOLKIT_INTERFACE]),
        ];
        let selected = select_modem(&modems).unwrap();
        assert_eq!(selected.sim_toolkit.as_str(), "/ril_1");
        assert_eq!(selected.voice_call_manager.unwrap().as_str(), "/ril_0");
    }

    #[test]
    fn test_select_modem_without_voice_calls() {
        let modems = vec![modem("/ril_0", &[SIM_TOOLKIT_INTERFACE])];
        let selected = select_modem(&modems).unwrap();
        assert!(selected.voice_call_manager.is_none());
    }

    #[test]
    fn test_select_modem_errors() {
        assert!(matches!(select_modem(&[]), Err(StkError::NoModem)));

        let modems = vec![modem("/ril_0", &[VOICE_CALL_MANAGER_INTERFACE])];
        assert!(matches!(select_modem(&modems), Err(StkError::NoSimToolkit)));
    }
}
