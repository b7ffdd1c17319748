//! SIM Toolkit session
//!
//! Ties the ofono SIM Toolkit interface to the property store and the agent
//! registration. The UI talks to ofono only through a [`Session`].

use std::sync::Arc;
use futures::StreamExt;
use zbus::zvariant::OwnedObjectPath;

use crate::call_hold::CallHold;
use crate::error::Result;
use crate::ofono::{SimToolkitProxy, SimToolkitService, VoiceCallManagerProxy};
use crate::properties::PropertyStore;

pub struct Session {
    stk: Arc<dyn SimToolkitService>,
    agent_path: OwnedObjectPath,
    store: Arc<PropertyStore>,
}

impl Session {
    pub fn new(
        stk: Arc<dyn SimToolkitService>,
        agent_path: OwnedObjectPath,
        store: Arc<PropertyStore>,
    ) -> Self {
        Self {
            stk,
            agent_path,
            store,
        }
    }

    pub fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    /// Reload all properties with `GetProperties`
    pub async fn refresh(&self) -> Result<()> {
        let props = self.stk.get_properties().await?;
        tracing::debug!(
            "Fetched SIM Toolkit properties: {} menu items",
            props.main_menu.len()
        );
        self.store.replace(props).await;
        Ok(())
    }

    /// Activate a main menu entry
    pub async fn select_item(&self, index: u8) -> Result<()> {
        tracing::debug!("Selecting main menu item {}", index);
        self.stk.select_item(index, &self.agent_path).await
    }

    pub async fn register_agent(&self) -> Result<()> {
        self.stk.register_agent(&self.agent_path).await?;
        tracing::info!("Registered SIM Toolkit agent at {}", self.agent_path.as_str());
        Ok(())
    }

    pub async fn unregister_agent(&self) -> Result<()> {
        self.stk.unregister_agent(&self.agent_path).await?;
        tracing::info!("Unregistered SIM Toolkit agent at {}", self.agent_path.as_str());
        Ok(())
    }

    /// Drop the current SIM session by re-registering the agent
    ///
    /// An unregister failure is logged and registration still happens.
    pub async fn reset_agent(&self) -> Result<()> {
        if let Err(e) = self.unregister_agent().await {
            tracing::warn!("Failed to unregister agent: {}", e);
        }
        self.register_agent().await
    }
}

/// Patch the store on every `PropertyChanged` signal
pub async fn watch_property_changes(
    proxy: SimToolkitProxy<'static>,
    store: Arc<PropertyStore>,
) -> Result<()> {
    let mut stream = proxy.receive_property_changed().await?;

    tokio::spawn(async move {
        while let Some(signal) = stream.next().await {
            let args = match signal.args() {
                Ok(args) => args,
                Err(e) => {
                    tracing::warn!("Malformed PropertyChanged signal: {}", e);
                    continue;
                }
            };

            tracing::debug!("SIM Toolkit property changed: {}", args.name());
            if let Err(e) = store.apply(args.name(), args.value()).await {
                tracing::warn!("Failed to apply property change: {}", e);
            }
        }
        tracing::warn!("PropertyChanged stream ended");
    });

    Ok(())
}

/// Release the pending call hold whenever a voice call is added
pub async fn watch_calls(
    proxy: VoiceCallManagerProxy<'static>,
    call_hold: Arc<CallHold>,
) -> Result<()> {
    let mut stream = proxy.receive_call_added().await?;

    tokio::spawn(async move {
        while let Some(signal) = stream.next().await {
            match signal.args() {
                Ok(args) => tracing::debug!("Call added: {}", args.path().as_str()),
                Err(e) => tracing::debug!("Call added with unreadable arguments: {}", e),
            }
            if call_hold.release() {
                tracing::info!("Voice call started, releasing held SIM Toolkit prompt");
            }
        }
        tracing::warn!("CallAdded stream ended");
    });

    Ok(())
}
