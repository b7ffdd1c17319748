//! Connection to ofono: bus, modem, agent export and session setup

use std::sync::Arc;
use zbus::zvariant::OwnedObjectPath;
use zbus::Connection;

use stktool_agent::agent::{self, StkAgent};
use stktool_agent::call_hold::CallHold;
use stktool_agent::config::{BusKind, Config};
use stktool_agent::ofono::{self, ModemInterfaces};
use stktool_agent::properties::PropertyStore;
use stktool_agent::request::AgentRequest;
use stktool_agent::session::{self, Session};

/// Everything the window needs once ofono is reachable
pub struct Backend {
    /// Keeps the bus connection, and with it the exported agent, alive
    _connection: Connection,
    pub session: Arc<Session>,
    pub requests: async_channel::Receiver<AgentRequest>,
    /// Set when the initial `RegisterAgent` failed
    pub registration_error: Option<String>,
}

impl Backend {
    /// Connect to ofono and register the agent
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let connection = match config.agent.bus {
            BusKind::System => Connection::system().await?,
            BusKind::Session => Connection::session().await?,
        };
        tracing::info!("Connected to {:?} D-Bus", config.agent.bus);

        let modem = match config.modem_override() {
            Some(path) => {
                let path = OwnedObjectPath::try_from(path)?;
                ModemInterfaces {
                    sim_toolkit: path.clone(),
                    voice_call_manager: Some(path),
                }
            }
            None => ofono::discover_modem(&connection).await?,
        };

        let stk = ofono::sim_toolkit_proxy(&connection, &modem.sim_toolkit).await?;
        let store = PropertyStore::new();
        let call_hold = Arc::new(CallHold::new());

        // Export the agent before registering it so ofono can call straight away
        let (request_tx, request_rx) = async_channel::unbounded();
        let stk_agent = StkAgent::new(request_tx, call_hold.clone(), config.call_hold_timeout());
        agent::serve(&connection, &config.agent.path, stk_agent).await?;

        let agent_path = OwnedObjectPath::try_from(config.agent.path.as_str())?;
        let session = Arc::new(Session::new(
            Arc::new(stk.clone()),
            agent_path,
            store.clone(),
        ));

        // Subscribe before fetching so no change slips between the two
        session::watch_property_changes(stk, store).await?;
        session.refresh().await?;

        match modem.voice_call_manager {
            Some(path) => {
                let watched = match ofono::voice_call_manager_proxy(&connection, &path).await {
                    Ok(proxy) => session::watch_calls(proxy, call_hold).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = watched {
                    tracing::warn!("Failed to watch CallAdded on {}: {}", path.as_str(), e);
                }
            }
            None => tracing::debug!("Not watching calls; no voice call manager"),
        }

        let registration_error = match session.register_agent().await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Failed to register agent: {}", e);
                Some(e.to_string())
            }
        };

        Ok(Self {
            _connection: connection,
            session,
            requests: request_rx,
            registration_error,
        })
    }
}
