//! Application state
use aerodesk_core::{Client, Config, RestoreOutcome, Result, SessionManager};

pub struct AppState {
    client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            client: Client::new(config)?,
        })
    }

    /// Application load: rebuild the session from stored credentials
    pub async fn initialize(&self) -> RestoreOutcome {
        self.client.initialize().await
    }

    pub fn sessions(&self) -> &SessionManager {
        self.client.session_manager()
    }
}
