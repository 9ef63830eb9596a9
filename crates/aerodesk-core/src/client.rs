//! Client state container
//!
//! Owns the credential database, the backend client, and the session
//! manager. The application shell holds one of these.

use std::sync::Arc;

use aerodesk_api::{Backend, HttpBackend};
use aerodesk_session::{RestoreOutcome, SessionManager, SessionOptions};
use aerodesk_storage::Database;

use crate::config::Config;
use crate::Result;

pub struct Client {
    config: Config,
    session_manager: SessionManager,
}

impl Client {
    /// Open the credential database and connect to the configured backend
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::open(&config.database_path)?;
        let backend = HttpBackend::new(config.api_base_url.clone(), config.request_timeout())?;

        tracing::debug!(
            api = %config.api_base_url,
            database = %config.database_path.display(),
            "Client configured"
        );

        Ok(Self::with_backend(config, db, Arc::new(backend)))
    }

    pub fn with_backend(config: Config, db: Database, backend: Arc<dyn Backend>) -> Self {
        let options = SessionOptions {
            keep_credentials_on_outage: config.keep_credentials_on_outage,
        };
        let session_manager = SessionManager::with_options(db, backend, options);

        Self {
            config,
            session_manager,
        }
    }

    /// Restore the session from stored credentials
    pub async fn initialize(&self) -> RestoreOutcome {
        let outcome = self.session_manager.restore().await;

        match &outcome {
            RestoreOutcome::Restored(profile) => {
                tracing::info!(username = %profile.username, "Client initialized with restored session")
            }
            RestoreOutcome::Anonymous => tracing::info!("Client initialized anonymously"),
            RestoreOutcome::ServiceUnavailable => {
                tracing::warn!("Client initialized while the backend is unavailable")
            }
        }

        outcome
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    /// A base URL nothing listens on
    async fn dead_backend_url() -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{}", addr)).unwrap()
    }

    async fn client(keep_credentials_on_outage: bool) -> Client {
        let mut config = Config::new(PathBuf::from("/unused"));
        config.api_base_url = dead_backend_url().await;
        config.request_timeout_secs = 2;
        config.keep_credentials_on_outage = keep_credentials_on_outage;

        let backend =
            HttpBackend::new(config.api_base_url.clone(), config.request_timeout()).unwrap();
        Client::with_backend(config, Database::open_in_memory().unwrap(), Arc::new(backend))
    }

    #[tokio::test]
    async fn test_initialize_without_credentials() {
        let client = client(true).await;
        assert_eq!(client.initialize().await, RestoreOutcome::Anonymous);
        assert!(!client.session_manager().is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_with_backend_down() {
        let client = client(true).await;
        client
            .session_manager()
            .credentials()
            .store_login("a.b.c", "refresh-1", "alice")
            .unwrap();

        assert_eq!(client.initialize().await, RestoreOutcome::ServiceUnavailable);
        assert_eq!(
            client
                .session_manager()
                .credentials()
                .username()
                .unwrap()
                .as_deref(),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn test_initialize_with_backend_down_can_clear() {
        let client = client(false).await;
        client
            .session_manager()
            .credentials()
            .store_login("a.b.c", "refresh-1", "alice")
            .unwrap();

        assert_eq!(client.initialize().await, RestoreOutcome::Anonymous);
        assert!(client
            .session_manager()
            .credentials()
            .load()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::new(std::env::temp_dir());
        config.request_timeout_secs = 0;
        assert!(Client::new(config).is_err());
    }
}
