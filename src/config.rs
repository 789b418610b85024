use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub document_store: DocumentStoreConfig,
    pub search: SearchConfig,
    pub identity: IdentityConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    pub backend: StoreBackend,
    pub connection_string: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    Memory,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub backend: SearchBackend,
    /// Base URL of the search service when `backend = "http"`
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    Static,
    TokenInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub mode: IdentityMode,
    pub tokeninfo_url: String,
    pub allowed_issuers: Vec<String>,
    /// token -> subject, used when `mode = "static"`
    pub static_tokens: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub daily_rate_cents: i64,
    pub currency: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            connection_string: None,
            max_connections: Some(20),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackend::Memory,
            url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::Static,
            tokeninfo_url: "https://oauth2.googleapis.com/tokeninfo".to_string(),
            allowed_issuers: vec![
                "accounts.google.com".to_string(),
                "https://accounts.google.com".to_string(),
            ],
            static_tokens: HashMap::new(),
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            daily_rate_cents: 10,
            currency: "EUR".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional `config` file and
    /// `ALGO_`-prefixed environment variables (`ALGO_SERVER__PORT=8080`)
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("config").required(false));

        config = config.add_source(
            config::Environment::with_prefix("ALGO")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("identity.allowed_issuers")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the database URL from config or environment
    pub fn database_url(&self) -> anyhow::Result<String> {
        if let Some(connection_string) = &self.document_store.connection_string {
            return Ok(connection_string.clone());
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Ok(url);
        }

        anyhow::bail!("postgres document store selected but no connection string configured")
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
