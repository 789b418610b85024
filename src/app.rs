use std::sync::Arc;

use crate::collab::{
    BillingProvider, Executor, IdentityVerifier, MockBilling, MockExecutor, StaticTokenVerifier,
    TokenInfoVerifier,
};
use crate::config::{AppConfig, IdentityMode, SearchBackend, StoreBackend};
use crate::logic::DualWriter;
use crate::store::{
    DocumentStore, HttpSearchIndex, MemoryDocumentStore, MemorySearchIndex,
    PostgresDocumentStore, SearchIndex,
};

/// Collaborators shared by every request handler
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn DocumentStore>,
    pub index: Arc<dyn SearchIndex>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub executor: Arc<dyn Executor>,
    pub billing: Arc<dyn BillingProvider>,
}

pub type AppState = Arc<AppContext>;

impl AppContext {
    /// Everything in process memory, with the given identity verifier
    pub fn in_memory(identity: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            store: Arc::new(MemoryDocumentStore::new()),
            index: Arc::new(MemorySearchIndex::new()),
            identity,
            executor: Arc::new(MockExecutor),
            billing: Arc::new(MockBilling::default()),
        }
    }

    /// Connect to the collaborators named in the configuration
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.document_store.backend {
            StoreBackend::Memory => {
                log::warn!("using in-memory document store; data is lost on restart");
                Arc::new(MemoryDocumentStore::new())
            }
            StoreBackend::Postgres => {
                log::info!("connecting to PostgreSQL document store");
                let database_url = config.database_url()?;
                let postgres = PostgresDocumentStore::new(
                    &database_url,
                    config.document_store.max_connections.unwrap_or(20),
                )
                .await?;
                postgres.migrate().await?;
                Arc::new(postgres)
            }
        };

        let index: Arc<dyn SearchIndex> = match config.search.backend {
            SearchBackend::Memory => Arc::new(MemorySearchIndex::new()),
            SearchBackend::Http => {
                log::info!("using search service at {}", config.search.url);
                Arc::new(HttpSearchIndex::new(config.search.url.clone()))
            }
        };

        let identity: Arc<dyn IdentityVerifier> = match config.identity.mode {
            IdentityMode::Static => {
                log::warn!(
                    "static identity verifier with {} token(s); do not use in production",
                    config.identity.static_tokens.len()
                );
                Arc::new(StaticTokenVerifier::new(config.identity.static_tokens.clone()))
            }
            IdentityMode::TokenInfo => Arc::new(TokenInfoVerifier::new(
                config.identity.tokeninfo_url.clone(),
                config.identity.allowed_issuers.clone(),
            )),
        };

        Ok(Self {
            store,
            index,
            identity,
            executor: Arc::new(MockExecutor),
            billing: Arc::new(MockBilling {
                daily_rate_cents: config.billing.daily_rate_cents,
                currency: config.billing.currency.clone(),
            }),
        })
    }

    pub fn writer(&self) -> DualWriter<'_> {
        DualWriter::new(self.index.as_ref(), self.store.as_ref())
    }
}
