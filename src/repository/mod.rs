mod entities;
mod local;
mod remote;

pub use local::LocalRepository;
pub use remote::RemoteRepository;

use crate::config::{AppConfig, PersistenceMode};
use crate::errors::AppResult;
use crate::remote::RestClient;
use crate::store::{Lookup, SnapshotStore, StorageKey};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// A record type that can live in either backend.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Row: Serialize + DeserializeOwned + Send + Sync + 'static;

    const NAME: &'static str;
    const STORAGE_KEY: StorageKey;
    const TABLE: &'static str;
    const SELECT: &'static str = "*";
    const ORDER: Option<&'static str> = None;
    /// Local inserts go to the front of the stored collection.
    const NEWEST_FIRST: bool = false;
    const SIMULATED_LATENCY_MS: u64;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// Value of a remote column, used to apply the same filters locally.
    fn column(&self, column: &str) -> Option<String>;
    fn to_row(&self) -> Self::Row;
    fn from_row(row: Self::Row) -> Self;
    fn fixtures() -> Vec<Self>;
}

/// Equality filters plus an optional row cap, expressed in remote column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(&'static str, String)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        self.filters
            .iter()
            .all(|(column, value)| entity.column(column).as_deref() == Some(value.as_str()))
    }
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn list(&self, query: &Query) -> AppResult<Vec<T>>;
    /// Stores a new record and returns it with its assigned id.
    async fn insert(&self, entity: T) -> AppResult<T>;
    async fn update(&self, entity: T) -> AppResult<Lookup<T>>;
    async fn delete(&self, id: &str) -> AppResult<Lookup<()>>;
}

/// The persistence choice, made once per application context.
#[derive(Debug, Clone)]
pub enum Backend {
    Local { store: SnapshotStore, simulate_latency: bool },
    Remote { client: RestClient },
}

impl Backend {
    pub fn select(config: &AppConfig, store: SnapshotStore) -> AppResult<Self> {
        match (config.persistence_mode(), &config.backend) {
            (PersistenceMode::Remote, Some(backend)) => {
                tracing::info!(url = %backend.base_url(), "using hosted backend");
                Ok(Self::Remote {
                    client: RestClient::new(backend)?,
                })
            }
            _ => {
                tracing::info!(simulate_latency = config.simulate_latency, "using local storage backend");
                Ok(Self::Local {
                    store,
                    simulate_latency: config.simulate_latency,
                })
            }
        }
    }

    pub fn mode(&self) -> PersistenceMode {
        match self {
            Self::Local { .. } => PersistenceMode::Local,
            Self::Remote { .. } => PersistenceMode::Remote,
        }
    }

    pub fn repository<T: Entity>(&self) -> Arc<dyn Repository<T>> {
        match self {
            Self::Local { store, simulate_latency } => {
                Arc::new(LocalRepository::<T>::new(store.clone(), *simulate_latency))
            }
            Self::Remote { client } => Arc::new(RemoteRepository::<T>::new(client.clone())),
        }
    }
}
