//! Business logic services

pub mod aggregate_cache;
pub mod catalog;
pub mod codec;
pub mod lendings;
pub mod members;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    repository::Repository,
    services::aggregate_cache::{AggregateCache, CacheSnapshot},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub members: members::MembersService,
    pub catalog: catalog::CatalogService,
    pub lendings: lendings::LendingsService,
    pub cache: Arc<AggregateCache>,
    repository: Repository,
}

impl Services {
    /// Create all services around one repository and one aggregate cache
    pub fn new(repository: Repository, cache: Arc<AggregateCache>, config: &AppConfig) -> AppResult<Self> {
        let codec = codec::from_config(&config.codec)?;
        Ok(Self {
            members: members::MembersService::new(repository.clone(), cache.clone(), codec.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), cache.clone(), codec),
            lendings: lendings::LendingsService::new(repository.clone(), &config.lending),
            cache,
            repository,
        })
    }

    /// Recompute the aggregate cache from the store
    pub async fn initialize(&self) -> AppResult<CacheSnapshot> {
        self.cache.load(&self.repository).await
    }

    /// Check store connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
