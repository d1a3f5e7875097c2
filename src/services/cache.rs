use std::sync::Arc;
use std::time::Duration;

use crate::models::Prompt;
use crate::services::store::{DatingStore, StoreError};

const CATALOG_KEY: &str = "prompts:active";

/// In-process cache of the active prompt catalog
///
/// The catalog changes only through migrations, so every request after the
/// first within the TTL is served from memory.
pub struct PromptCatalog {
    cache: moka::future::Cache<&'static str, Arc<Vec<Prompt>>>,
}

impl PromptCatalog {
    pub fn new(ttl: Duration) -> Self {
        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Return the cached catalog, loading it from the store on a miss
    pub async fn get_or_load(&self, store: &dyn DatingStore) -> Result<Arc<Vec<Prompt>>, StoreError> {
        if let Some(prompts) = self.cache.get(CATALOG_KEY).await {
            tracing::trace!("Prompt catalog cache hit");
            return Ok(prompts);
        }

        let prompts = Arc::new(store.prompts().await?);
        self.cache.insert(CATALOG_KEY, prompts.clone()).await;

        tracing::debug!("Loaded {} prompts into the catalog cache", prompts.len());
        Ok(prompts)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_KEY).await;
    }
}
