//! In-process cache for ingredients-by-product responses.
//!
//! Recipe ingredient lists change only when the upstream ERP publishes a
//! new recipe version, so the dashboard serves them from a bounded
//! `moka` cache (capacity 1000 entries, 5 minute TTL) keyed by production
//! order number.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::models::order_detail::IngredientsByProduct;

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Bounded TTL cache for ingredient lookups.
#[derive(Clone)]
pub struct IngredientCache {
    inner: Cache<String, Arc<IngredientsByProduct>>,
}

impl IngredientCache {
    #[must_use]
    pub fn new() -> Self {
        let inner = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { inner }
    }

    /// Look up a cached response by trimmed production order number.
    pub async fn get(&self, production_order_number: &str) -> Option<Arc<IngredientsByProduct>> {
        self.inner.get(production_order_number).await
    }

    /// Store a response.
    pub async fn insert(&self, production_order_number: String, value: Arc<IngredientsByProduct>) {
        self.inner.insert(production_order_number, value).await;
    }
}

impl Default for IngredientCache {
    fn default() -> Self {
        Self::new()
    }
}
