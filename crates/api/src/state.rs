//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::IngredientCache;
use crate::config::ApiConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the response cache. The
/// pool is created once by the entry point and injected here; nothing in
/// the codebase reaches for a global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    ingredient_cache: IngredientCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                ingredient_cache: IngredientCache::new(),
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the ingredients-by-product response cache.
    #[must_use]
    pub fn ingredient_cache(&self) -> &IngredientCache {
        &self.inner.ingredient_cache
    }
}
