mod health;
mod ingredients;
mod preferences;
mod recipes;

pub use health::*;
pub use ingredients::*;
pub use preferences::*;
pub use recipes::*;

use std::sync::Arc;

use safeswap_catalog::{Catalog, Ingredient};

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: safeswap_shared::State,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Current ingredient snapshot, loaded on first use.
    pub async fn ingredients(&self) -> Result<Arc<Vec<Ingredient>>, AppError> {
        self.catalog
            .get_or_refresh()
            .await
            .map_err(|e| AppError::CatalogUnavailable(format!("{e:#}")))
    }
}
