use std::sync::{Arc, PoisonError, RwLock};

use crate::{Ingredient, RecordSource, transform_records};

/// In-memory ingredient model rebuilt from a [`RecordSource`].
///
/// Readers get an `Arc` to the current snapshot. A refresh builds a whole new
/// model and swaps it in; if the fetch fails the previous snapshot is kept.
/// Concurrent refreshes are not coordinated, the last to finish wins.
pub struct Catalog {
    source: Arc<dyn RecordSource>,
    current: RwLock<Option<Arc<Vec<Ingredient>>>>,
}

impl Catalog {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            current: RwLock::new(None),
        }
    }

    /// Current snapshot, `None` until the first successful refresh.
    pub fn snapshot(&self) -> Option<Arc<Vec<Ingredient>>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    pub async fn refresh(&self) -> anyhow::Result<Arc<Vec<Ingredient>>> {
        let records = match self.source.fetch_ingredients().await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(error = %err, "catalog refresh failed, keeping previous snapshot");
                return Err(err);
            }
        };

        let ingredients = Arc::new(transform_records(records));

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(ingredients.clone());

        tracing::info!(ingredients = ingredients.len(), "catalog refreshed");

        Ok(ingredients)
    }

    /// Current snapshot, loading it first when nothing was fetched yet.
    pub async fn get_or_refresh(&self) -> anyhow::Result<Arc<Vec<Ingredient>>> {
        match self.snapshot() {
            Some(ingredients) => Ok(ingredients),
            None => self.refresh().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::{IngredientRecord, SubstituteRecord};

    struct FakeSource {
        fail: AtomicBool,
        name: &'static str,
    }

    #[async_trait::async_trait]
    impl RecordSource for Arc<FakeSource> {
        async fn fetch_ingredients(&self) -> anyhow::Result<Vec<IngredientRecord>> {
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("store unreachable");
            }

            Ok(vec![IngredientRecord {
                id: "1".to_owned(),
                name: self.name.to_owned(),
                category: Some("Dairy".to_owned()),
                substitutes: vec![SubstituteRecord {
                    id: Some("1-sub".to_owned()),
                    name: Some("Oat Milk".to_owned()),
                    ..Default::default()
                }],
            }])
        }
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_snapshot() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource {
            fail: AtomicBool::new(false),
            name: "Milk",
        });
        let catalog = Catalog::new(source.clone());

        assert!(!catalog.is_loaded());

        let first = catalog.refresh().await?;
        assert_eq!(first.len(), 1);

        source.fail.store(true, Ordering::SeqCst);
        assert!(catalog.refresh().await.is_err());

        let current = catalog.snapshot().expect("snapshot kept");
        assert!(Arc::ptr_eq(&first, &current));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_refresh_loads_once() -> anyhow::Result<()> {
        let source = Arc::new(FakeSource {
            fail: AtomicBool::new(false),
            name: "Milk",
        });
        let catalog = Catalog::new(source.clone());

        let first = catalog.get_or_refresh().await?;
        source.fail.store(true, Ordering::SeqCst);
        let second = catalog.get_or_refresh().await?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second[0].substitutes[0].name, "Oat Milk");

        Ok(())
    }
}
