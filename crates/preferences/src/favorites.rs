use std::sync::Arc;

use safeswap_catalog::{Ingredient, Substitute};
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, store};

const KEY: &str = "favorites";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub substitute_id: String,
    pub substitute_name: String,
    pub timestamp: u64,
}

impl FavoriteItem {
    fn is(&self, ingredient_id: &str, substitute_id: &str) -> bool {
        self.ingredient_id == ingredient_id && self.substitute_id == substitute_id
    }
}

/// Favorite substitutes, keyed by `(ingredient_id, substitute_id)`.
#[derive(Clone)]
pub struct Favorites(Arc<dyn KeyValueStore>);

impl Favorites {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self(store)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<FavoriteItem>> {
        store::load(self.0.as_ref(), KEY).await
    }

    pub async fn is_favorite(&self, ingredient_id: &str, substitute_id: &str) -> anyhow::Result<bool> {
        Ok(self
            .list()
            .await?
            .iter()
            .any(|item| item.is(ingredient_id, substitute_id)))
    }

    /// Adds the pair when absent, removes it when present. Returns whether it
    /// is a favorite afterwards.
    pub async fn toggle(
        &self,
        ingredient: &Ingredient,
        substitute: &Substitute,
    ) -> anyhow::Result<bool> {
        let item = FavoriteItem {
            ingredient_id: ingredient.id.to_owned(),
            ingredient_name: ingredient.name.to_owned(),
            substitute_id: substitute.id.to_owned(),
            substitute_name: substitute.name.to_owned(),
            timestamp: safeswap_shared::now_millis(),
        };

        let added = store::modify(self.0.as_ref(), KEY, |items: &mut Vec<FavoriteItem>| {
            let before = items.len();
            items.retain(|i| !i.is(&item.ingredient_id, &item.substitute_id));

            let added = items.len() == before;
            if added {
                items.push(item);
            }

            Some(added)
        })
        .await?;

        Ok(added.unwrap_or_default())
    }

    /// Returns `false` when the pair was not a favorite.
    pub async fn remove(&self, ingredient_id: &str, substitute_id: &str) -> anyhow::Result<bool> {
        let removed = store::modify(self.0.as_ref(), KEY, |items: &mut Vec<FavoriteItem>| {
            let before = items.len();
            items.retain(|item| !item.is(ingredient_id, substitute_id));

            (items.len() < before).then_some(())
        })
        .await?;

        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use safeswap_catalog::{RawRow, transform_rows};

    fn fixture() -> Vec<Ingredient> {
        transform_rows(&[
            RawRow::new("Dairy", "Milk", "Oat Milk"),
            RawRow::new("Dairy", "Milk", "Soy Milk"),
        ])
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() -> anyhow::Result<()> {
        let favorites = Favorites::new(Arc::new(MemoryStore::new()));
        let ingredients = fixture();
        let milk = &ingredients[0];

        assert!(favorites.toggle(milk, &milk.substitutes[0]).await?);
        assert!(favorites.toggle(milk, &milk.substitutes[1]).await?);
        assert!(favorites.is_favorite(&milk.id, &milk.substitutes[0].id).await?);

        let items = favorites.list().await?;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ingredient_name, "Milk");
        assert_eq!(items[0].substitute_name, "Oat Milk");

        assert!(!favorites.toggle(milk, &milk.substitutes[0]).await?);
        assert!(!favorites.is_favorite(&milk.id, &milk.substitutes[0].id).await?);
        assert_eq!(favorites.list().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove() -> anyhow::Result<()> {
        let favorites = Favorites::new(Arc::new(MemoryStore::new()));
        let ingredients = fixture();
        let milk = &ingredients[0];

        favorites.toggle(milk, &milk.substitutes[1]).await?;

        assert!(!favorites.remove(&milk.id, &milk.substitutes[0].id).await?);
        assert!(favorites.remove(&milk.id, &milk.substitutes[1].id).await?);
        assert!(favorites.list().await?.is_empty());

        Ok(())
    }
}
