use std::sync::Arc;

use safeswap_catalog::average_to_half;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{KeyValueStore, store};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub id: String,
    pub substitute_id: String,
    pub rating: u8,
    pub timestamp: u64,
}

#[derive(Validate)]
pub struct RateInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
}

/// Ratings a user gave to substitutes, one list per substitute.
#[derive(Clone)]
pub struct Ratings(Arc<dyn KeyValueStore>);

impl Ratings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self(store)
    }

    fn key(substitute_id: &str) -> String {
        format!("ratings-{substitute_id}")
    }

    pub async fn list(&self, substitute_id: &str) -> anyhow::Result<Vec<UserRating>> {
        store::load(self.0.as_ref(), &Self::key(substitute_id)).await
    }

    pub async fn add(
        &self,
        substitute_id: &str,
        input: RateInput,
    ) -> safeswap_shared::Result<UserRating> {
        input.validate()?;

        let rating = UserRating {
            id: ulid::Ulid::new().to_string(),
            substitute_id: substitute_id.to_owned(),
            rating: input.rating,
            timestamp: safeswap_shared::now_millis(),
        };

        store::modify(
            self.0.as_ref(),
            &Self::key(substitute_id),
            |ratings: &mut Vec<UserRating>| {
                ratings.push(rating.clone());
                Some(())
            },
        )
        .await?;

        Ok(rating)
    }

    /// Mean rating rounded to the nearest half, `0.0` without ratings.
    pub async fn average(&self, substitute_id: &str) -> anyhow::Result<f64> {
        let ratings = self.list(substitute_id).await?;

        Ok(average_to_half(ratings.iter().map(|r| r.rating)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_add_and_average() -> anyhow::Result<()> {
        let ratings = Ratings::new(Arc::new(MemoryStore::new()));

        assert_eq!(ratings.average("sub-1").await?, 0.0);

        for rating in [4, 5, 4] {
            ratings.add("sub-1", RateInput { rating }).await?;
        }
        ratings.add("sub-2", RateInput { rating: 1 }).await?;

        assert_eq!(ratings.list("sub-1").await?.len(), 3);
        assert_eq!(ratings.average("sub-1").await?, 4.5);
        assert_eq!(ratings.average("sub-2").await?, 1.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_is_rejected() -> anyhow::Result<()> {
        let ratings = Ratings::new(Arc::new(MemoryStore::new()));

        for rating in [0, 6] {
            let result = ratings.add("sub-1", RateInput { rating }).await;
            assert!(matches!(result, Err(safeswap_shared::Error::Validate(_))));
        }
        assert!(ratings.list("sub-1").await?.is_empty());

        Ok(())
    }
}
