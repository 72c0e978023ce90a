use serde::{Deserialize, Serialize};

use safeswap_shared::catalog::{Category, DietaryRestriction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub substitutes: Vec<Substitute>,
}

impl Ingredient {
    pub fn find_substitute(&self, substitute_id: &str) -> Option<&Substitute> {
        self.substitutes.iter().find(|s| s.id == substitute_id)
    }

    /// True when at least one substitute is safe for `restriction`.
    pub fn satisfies(&self, restriction: &DietaryRestriction) -> bool {
        self.substitutes
            .iter()
            .any(|s| restriction.exists_in(&s.safe_for))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitute {
    pub id: String,
    pub name: String,
    pub usage: Vec<String>,
    pub notes: String,
    pub safe_for: Vec<DietaryRestriction>,
    pub best_for: Vec<String>,
    pub not_recommended_for: Vec<String>,
    pub preparation_steps: Vec<String>,
    pub quantity_conversion: Option<String>,
    pub image_url: Option<String>,
    pub alt_text: String,
    pub ratings: Vec<Rating>,
}

impl Substitute {
    pub fn average_rating(&self) -> f64 {
        average_to_half(self.ratings.iter().map(|r| r.rating))
    }
}

/// Remote rating joined onto a substitute. Read only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub substitute_id: String,
    pub user_id: Option<String>,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: u64,
}

/// Mean of the values rounded to the nearest half star, `0.0` when empty.
pub fn average_to_half(values: impl IntoIterator<Item = u8>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), v| (sum + v as u32, count + 1));

    if count == 0 {
        return 0.0;
    }

    let mean = sum as f64 / count as f64;
    (mean * 2.0).round() / 2.0
}
