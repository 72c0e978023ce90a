use serde::{Deserialize, Serialize};

/// Joined shape returned by a record store: ingredient with its substitutes
/// and their ratings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngredientRecord {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub substitutes: Vec<SubstituteRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstituteRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub usage: Vec<String>,
    pub notes: Option<String>,
    pub safe_for: Vec<String>,
    pub best_for: Vec<String>,
    pub not_recommended_for: Vec<String>,
    pub preparation_steps: Vec<String>,
    pub quantity_conversion: Option<String>,
    pub image_url: Option<String>,
    pub alt_text: Option<String>,
    pub ratings: Vec<RatingRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingRecord {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}
