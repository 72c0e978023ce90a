use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// High-level display category of an ingredient.
///
/// `Other` is the catch-all for anything the classifier cannot place.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Dairy,
    Eggs,
    Proteins,
    Grains,
    NutsSeeds,
    Beverages,
    Produce,
    Sweeteners,
    Thickeners,
    Condiments,
    #[default]
    Other,
}

/// Closed set of dietary restrictions a substitute can be safe for.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DietaryRestriction {
    Vegan,
    Vegetarian,
    GlutenFree,
    DairyFree,
    NutFree,
    SoyFree,
    CornFree,
}

impl DietaryRestriction {
    /// Parses a free-text tag. Anything outside the closed set is `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        tag.trim().to_lowercase().parse().ok()
    }

    pub fn exists_in<'a>(
        &self,
        iterator: impl IntoIterator<Item = &'a DietaryRestriction>,
    ) -> bool {
        iterator.into_iter().any(|d| d == self)
    }
}
