use safeswap_shared::catalog::{Category, DietaryRestriction};

use crate::Ingredient;

/// Search criteria applied to the ingredient list. All set criteria must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientFilter {
    pub query: String,
    pub category: Option<Category>,
    pub dietary: Vec<DietaryRestriction>,
}

impl IngredientFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.category.is_none() && self.dietary.is_empty()
    }

    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        let query = self.query.trim().to_lowercase();

        self.category.is_none_or(|c| ingredient.category == c)
            && (query.is_empty() || matches_query(ingredient, &query))
            && satisfies_all_restrictions(ingredient, &self.dietary)
    }

    /// Matching ingredients, cloned out of `ingredients` in their original
    /// order.
    pub fn apply(&self, ingredients: &[Ingredient]) -> Vec<Ingredient> {
        ingredients
            .iter()
            .filter(|ingredient| self.matches(ingredient))
            .cloned()
            .collect()
    }
}

/// Filters ingredients by free text, category and dietary restrictions.
///
/// # Business Rules
/// - **Category**: exact match when set
/// - **Query**: trimmed, case-insensitive substring of the ingredient name or
///   of any substitute's name, usage tag, dietary tag or notes
/// - **Dietary (AND logic)**: every requested restriction is satisfied by at
///   least one substitute; they need not share a substitute
/// - Empty criteria return the input unchanged
///
/// # Examples
/// ```
/// use safeswap_catalog::{filter_ingredients, transform_rows, RawRow, TextList};
/// use safeswap_catalog::DietaryRestriction;
///
/// let mut row = RawRow::new("Dairy", "Milk", "Oat Milk");
/// row.safe_for = Some(TextList::from("vegan"));
/// let ingredients = transform_rows(&[row, RawRow::new("Egg", "Egg", "Flax Egg")]);
///
/// let filtered = filter_ingredients(ingredients, "", None, &[DietaryRestriction::Vegan]);
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered[0].name, "Milk");
/// ```
pub fn filter_ingredients(
    ingredients: Vec<Ingredient>,
    query: &str,
    category: Option<Category>,
    dietary: &[DietaryRestriction],
) -> Vec<Ingredient> {
    let filter = IngredientFilter {
        query: query.to_owned(),
        category,
        dietary: dietary.to_vec(),
    };

    if filter.is_empty() {
        return ingredients;
    }

    ingredients
        .into_iter()
        .filter(|ingredient| filter.matches(ingredient))
        .collect()
}

fn matches_query(ingredient: &Ingredient, query: &str) -> bool {
    if ingredient.name.to_lowercase().contains(query) {
        return true;
    }

    ingredient.substitutes.iter().any(|substitute| {
        substitute.name.to_lowercase().contains(query)
            || substitute.notes.to_lowercase().contains(query)
            || substitute
                .usage
                .iter()
                .any(|usage| usage.to_lowercase().contains(query))
            || substitute
                .safe_for
                .iter()
                .any(|tag| tag.as_ref().contains(query))
    })
}

fn satisfies_all_restrictions(ingredient: &Ingredient, restrictions: &[DietaryRestriction]) -> bool {
    restrictions
        .iter()
        .all(|restriction| ingredient.satisfies(restriction))
}
