use serde::Serialize;
use strum::VariantArray;

use safeswap_shared::catalog::Category;

use crate::Ingredient;

/// "Alternative for X" option shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternativeFacet {
    pub id: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

pub fn alternative_facet_id(ingredient_name: &str) -> String {
    let name = ingredient_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    format!("alternative-for-{name}")
}

/// One facet per distinct ingredient name, sorted by label. The count is the
/// number of substitutes across every ingredient sharing the facet id.
pub fn alternative_facets(ingredients: &[Ingredient]) -> Vec<AlternativeFacet> {
    let mut facets: Vec<AlternativeFacet> = vec![];

    for ingredient in ingredients {
        let id = alternative_facet_id(&ingredient.name);

        match facets.iter_mut().find(|f| f.id == id) {
            Some(facet) => facet.count += ingredient.substitutes.len(),
            None => facets.push(AlternativeFacet {
                id,
                label: ingredient.name.trim().to_owned(),
                count: ingredient.substitutes.len(),
            }),
        }
    }

    facets.sort_by(|a, b| a.label.cmp(&b.label));
    facets
}

pub fn filter_by_alternatives(ingredients: Vec<Ingredient>, selected: &[String]) -> Vec<Ingredient> {
    if selected.is_empty() {
        return ingredients;
    }

    ingredients
        .into_iter()
        .filter(|ingredient| selected.contains(&alternative_facet_id(&ingredient.name)))
        .collect()
}

/// Ingredients per category, every category listed in declaration order.
pub fn category_counts(ingredients: &[Ingredient]) -> Vec<CategoryCount> {
    Category::VARIANTS
        .iter()
        .map(|category| CategoryCount {
            category: *category,
            count: ingredients
                .iter()
                .filter(|i| i.category == *category)
                .count(),
        })
        .collect()
}
