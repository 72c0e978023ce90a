use axum::{
    Json,
    extract::{Path, Query, State},
};
use safeswap_catalog::{
    AlternativeFacet, Category, CategoryCount, DietaryRestriction, Ingredient, IngredientFilter,
    alternative_facets, category_counts, filter_by_alternatives,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    /// Comma separated dietary tags, unknown tags are ignored.
    pub diet: Option<String>,
    /// Comma separated alternative facet ids.
    pub alternatives: Option<String>,
}

impl SearchParams {
    pub fn filter(&self) -> Result<IngredientFilter, AppError> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<Category>().map_err(|_| {
                AppError::ValidationError(format!("unknown category '{value}'"))
            })?),
        };

        Ok(IngredientFilter {
            query: self.q.clone().unwrap_or_default(),
            category,
            dietary: split_list(self.diet.as_deref())
                .iter()
                .filter_map(|tag| DietaryRestriction::parse(tag))
                .collect(),
        })
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

/// GET /api/ingredients
pub async fn list_ingredients(
    State(app): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let filter = params.filter()?;
    let ingredients = app.ingredients().await?;

    let matches = filter.apply(&ingredients);
    let matches = filter_by_alternatives(matches, &split_list(params.alternatives.as_deref()));

    Ok(Json(matches))
}

/// GET /api/ingredients/{id}
pub async fn get_ingredient(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>, AppError> {
    let ingredients = app.ingredients().await?;

    ingredients
        .iter()
        .find(|i| i.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id}")))
}

#[derive(Debug, Serialize)]
pub struct Facets {
    pub alternatives: Vec<AlternativeFacet>,
    pub categories: Vec<CategoryCount>,
}

/// GET /api/facets
pub async fn get_facets(State(app): State<AppState>) -> Result<Json<Facets>, AppError> {
    let ingredients = app.ingredients().await?;

    Ok(Json(Facets {
        alternatives: alternative_facets(&ingredients),
        categories: category_counts(&ingredients),
    }))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub ingredients: usize,
}

/// POST /api/catalog/refresh
///
/// Rebuilds the snapshot from the database. On failure the previous snapshot
/// keeps serving.
pub async fn refresh_catalog(
    State(app): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let ingredients = app
        .catalog
        .refresh()
        .await
        .map_err(|e| AppError::CatalogUnavailable(format!("{e:#}")))?;

    Ok(Json(RefreshResponse {
        ingredients: ingredients.len(),
    }))
}
