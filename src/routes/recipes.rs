use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use safeswap_catalog::SubstituteLookup;
use safeswap_recipe::{Command, RecipeView, Status, SubmitRecipeInput};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;

/// GET /api/recipes - approved recipes only
pub async fn list_recipes(State(app): State<AppState>) -> Result<Json<Vec<RecipeView>>, AppError> {
    let recipes = safeswap_recipe::Query(app.db.read_db.clone())
        .list_approved()
        .await?;

    Ok(Json(recipes))
}

#[derive(Debug, Serialize)]
pub struct SubmittedRecipe {
    pub id: String,
    pub status: Status,
}

/// POST /api/recipes
pub async fn submit_recipe(
    State(app): State<AppState>,
    Json(input): Json<SubmitRecipeInput>,
) -> Result<(StatusCode, Json<SubmittedRecipe>), AppError> {
    let ingredients = app.ingredients().await?;
    let lookup = SubstituteLookup::new(&ingredients);

    let id = Command(app.db.write_db.clone())
        .submit(input, &lookup)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedRecipe {
            id,
            status: Status::Pending,
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ModerationParams {
    pub status: Option<String>,
}

/// GET /api/moderation/recipes?status=
pub async fn list_moderation_recipes(
    State(app): State<AppState>,
    Query(params): Query<ModerationParams>,
) -> Result<Json<Vec<RecipeView>>, AppError> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse::<Status>().map_err(|_| {
            AppError::ValidationError(format!("unknown status '{value}'"))
        })?),
    };

    let recipes = safeswap_recipe::Query(app.db.read_db.clone())
        .list(status)
        .await?;

    Ok(Json(recipes))
}

/// POST /api/moderation/recipes/{id}/approve
pub async fn approve_recipe(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    Command(app.db.write_db.clone()).approve(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/moderation/recipes/{id}/reject
pub async fn reject_recipe(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    Command(app.db.write_db.clone()).reject(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
