use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use safeswap_preferences::{
    Comment, Comments, FavoriteItem, Favorites, KeyValueStore, RateInput, Ratings, SqliteStore,
    UserRating,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;

impl AppState {
    /// Preference storage of one profile.
    fn preferences(&self, profile: &str) -> Arc<dyn KeyValueStore> {
        Arc::new(SqliteStore::new(self.db.write_db.clone(), profile))
    }
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub ingredient_id: String,
    pub substitute_id: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteState {
    pub favorite: bool,
}

/// GET /api/profiles/{profile}/favorites
pub async fn list_favorites(
    State(app): State<AppState>,
    Path(profile): Path<String>,
) -> Result<Json<Vec<FavoriteItem>>, AppError> {
    let items = Favorites::new(app.preferences(&profile)).list().await?;

    Ok(Json(items))
}

/// POST /api/profiles/{profile}/favorites
///
/// Toggles the pair. Names are taken from the current catalog, so the pair
/// must exist there.
pub async fn toggle_favorite(
    State(app): State<AppState>,
    Path(profile): Path<String>,
    Json(input): Json<FavoriteRequest>,
) -> Result<Json<FavoriteState>, AppError> {
    let ingredients = app.ingredients().await?;

    let ingredient = ingredients
        .iter()
        .find(|i| i.id == input.ingredient_id)
        .ok_or_else(|| AppError::NotFound(format!("ingredient {}", input.ingredient_id)))?;
    let substitute = ingredient
        .find_substitute(&input.substitute_id)
        .ok_or_else(|| AppError::NotFound(format!("substitute {}", input.substitute_id)))?;

    let favorite = Favorites::new(app.preferences(&profile))
        .toggle(ingredient, substitute)
        .await?;

    Ok(Json(FavoriteState { favorite }))
}

/// DELETE /api/profiles/{profile}/favorites/{ingredient_id}/{substitute_id}
pub async fn remove_favorite(
    State(app): State<AppState>,
    Path((profile, ingredient_id, substitute_id)): Path<(String, String, String)>,
) -> Result<StatusCode, AppError> {
    let removed = Favorites::new(app.preferences(&profile))
        .remove(&ingredient_id, &substitute_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!(
            "favorite {ingredient_id}/{substitute_id}"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub ratings: Vec<UserRating>,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

/// GET /api/profiles/{profile}/substitutes/{substitute_id}/ratings
pub async fn list_ratings(
    State(app): State<AppState>,
    Path((profile, substitute_id)): Path<(String, String)>,
) -> Result<Json<RatingSummary>, AppError> {
    let ratings = Ratings::new(app.preferences(&profile));

    Ok(Json(RatingSummary {
        average: ratings.average(&substitute_id).await?,
        ratings: ratings.list(&substitute_id).await?,
    }))
}

/// POST /api/profiles/{profile}/substitutes/{substitute_id}/ratings
pub async fn add_rating(
    State(app): State<AppState>,
    Path((profile, substitute_id)): Path<(String, String)>,
    Json(input): Json<RatingRequest>,
) -> Result<(StatusCode, Json<UserRating>), AppError> {
    let rating = Ratings::new(app.preferences(&profile))
        .add(
            &substitute_id,
            RateInput {
                rating: input.rating,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rating)))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// GET /api/profiles/{profile}/substitutes/{substitute_id}/comments
pub async fn list_comments(
    State(app): State<AppState>,
    Path((profile, substitute_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = Comments::new(app.preferences(&profile))
        .list(&substitute_id)
        .await?;

    Ok(Json(comments))
}

/// POST /api/profiles/{profile}/substitutes/{substitute_id}/comments
pub async fn add_comment(
    State(app): State<AppState>,
    Path((profile, substitute_id)): Path<(String, String)>,
    Json(input): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = Comments::new(app.preferences(&profile))
        .add(&substitute_id, &input.text)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /api/profiles/{profile}/substitutes/{substitute_id}/comments/{comment_id}
pub async fn edit_comment(
    State(app): State<AppState>,
    Path((profile, substitute_id, comment_id)): Path<(String, String, String)>,
    Json(input): Json<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let comment = Comments::new(app.preferences(&profile))
        .edit(&substitute_id, &comment_id, &input.text)
        .await?;

    Ok(Json(comment))
}

/// DELETE /api/profiles/{profile}/substitutes/{substitute_id}/comments/{comment_id}
pub async fn delete_comment(
    State(app): State<AppState>,
    Path((profile, substitute_id, comment_id)): Path<(String, String, String)>,
) -> Result<StatusCode, AppError> {
    Comments::new(app.preferences(&profile))
        .delete(&substitute_id, &comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
