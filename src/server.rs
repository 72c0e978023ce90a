//! HTTP server built on Axum

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::routes::{
    AppState, add_comment, add_rating, approve_recipe, delete_comment, edit_comment, get_facets,
    get_ingredient, health, list_comments, list_favorites, list_ingredients,
    list_moderation_recipes, list_ratings, list_recipes, ready, refresh_catalog, reject_recipe,
    remove_favorite, submit_recipe, toggle_favorite,
};

/// Build the application router
///
/// Used by `serve` and by integration tests without binding a socket.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/api/ingredients", get(list_ingredients))
        .route("/api/ingredients/{id}", get(get_ingredient))
        .route("/api/facets", get(get_facets))
        .route("/api/catalog/refresh", post(refresh_catalog))
        .route(
            "/api/profiles/{profile}/favorites",
            get(list_favorites).post(toggle_favorite),
        )
        .route(
            "/api/profiles/{profile}/favorites/{ingredient_id}/{substitute_id}",
            axum::routing::delete(remove_favorite),
        )
        .route(
            "/api/profiles/{profile}/substitutes/{substitute_id}/ratings",
            get(list_ratings).post(add_rating),
        )
        .route(
            "/api/profiles/{profile}/substitutes/{substitute_id}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/api/profiles/{profile}/substitutes/{substitute_id}/comments/{comment_id}",
            put(edit_comment).delete(delete_comment),
        )
        .route("/api/recipes", get(list_recipes).post(submit_recipe))
        .route("/api/moderation/recipes", get(list_moderation_recipes))
        .route("/api/moderation/recipes/{id}/approve", post(approve_recipe))
        .route("/api/moderation/recipes/{id}/reject", post(reject_recipe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
