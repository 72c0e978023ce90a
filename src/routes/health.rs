use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness check
///
/// Checks that the database answers. The catalog state is reported but does
/// not gate readiness since it loads lazily.
pub async fn ready(State(app): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&app.db.read_db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "catalog_loaded": app.catalog.is_loaded()
            })),
        ),
        Err(e) => {
            tracing::error!("Readiness check failed: database unavailable - {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "reason": "database_unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use safeswap_catalog::{Catalog, SqliteRecordSource};
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_endpoint_with_valid_db() {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let app = AppState {
            db: safeswap_shared::State::single(pool.clone()),
            catalog: Arc::new(Catalog::new(SqliteRecordSource(pool))),
        };

        let response = ready(State(app)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_endpoint_with_closed_db() {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        pool.close().await;

        let app = AppState {
            db: safeswap_shared::State::single(pool.clone()),
            catalog: Arc::new(Catalog::new(SqliteRecordSource(pool))),
        };

        let response = ready(State(app)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
