mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

fn recipe() -> Value {
    json!({
        "name": "  Dairy-free Pancakes ",
        "instructions": "Whisk, rest, fry.",
        "ingredients": [
            {"quantity": 1.5, "unit": "cup", "name": "oat  milk"},
            {"quantity": 2, "unit": "piece", "name": "Banana"},
            {"quantity": 1, "name": "   "}
        ]
    })
}

#[tokio::test]
async fn test_submit_then_approve() -> anyhow::Result<()> {
    let app = helpers::setup_app().await?;

    let (status, body) = app.post("/api/recipes", recipe()).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_str().unwrap_or_default().to_owned();

    // pending recipes stay out of the public list
    let (_, body) = app.get("/api/recipes").await?;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let (status, body) = app.get("/api/moderation/recipes?status=pending").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let pending = &body[0];
    assert_eq!(pending["name"], "Dairy-free Pancakes");
    assert_eq!(pending["ingredients"].as_array().map(Vec::len), Some(2));
    assert_eq!(pending["ingredients"][0]["substitute_for"], "Milk");
    assert!(pending["ingredients"][1]["substitute_for"].is_null());

    let (status, _) = app
        .post(&format!("/api/moderation/recipes/{id}/approve"), Value::Null)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get("/api/recipes").await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["status"], "approved");

    Ok(())
}

#[tokio::test]
async fn test_reject_hides_recipe() -> anyhow::Result<()> {
    let app = helpers::setup_app().await?;

    let (_, body) = app.post("/api/recipes", recipe()).await?;
    let id = body["id"].as_str().unwrap_or_default().to_owned();

    let (status, _) = app
        .post(&format!("/api/moderation/recipes/{id}/reject"), Value::Null)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get("/api/recipes").await?;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let (_, body) = app.get("/api/moderation/recipes?status=rejected").await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = app.get("/api/moderation/recipes").await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_submit_validation() -> anyhow::Result<()> {
    let app = helpers::setup_app().await?;

    let (status, body) = app
        .post(
            "/api/recipes",
            json!({"name": "", "instructions": "Stir", "ingredients": []}),
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation Error");

    let (status, _) = app
        .post(
            "/api/recipes",
            json!({
                "name": "Toast",
                "instructions": "Toast it",
                "ingredients": [],
                "image_url": "not a url"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn test_moderation_errors() -> anyhow::Result<()> {
    let app = helpers::setup_app().await?;

    let (status, _) = app.get("/api/moderation/recipes?status=bogus").await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post("/api/moderation/recipes/missing/approve", Value::Null)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}
