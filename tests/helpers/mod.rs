//! Shared setup for router tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use safeswap::{AppState, create_app, db::create_pool};
use safeswap_catalog::{Catalog, RawRow, SqliteRecordSource, TextList, import_rows};
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub fn sheet() -> Vec<RawRow> {
    let mut oat = RawRow::new("Dairy", "Milk", "Oat Milk");
    oat.usage = Some(TextList::from("baking, coffee"));
    oat.safe_for = Some(TextList::from("vegan, dairy-free"));

    let mut almond = RawRow::new("Dairy", "Milk", "Almond Milk");
    almond.safe_for = Some(TextList::from("vegan, dairy-free, gluten-free"));

    let mut flax = RawRow::new("Egg", "Egg", "Flax Egg");
    flax.safe_for = Some(TextList::from("vegan"));
    flax.preparation_steps = Some(TextList::from(
        "Mix 1 tbsp flax with 3 tbsp water\nRest 5 minutes",
    ));

    vec![
        oat,
        almond,
        flax,
        RawRow::new("Fish-Seafood", "Fish Sauce", "Coconut Aminos"),
        RawRow::new("Grains", "Wheat Flour", "Rice Flour"),
    ]
}

/// Router over a migrated temp database seeded with [`sheet`].
pub async fn setup_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("safeswap.sqlite3").display());

    let write_db = create_pool(&url, 1).await?;
    safeswap_db::migrate(&write_db).await?;
    import_rows(&write_db, &sheet()).await?;

    let read_db = create_pool(&url, 2).await?;
    let state = AppState {
        catalog: Arc::new(Catalog::new(SqliteRecordSource(read_db.clone()))),
        db: safeswap_shared::State { read_db, write_db },
    };

    Ok(TestApp {
        router: create_app(state.clone()),
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, None).await
    }

    /// Sends one request, empty bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }
}
