use std::collections::HashMap;

use safeswap_db::table::{Ingredient, Substitute, SubstituteRating};
use sea_query::{Expr, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool, prelude::FromRow, types::Json};

use crate::{IngredientRecord, RatingRecord, SubstituteRecord};

/// Where the catalog rows come from.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Every ingredient with its substitutes and their ratings, ordered by
    /// ingredient name.
    async fn fetch_ingredients(&self) -> anyhow::Result<Vec<IngredientRecord>>;
}

#[derive(Clone)]
pub struct SqliteRecordSource(pub SqlitePool);

#[derive(Debug, FromRow)]
struct IngredientRow {
    id: String,
    name: String,
    category: String,
}

#[derive(Debug, FromRow)]
struct SubstituteRow {
    id: String,
    ingredient_id: String,
    name: String,
    usage: Json<Vec<String>>,
    notes: Option<String>,
    safe_for: Json<Vec<String>>,
    best_for: Json<Vec<String>>,
    not_recommended_for: Json<Vec<String>>,
    preparation_steps: Json<Vec<String>>,
    quantity_conversion: Option<String>,
    image_url: Option<String>,
    alt_text: Option<String>,
}

#[derive(Debug, FromRow)]
struct RatingRow {
    id: String,
    substitute_id: String,
    user_id: String,
    rating: i64,
    comment: Option<String>,
    created_at: i64,
}

impl SqliteRecordSource {
    async fn ingredients(conn: &mut SqliteConnection) -> anyhow::Result<Vec<IngredientRow>> {
        let statement = sea_query::Query::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::Category])
            .from(Ingredient::Table)
            .order_by(Ingredient::Name, Order::Asc)
            .order_by(Ingredient::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&mut *conn)
            .await?)
    }

    async fn substitutes(conn: &mut SqliteConnection) -> anyhow::Result<Vec<SubstituteRow>> {
        let statement = sea_query::Query::select()
            .columns([
                Substitute::Id,
                Substitute::IngredientId,
                Substitute::Name,
                Substitute::Usage,
                Substitute::Notes,
                Substitute::SafeFor,
                Substitute::BestFor,
                Substitute::NotRecommendedFor,
                Substitute::PreparationSteps,
                Substitute::QuantityConversion,
                Substitute::ImageUrl,
                Substitute::AltText,
            ])
            .from(Substitute::Table)
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, SubstituteRow, _>(&sql, values)
            .fetch_all(&mut *conn)
            .await?)
    }

    async fn ratings(conn: &mut SqliteConnection) -> anyhow::Result<Vec<RatingRow>> {
        let statement = sea_query::Query::select()
            .columns([
                SubstituteRating::Id,
                SubstituteRating::SubstituteId,
                SubstituteRating::UserId,
                SubstituteRating::Rating,
                SubstituteRating::Comment,
                SubstituteRating::CreatedAt,
            ])
            .from(SubstituteRating::Table)
            .order_by(SubstituteRating::CreatedAt, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RatingRow, _>(&sql, values)
            .fetch_all(&mut *conn)
            .await?)
    }
}

#[async_trait::async_trait]
impl RecordSource for SqliteRecordSource {
    /// The three selects share one read transaction, so a concurrent write
    /// is either fully visible or not at all.
    #[tracing::instrument(skip(self))]
    async fn fetch_ingredients(&self) -> anyhow::Result<Vec<IngredientRecord>> {
        let mut tx = self.0.begin().await?;
        let ingredients = Self::ingredients(&mut tx).await?;
        let substitutes = Self::substitutes(&mut tx).await?;
        let ratings = Self::ratings(&mut tx).await?;
        tx.commit().await?;

        let mut ratings_by_substitute: HashMap<String, Vec<RatingRecord>> = HashMap::new();
        for row in ratings {
            ratings_by_substitute
                .entry(row.substitute_id)
                .or_default()
                .push(RatingRecord {
                    id: Some(row.id),
                    user_id: Some(row.user_id),
                    rating: row.rating,
                    comment: row.comment,
                    created_at: row.created_at,
                });
        }

        let mut substitutes_by_ingredient: HashMap<String, Vec<SubstituteRecord>> =
            HashMap::new();
        for row in substitutes {
            let ratings = ratings_by_substitute.remove(&row.id).unwrap_or_default();

            substitutes_by_ingredient
                .entry(row.ingredient_id)
                .or_default()
                .push(SubstituteRecord {
                    id: Some(row.id),
                    name: Some(row.name),
                    usage: row.usage.0,
                    notes: row.notes,
                    safe_for: row.safe_for.0,
                    best_for: row.best_for.0,
                    not_recommended_for: row.not_recommended_for.0,
                    preparation_steps: row.preparation_steps.0,
                    quantity_conversion: row.quantity_conversion,
                    image_url: row.image_url,
                    alt_text: row.alt_text,
                    ratings,
                });
        }

        let records = ingredients
            .into_iter()
            .map(|row| IngredientRecord {
                substitutes: substitutes_by_ingredient
                    .remove(&row.id)
                    .unwrap_or_default(),
                id: row.id,
                name: row.name,
                category: Some(row.category),
            })
            .collect::<Vec<_>>();

        tracing::debug!(ingredients = records.len(), "fetched catalog records");

        Ok(records)
    }
}
