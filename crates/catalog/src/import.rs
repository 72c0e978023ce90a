use safeswap_db::table::{Ingredient, Substitute};
use sea_query::{Expr, Func, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{RawRow, transform_rows_counted};

const BATCH_SIZE: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// The store already had ingredients, nothing was written.
    pub skipped: bool,
    pub ingredients: usize,
    pub substitutes: usize,
    pub rejected_rows: usize,
    /// Batches rolled back on a write error. The other batches still go in.
    pub failed_batches: usize,
    pub failed_ingredients: usize,
}

/// Seeds an empty store from raw rows.
///
/// Ingredients are written in batches, each batch in its own transaction.
/// A failing batch is rolled back, logged and counted in the report, and the
/// import moves on to the next one. A store that already holds ingredients
/// is left untouched.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub async fn import_rows(pool: &SqlitePool, rows: &[RawRow]) -> anyhow::Result<ImportReport> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(Ingredient::Id)))
        .from(Ingredient::Table)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (existing,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        tracing::info!(existing, "store already seeded, skipping import");

        return Ok(ImportReport {
            skipped: true,
            ..Default::default()
        });
    }

    let transformed = transform_rows_counted(rows);
    let mut report = ImportReport {
        rejected_rows: transformed.skipped,
        ..Default::default()
    };

    for (index, batch) in transformed.ingredients.chunks(BATCH_SIZE).enumerate() {
        match insert_batch(pool, batch).await {
            Ok(substitutes) => {
                report.ingredients += batch.len();
                report.substitutes += substitutes;

                tracing::debug!(batch = index, size = batch.len(), "imported ingredient batch");
            }
            Err(e) => {
                report.failed_batches += 1;
                report.failed_ingredients += batch.len();

                tracing::error!(batch = index, size = batch.len(), "ingredient batch rolled back: {e:#}");
            }
        }
    }

    tracing::info!(
        ingredients = report.ingredients,
        substitutes = report.substitutes,
        rejected_rows = report.rejected_rows,
        failed_batches = report.failed_batches,
        "catalog import finished"
    );

    Ok(report)
}

/// Writes one batch in its own transaction and returns the number of
/// substitutes written. Nothing of the batch is kept on error.
async fn insert_batch(pool: &SqlitePool, batch: &[crate::Ingredient]) -> anyhow::Result<usize> {
    let created_at = safeswap_shared::now_secs();
    let mut tx = pool.begin().await?;
    let mut substitutes = 0;

    for ingredient in batch {
        let statement = Query::insert()
            .into_table(Ingredient::Table)
            .columns([
                Ingredient::Id,
                Ingredient::Name,
                Ingredient::Category,
                Ingredient::CreatedAt,
            ])
            .values_panic([
                ingredient.id.to_owned().into(),
                ingredient.name.to_owned().into(),
                ingredient.category.to_string().into(),
                created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        for substitute in &ingredient.substitutes {
            let statement = Query::insert()
                .into_table(Substitute::Table)
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
                    Substitute::CreatedAt,
                ])
                .values_panic([
                    substitute.id.to_owned().into(),
                    ingredient.id.to_owned().into(),
                    substitute.name.to_owned().into(),
                    serde_json::to_string(&substitute.usage)?.into(),
                    substitute.notes.to_owned().into(),
                    serde_json::to_string(&substitute.safe_for)?.into(),
                    serde_json::to_string(&substitute.best_for)?.into(),
                    serde_json::to_string(&substitute.not_recommended_for)?.into(),
                    serde_json::to_string(&substitute.preparation_steps)?.into(),
                    substitute.quantity_conversion.to_owned().into(),
                    substitute.image_url.to_owned().into(),
                    Some(substitute.alt_text.to_owned()).into(),
                    created_at.into(),
                ])
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;

            substitutes += 1;
        }
    }

    tx.commit().await?;

    Ok(substitutes)
}
