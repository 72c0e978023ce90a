use safeswap_db::table::Recipe;
use safeswap_shared::recipe::{RecipeIngredient, Status};
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub ingredients: sqlx::types::Json<Vec<RecipeIngredient>>,
    pub image_url: Option<String>,
    pub status: sqlx::types::Text<Status>,
    pub created_at: u64,
    pub updated_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub image_url: Option<String>,
    pub status: Status,
    pub created_at: u64,
    pub updated_at: Option<u64>,
}

impl From<RecipeRow> for RecipeView {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            instructions: row.instructions,
            ingredients: row.ingredients.0,
            image_url: row.image_url,
            status: row.status.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    fn select() -> SelectStatement {
        sea_query::Query::select()
            .columns([
                Recipe::Id,
                Recipe::Name,
                Recipe::Instructions,
                Recipe::Ingredients,
                Recipe::ImageUrl,
                Recipe::Status,
                Recipe::CreatedAt,
                Recipe::UpdatedAt,
            ])
            .from(Recipe::Table)
            .to_owned()
    }

    /// Newest first, optionally restricted to one status.
    pub async fn list(&self, status: Option<Status>) -> anyhow::Result<Vec<RecipeView>> {
        let mut statement = Self::select();

        if let Some(status) = status {
            statement.and_where(Expr::col(Recipe::Status).eq(status.to_string()));
        }

        statement
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc);

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(RecipeView::from).collect())
    }

    pub async fn list_approved(&self) -> anyhow::Result<Vec<RecipeView>> {
        self.list(Some(Status::Approved)).await
    }

    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<RecipeView>> {
        let statement = Self::select()
            .and_where(Expr::col(Recipe::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.map(RecipeView::from))
    }
}
