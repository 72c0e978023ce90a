use safeswap_db::table::Recipe;
use safeswap_shared::{not_found, recipe::Status};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    pub async fn approve(&self, id: impl Into<String>) -> safeswap_shared::Result<()> {
        self.set_status(id.into(), Status::Approved).await
    }

    pub async fn reject(&self, id: impl Into<String>) -> safeswap_shared::Result<()> {
        self.set_status(id.into(), Status::Rejected).await
    }

    async fn set_status(&self, id: String, status: Status) -> safeswap_shared::Result<()> {
        let statement = Query::select()
            .column(Recipe::Status)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(&id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let current = sqlx::query_as_with::<_, (sqlx::types::Text<Status>,), _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        let Some((current,)) = current else {
            not_found!("recipe {id}");
        };

        if current.0 == status {
            return Ok(());
        }

        let statement = Query::update()
            .table(Recipe::Table)
            .values([
                (Recipe::Status, status.to_string().into()),
                (Recipe::UpdatedAt, safeswap_shared::now_secs().into()),
            ])
            .and_where(Expr::col(Recipe::Id).eq(&id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        tracing::info!(recipe_id = %id, from = %current.0, to = %status, "recipe status changed");

        Ok(())
    }
}
