use safeswap_db::table::PreferenceEntry;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::{KeyValueStore, Update};

/// Preference entries persisted in `preference_entry`, scoped by namespace
/// (one namespace per profile).
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    namespace: String,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }

    async fn read<'e>(
        &self,
        executor: impl SqliteExecutor<'e>,
        key: &str,
    ) -> anyhow::Result<Option<String>> {
        let statement = Query::select()
            .column(PreferenceEntry::Value)
            .from(PreferenceEntry::Table)
            .and_where(Expr::col(PreferenceEntry::Namespace).eq(&self.namespace))
            .and_where(Expr::col(PreferenceEntry::Key).eq(key))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let value = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(executor)
            .await?;

        Ok(value.map(|(value,)| value))
    }

    async fn write<'e>(
        &self,
        executor: impl SqliteExecutor<'e>,
        key: &str,
        value: String,
    ) -> anyhow::Result<()> {
        let statement = Query::insert()
            .into_table(PreferenceEntry::Table)
            .columns([
                PreferenceEntry::Namespace,
                PreferenceEntry::Key,
                PreferenceEntry::Value,
                PreferenceEntry::UpdatedAt,
            ])
            .values_panic([
                self.namespace.to_owned().into(),
                key.to_owned().into(),
                value.into(),
                safeswap_shared::now_millis().into(),
            ])
            .on_conflict(
                OnConflict::columns([PreferenceEntry::Namespace, PreferenceEntry::Key])
                    .update_columns([PreferenceEntry::Value, PreferenceEntry::UpdatedAt])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(executor).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.read(&self.pool, key).await
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.write(&self.pool, key, value).await
    }

    /// Runs inside `BEGIN IMMEDIATE` so concurrent writers queue on the
    /// database write lock instead of overwriting each other.
    async fn update(&self, key: &str, f: &mut Update<'_>) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = async {
            let current = self.read(&mut *conn, key).await?;
            if let Some(value) = f(current)? {
                self.write(&mut *conn, key, value).await?;
            }

            anyhow::Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
                    conn.close_on_drop();
                    return Err(e.into());
                }

                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    tracing::error!("preference update rollback failed: {rollback}");
                    conn.close_on_drop();
                }
                Err(e)
            }
        }
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let statement = Query::delete()
            .from_table(PreferenceEntry::Table)
            .and_where(Expr::col(PreferenceEntry::Namespace).eq(&self.namespace))
            .and_where(Expr::col(PreferenceEntry::Key).eq(key))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }
}
