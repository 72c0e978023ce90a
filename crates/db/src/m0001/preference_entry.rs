use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::PreferenceEntry;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(PreferenceEntry::Table)
        .col(
            ColumnDef::new(PreferenceEntry::Namespace)
                .string()
                .not_null()
                .string_len(64),
        )
        .col(
            ColumnDef::new(PreferenceEntry::Key)
                .string()
                .not_null()
                .string_len(128),
        )
        .col(ColumnDef::new(PreferenceEntry::Value).text().not_null())
        .col(
            ColumnDef::new(PreferenceEntry::UpdatedAt)
                .big_integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .col(PreferenceEntry::Namespace)
                .col(PreferenceEntry::Key),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(PreferenceEntry::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
