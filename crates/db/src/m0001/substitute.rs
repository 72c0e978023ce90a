use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, IndexDropStatement,
    Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Ingredient, Substitute};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Substitute::Table)
        .col(
            ColumnDef::new(Substitute::Id)
                .string()
                .not_null()
                .string_len(64)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Substitute::IngredientId)
                .string()
                .not_null()
                .string_len(64),
        )
        .col(
            ColumnDef::new(Substitute::Name)
                .string()
                .not_null()
                .string_len(100),
        )
        .col(
            ColumnDef::new(Substitute::Usage)
                .json_binary()
                .not_null()
                .default("[]"),
        )
        .col(ColumnDef::new(Substitute::Notes).text().null())
        .col(
            ColumnDef::new(Substitute::SafeFor)
                .json_binary()
                .not_null()
                .default("[]"),
        )
        .col(
            ColumnDef::new(Substitute::BestFor)
                .json_binary()
                .not_null()
                .default("[]"),
        )
        .col(
            ColumnDef::new(Substitute::NotRecommendedFor)
                .json_binary()
                .not_null()
                .default("[]"),
        )
        .col(
            ColumnDef::new(Substitute::PreparationSteps)
                .json_binary()
                .not_null()
                .default("[]"),
        )
        .col(
            ColumnDef::new(Substitute::QuantityConversion)
                .string()
                .null()
                .string_len(255),
        )
        .col(ColumnDef::new(Substitute::ImageUrl).text().null())
        .col(ColumnDef::new(Substitute::AltText).text().null())
        .col(
            ColumnDef::new(Substitute::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Substitute::Table, Substitute::IngredientId)
                .to(Ingredient::Table, Ingredient::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Substitute::Table).to_owned()
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

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_substitute_ingredient_id")
        .table(Substitute::Table)
        .col(Substitute::IngredientId)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_substitute_ingredient_id")
        .table(Substitute::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
