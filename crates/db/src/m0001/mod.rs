mod ingredient;
mod preference_entry;
mod recipe;
mod substitute;
mod substitute_rating;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "safeswap",
    "m0001",
    vec_box![],
    vec_box![
        ingredient::CreateTable,
        ingredient::CreateIdx1,
        substitute::CreateTable,
        substitute::CreateIdx1,
        substitute_rating::CreateTable,
        substitute_rating::CreateIdx1,
        recipe::CreateTable,
        recipe::CreateIdx1,
        preference_entry::CreateTable
    ]
);
