mod helpers;

use std::sync::Arc;

use safeswap_catalog::{RawRow, transform_rows};
use safeswap_preferences::{
    Comments, Favorites, KeyValueStore, RateInput, Ratings, SqliteStore,
};
use temp_dir::TempDir;

#[tokio::test]
async fn test_entries_are_scoped_by_namespace() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;

    let alice = SqliteStore::new(pool.clone(), "alice");
    let bob = SqliteStore::new(pool, "bob");

    alice.set("favorites", "[]".to_owned()).await?;
    alice.set("favorites", "[1]".to_owned()).await?;

    assert_eq!(alice.get("favorites").await?.as_deref(), Some("[1]"));
    assert_eq!(bob.get("favorites").await?, None);

    alice.remove("favorites").await?;
    assert_eq!(alice.get("favorites").await?, None);

    Ok(())
}

#[tokio::test]
async fn test_preferences_survive_a_new_store_handle() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let ingredients = transform_rows(&[RawRow::new("Dairy", "Milk", "Oat Milk")]);
    let milk = &ingredients[0];
    let oat = &milk.substitutes[0];

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(pool.clone(), "alice"));
        Favorites::new(store.clone()).toggle(milk, oat).await?;
        Ratings::new(store.clone())
            .add(&oat.id, RateInput { rating: 5 })
            .await?;
        Comments::new(store).add(&oat.id, "creamy").await?;
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(pool, "alice"));

    assert!(Favorites::new(store.clone()).is_favorite(&milk.id, &oat.id).await?);
    assert_eq!(Ratings::new(store.clone()).average(&oat.id).await?, 5.0);
    assert_eq!(Comments::new(store).list(&oat.id).await?[0].text, "creamy");

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_all_kept() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;

    let tasks = (0..20)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(pool, "alice"));
                Comments::new(store.clone())
                    .add("sub-1", &format!("comment {i}"))
                    .await?;
                Ratings::new(store)
                    .add("sub-1", RateInput { rating: 4 })
                    .await?;

                anyhow::Ok(())
            })
        })
        .collect::<Vec<_>>();

    for task in tasks {
        task.await??;
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(pool, "alice"));
    assert_eq!(Comments::new(store.clone()).list("sub-1").await?.len(), 20);
    assert_eq!(Ratings::new(store).list("sub-1").await?.len(), 20);

    Ok(())
}
