use anyhow::Result;
use clap::{Parser, Subcommand};
use safeswap::{
    AppState,
    config::Config,
    db::{create_pool, create_read_pool, create_write_pool},
};
use safeswap_catalog::{Catalog, Category, IngredientFilter, RawRow, SqliteRecordSource};
use sqlx::migrate::MigrateDatabase;
use std::sync::Arc;

/// safeswap - Ingredient substitute directory
#[derive(Parser)]
#[command(name = "safeswap")]
#[command(about = "Browse and search ingredient substitutes", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Seed an empty database from a JSON array of sheet rows
    Import {
        /// Path to the JSON file
        file: String,
    },
    /// Search the catalog from the command line
    Search {
        /// Free text matched against ingredients and substitutes
        #[arg(long, default_value = "")]
        query: String,

        /// Category filter (dairy, eggs, nuts-seeds, ...)
        #[arg(long)]
        category: Option<Category>,

        /// Dietary restriction, repeatable (vegan, nut-free, ...)
        #[arg(long = "diet")]
        diet: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    safeswap::observability::init_observability(
        "safeswap",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Import { file } => import_command(config, file).await,
        Commands::Search {
            query,
            category,
            diet,
        } => search_command(config, query, category, diet).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting safeswap server...");

    let host = host_override.unwrap_or(config.server.host);
    let port = port_override.unwrap_or(config.server.port);

    let write_db = create_write_pool(&config.database.url).await?;
    safeswap_db::migrate(&write_db).await?;
    let read_db = create_read_pool(&config.database.url, config.database.max_connections).await?;

    let catalog = Arc::new(Catalog::new(SqliteRecordSource(read_db.clone())));
    if config.catalog.refresh_on_start {
        // a failed load is retried on first request
        if let Err(e) = catalog.refresh().await {
            tracing::warn!("Initial catalog load failed: {:#}", e);
        }
    }

    let state = AppState {
        db: safeswap_shared::State { read_db, write_db },
        catalog,
    };

    let app = safeswap::create_app(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = create_pool(&config.database.url, 1).await?;
    safeswap_db::migrate(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn import_command(config: Config, file: String) -> Result<()> {
    let content = tokio::fs::read_to_string(&file).await?;
    let rows: Vec<RawRow> = serde_json::from_str(&content)?;

    let pool = create_pool(&config.database.url, 1).await?;
    safeswap_db::migrate(&pool).await?;

    let report = safeswap_catalog::import_rows(&pool, &rows).await?;

    if report.skipped {
        tracing::warn!("Database already contains ingredients, import skipped");
    } else {
        tracing::info!(
            "Imported {} ingredients and {} substitutes ({} rows rejected)",
            report.ingredients,
            report.substitutes,
            report.rejected_rows
        );

        if report.failed_batches > 0 {
            tracing::warn!(
                "{} batches ({} ingredients) failed and were rolled back",
                report.failed_batches,
                report.failed_ingredients
            );
        }
    }

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn search_command(
    config: Config,
    query: String,
    category: Option<Category>,
    diet: Vec<String>,
) -> Result<()> {
    let pool = create_pool(&config.database.url, 1).await?;
    let catalog = Catalog::new(SqliteRecordSource(pool));
    let ingredients = catalog.refresh().await?;

    let filter = IngredientFilter {
        query,
        category,
        dietary: diet
            .iter()
            .filter_map(|tag| safeswap_catalog::DietaryRestriction::parse(tag))
            .collect(),
    };

    for ingredient in filter.apply(&ingredients) {
        let substitutes = ingredient
            .substitutes
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "{} [{}]: {}",
            ingredient.name, ingredient.category, substitutes
        );
    }

    Ok(())
}
