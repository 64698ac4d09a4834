use anyhow::Context;
use sharereads::{
    adapters::{
        file::FileListStore,
        google_books::GoogleBooksCatalog,
        memory::InMemoryListStore,
        postgres::{MIGRATOR, PostgresListStore},
    },
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::{AppConfig, StoreBackend, StoreConfig},
    ports::ListStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 設定で選ばれたバックエンドのリストストアを構築する
async fn build_list_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn ListStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory list store; lists are lost on restart");
            Ok(Arc::new(InMemoryListStore::new()))
        }
        StoreBackend::File => {
            let store = FileListStore::new(&config.file_dir);
            tracing::info!("Using file list store at {}", store.path().display());
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            // Initialize database connection pool
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;

            MIGRATOR
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            tracing::info!("Using PostgreSQL list store");
            Ok(Arc::new(PostgresListStore::new(pool)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharereads=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    // Initialize adapters
    let list_store = build_list_store(&config.store).await?;
    let book_catalog = Arc::new(
        GoogleBooksCatalog::new(config.google_books()).context("Failed to create catalog client")?,
    );

    // Create service dependencies
    let service_deps = ServiceDependencies {
        list_store,
        book_catalog,
        policy: config.list_policy(),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
