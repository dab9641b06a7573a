use anyhow::Context;
use tracing_subscriber::EnvFilter;

use torii_api::api::{create_router, AppState};
use torii_api::config::Config;
use torii_api::graph::keyword::KeywordGraph;
use torii_api::models::{Category, Library};
use torii_api::services::catalog::{load_catalog, CatalogSnapshot, JsonFileSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Load every catalog and the keyword graph before serving
    let snapshot = load_snapshot(&config).await?;
    tracing::info!(
        movies = snapshot.movies.len(),
        shows = snapshot.shows.len(),
        candidates = snapshot.candidates.len(),
        keywords = snapshot.keyword_graph.keyword_count(),
        relations = snapshot.keyword_graph.relation_count(),
        "Catalogs loaded"
    );

    // Create the router with all routes
    let state = AppState::new(snapshot);
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reads the datasets and the persisted keyword graph into one snapshot
async fn load_snapshot(config: &Config) -> anyhow::Result<CatalogSnapshot> {
    let movies = load_catalog(&JsonFileSource::new(&config.movies_path), Category::Movie).await?;
    let shows = load_catalog(&JsonFileSource::new(&config.shows_path), Category::Show).await?;
    let animes = load_catalog(&JsonFileSource::new(&config.animes_path), Category::Anime).await?;

    let keyword_graph = KeywordGraph::from_file(&config.keyword_graph_path).with_context(|| {
        format!(
            "Failed to load keyword graph from {}",
            config.keyword_graph_path
        )
    })?;

    Ok(CatalogSnapshot {
        movies: Library::from_records(movies.records),
        shows: Library::from_records(shows.records),
        candidates: Library::from_records(animes.records),
        keyword_graph,
    })
}
