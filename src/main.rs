mod config;
mod date;
mod html;
mod page;
mod routes;
mod seo;
mod store;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DatabaseConfig};
use routes::AppState;
use store::{SongStore, SqliteStore, SupabaseStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("song_of_the_day=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    match config.database.clone() {
        DatabaseConfig::Supabase { url, anon_key } => {
            info!(%url, "reading songs from supabase");
            serve(config, SupabaseStore::new(url, anon_key)).await
        }
        DatabaseConfig::Sqlite { path } => {
            let store = SqliteStore::open(&path)
                .with_context(|| format!("cannot use database {}", path.display()))?;
            info!(path = %path.display(), "reading songs from sqlite");
            serve(config, store).await
        }
    }
}

async fn serve<S: SongStore>(config: Config, store: S) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::router(Arc::new(AppState { config, store }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!("song-of-the-day listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
