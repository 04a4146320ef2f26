use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use todo_app::{
    config::Config, navigation::RouteHistory, routes, storage::JsonFileStore, App,
    SqliteBackend,
};

async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let backend = SqliteBackend::connect(&config.database_url).await?;
    let storage = JsonFileStore::new(&config.storage_dir)?;
    let history = Arc::new(RouteHistory::default());

    let app = App::new(Arc::new(backend), Arc::new(storage), history.clone())
        .with_inactivity_timeout(config.inactivity_timeout);
    let router = routes::router(app, history);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run_server().await {
        error!("run server error: {e}");
    };
}
