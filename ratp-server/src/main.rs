use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ratp_server::catalog::CatalogClient;
use ratp_server::config::AppConfig;
use ratp_server::idfm::TransitClient;
use ratp_server::resolver::Resolver;
use ratp_server::tables::{JsonDirStore, TableBuilder, TableStore, ingest};
use ratp_server::web::{AppState, create_router};

const USAGE: &str = "usage: ratp-server [serve|ingest]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ratp_server=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let command = std::env::args().nth(1);
    let result = match command.as_deref() {
        None | Some("serve") => serve(config).await,
        Some("ingest") => run_ingest(config).await,
        Some(other) => Err(format!("unknown command '{other}'\n{USAGE}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Rebuild the line tables from the reference catalog.
async fn run_ingest(config: AppConfig) -> Result<(), String> {
    let client = CatalogClient::new(config.catalog()).map_err(|e| e.to_string())?;
    let store = JsonDirStore::new(&config.data_dir);

    let tables = ingest(&client, &TableBuilder::default(), &store)
        .await
        .map_err(|e| e.to_string())?;

    info!(
        lines = tables.len(),
        dir = %store.dir().display(),
        "ingestion finished"
    );
    Ok(())
}

/// Serve the HTTP API over the persisted line tables.
async fn serve(config: AppConfig) -> Result<(), String> {
    let store = JsonDirStore::new(&config.data_dir);
    let tables = store.load().map_err(|e| e.to_string())?;
    info!(lines = tables.len(), "loaded line tables");

    let transit = TransitClient::new(config.transit()).map_err(|e| e.to_string())?;
    let resolver = Resolver::new(Arc::new(tables), transit, config.resolver());
    let app = create_router(AppState::new(resolver));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", config.bind))?;
    info!("RATP gateway listening on http://{}", config.bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}
