mod routes;
mod singleton;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use wastecal_core::{Mode, WastecalConfig};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "wastecal-server")]
#[command(about = "Serve the waste collection calendar over HTTP")]
struct Args {
    /// Enable editing (drafts, commit, revert)
    #[arg(long)]
    edit: bool,

    /// Port to listen on (default from config, 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the per-year calendar files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for backups of overwritten calendar files
    #[arg(long)]
    backup_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = WastecalConfig::load()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.backup_dir {
        config.backup_dir = Some(dir);
    }
    let port = args.port.unwrap_or(config.port);
    let mode = if args.edit { Mode::Edit } else { Mode::Serve };
    let layout = config.layout();

    // Only one process may write to a data directory
    let _lock = match mode {
        Mode::Edit => Some(singleton::acquire_lock(layout.data_dir())?),
        Mode::Serve => None,
    };

    let state = AppState::new(layout.clone(), mode)?;
    if state.store().has_pending_changes() {
        tracing::warn!(years = ?state.store().pending_years(), "resuming with unsaved changes");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(mode).with_state(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(
        mode = ?mode,
        data_dir = %layout.data_dir().display(),
        "wastecal-server listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
