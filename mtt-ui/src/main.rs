//! mtt-ui (Mouse Training Tracker) - Main entry point
//!
//! Password-gated web service over the shared training document. Clients
//! read the document, edit it locally, and write it back wholesale; the
//! later of two racing saves wins in full.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mtt_common::config::{ensure_data_dir, resolve_settings};
use mtt_common::session::SessionRegistry;
use mtt_common::store::DocumentStore;
use mtt_ui::{build_router, AppState};
use tracing::info;

/// Command-line arguments for mtt-ui
#[derive(Parser, Debug)]
#[command(name = "mtt-ui")]
#[command(about = "Mouse training tracking web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Shared access password
    #[arg(long)]
    password: Option<String>,

    /// Folder holding the persisted training document
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing first for startup feedback
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Mouse Training Tracker (mtt-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let settings = resolve_settings(args.port, args.password, args.data_dir);

    ensure_data_dir(&settings.data_dir)?;
    let document_path = settings.document_path();
    info!("Data file: {}", document_path.display());

    let store = DocumentStore::new(document_path);
    // First load materializes the default document when no file exists yet
    let doc = store.load()?;
    info!(
        "Training document loaded: {} mice, {} steps, {} daily records",
        doc.mice.len(),
        doc.steps.len(),
        doc.daily_records.len()
    );

    let sessions = SessionRegistry::new(settings.password.clone());
    let state = AppState::new(store, sessions);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mtt-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
