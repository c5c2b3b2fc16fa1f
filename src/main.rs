mod api;
mod config;
mod prompts;

use std::error::Error;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::api::auth::repository::TokenStore;
use crate::prompts::file_repository::FilePromptRepository;
use crate::prompts::repository::PromptRepository;

#[derive(Parser)]
#[command(name = "promptvault", about = "Prompt library service")]
enum Cli {
    /// Start the HTTP server (default when no subcommand is given)
    #[command(alias = "run")]
    Serve {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    // Default to `serve` when invoked with no subcommand, while still
    // letting --help and --version work.
    let args: Vec<String> = std::env::args().collect();
    let cli = if args.len() <= 1 {
        Cli::Serve { port: None }
    } else {
        Cli::parse()
    };

    match cli {
        Cli::Serve { port } => run_server(port).await,
    }
}

async fn run_server(port_override: Option<u16>) -> Result<(), Box<dyn Error>> {
    let mut config = config::Config::from_env();
    if let Some(port) = port_override {
        config.port = port;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("promptvault=info,tower_http=warn,hyper=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.admin_token.is_none() {
        tracing::warn!("PROMPTVAULT_ADMIN_TOKEN is not set; mutating endpoints are disabled");
    }

    let prompt_repo: Arc<dyn PromptRepository> =
        Arc::new(FilePromptRepository::new(&config.data_dir));
    prompt_repo
        .load_all()
        .await
        .context("failed to load prompt store")?;

    let state = AppState {
        prompt_repo,
        tokens: Arc::new(TokenStore::new()),
        admin_token: config.admin_token.clone(),
    };

    let app = api::create_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        addr = %addr,
        data_dir = %config.data_dir.display(),
        "promptvault listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
