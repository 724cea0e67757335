use anyhow::Result;
use clap::Parser;
use job_board::app_log;
use job_board::cli::{handle_command, Cli};
use job_board::core::session::FileSessionStore;
use job_board::core::{ApiClient, SessionContext};
use job_board::environment::ClientConfig;
use job_board::listing::ListingConfig;
use job_board::logging::init_logging;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.as_deref())?;
    init_logging(&config.log_path)?;

    app_log!(
        info,
        "Loaded configuration for environment: {}",
        ClientConfig::environment_name()
    );
    app_log!(info, "Backend: {}", config.api_url);
    app_log!(info, "Session file: {}", config.session_path.display());

    let api = Arc::new(ApiClient::from_config(&config)?);
    let session = SessionContext::new(Arc::new(FileSessionStore::new(&config.session_path)));

    handle_command(cli.command, api, session, ListingConfig::from(&config)).await
}
