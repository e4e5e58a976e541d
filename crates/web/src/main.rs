use std::error::Error;

use database::SqliteDatabase;
use tracing_subscriber::EnvFilter;
use web::{config::Config, start_web_server, upload::LogoStore, RegistryState, WebState};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    if let Err(why) = run(config).await {
        log::error!("Server stopped: {why}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        api_url = %config.registry.api_url,
        api_key_configured = config.registry.api_key_configured(),
        allowed_origins = ?config.allowed_origins,
        "Starting BTC Map integration API."
    );

    // database
    let database = SqliteDatabase::connect(&config.database).await?;

    // uploads
    let logos = LogoStore::new(&config.upload_dir, config.max_upload_bytes);
    logos.prepare().await?;

    // web server
    let state = WebState {
        registry: RegistryState::from_config(config.registry.clone()),
        database,
        logos,
        allowed_origins: config.allowed_origins.clone(),
    };
    start_web_server(&config.bind_address(), state).await?;

    Ok(())
}
