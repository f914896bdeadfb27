mod config;
mod error;
mod handlers;
mod routes;
mod state;
mod translate;
mod validation;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;
use translate::PipelineFactory;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("translate_server=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - first existing candidate wins, defaults otherwise
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        if !std::path::Path::new(path).exists() {
            tracing::debug!("No config file at {}", path);
            continue;
        }
        config = Some(Config::load(path)?);
        info!("Loaded configuration from: {}", path);
        break;
    }

    let config = match config {
        Some(config) => config,
        None => {
            info!("No config file found (tried {:?}), using defaults", config_paths);
            Config::default()
        }
    }
    .apply_env_overrides()?;

    // Load the model once; it is shared by every request from here on
    let pipeline = PipelineFactory::create(&config.pipeline).await?;
    let app = routes::build_app(AppState::new(pipeline));

    let addr = config.bind_address();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
