use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use lifekey_core::config::{
    data_file_from_env_value, remote_base_url_from_env_value, seed_flag_from_env_value,
};
use lifekey_core::constants::{ENV_DATA_FILE, ENV_REMOTE_URL, ENV_SEED_DEMO};
use lifekey_core::{CoreConfig, FileRepository, PatientStore};

/// `RUST_LOG` plus info-level logging for the core crates and the REST handlers.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("lifekey=info".parse()?)
        .add_directive("api_rest=info".parse()?))
}

/// Main entry point for the LifeKey service
///
/// Serves the REST API over the local patient store. The same API is the remote
/// source that `LIFEKEY_REMOTE_URL` points other LifeKey processes at.
///
/// # Environment Variables
/// - `LIFEKEY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `LIFEKEY_DATA_FILE`: Patient store file (default: "lifekey_data/lifekey_patients.json")
/// - `LIFEKEY_SEED_DEMO`: Seed demo records into an empty store (default: true)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, store startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("LIFEKEY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::new(
        data_file_from_env_value(std::env::var(ENV_DATA_FILE).ok()),
        remote_base_url_from_env_value(std::env::var(ENV_REMOTE_URL).ok()),
        seed_flag_from_env_value(std::env::var(ENV_SEED_DEMO).ok())?,
    )?;
    if !cfg.is_mock_mode() {
        tracing::warn!("{} is ignored by the server; it serves its own store", ENV_REMOTE_URL);
    }

    let store = PatientStore::open(
        FileRepository::new(cfg.data_file()),
        cfg.seed_demo_records(),
    )?;

    tracing::info!("++ Patient store at {}", cfg.data_file().display());
    tracing::info!("++ Starting LifeKey REST on {}", rest_addr);

    let app = router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
