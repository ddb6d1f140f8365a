mod auth;
mod error;
mod handlers;
mod routes;
mod server;
mod state;

use docflow_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_telemetry();

    let config = Config::from_env()?;
    let state = state::build_state(&config).await?;
    let app = routes::setup_routes(&config, state);

    server::start_server(&config, app).await?;

    Ok(())
}
