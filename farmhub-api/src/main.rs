use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use farmhub_api::{app, telemetry, AppState};
use farmhub_store::{app_config::Config, RestStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init(
        "farmhub_api=debug,farmhub_order=info,farmhub_store=info,tower_http=debug,\
         axum::rejection=trace",
    );

    let config = Config::load().context("failed to load config")?;
    config.store.validate()?;
    tracing::info!("Starting FarmHub API on port {}", config.server.port);

    let store = RestStore::new(&config.store).context("failed to build store client")?;
    let app_state = AppState {
        store: Arc::new(store),
        corrector: config.corrector.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
