use anyhow::Context;
use giveaway_core::load_config;
use giveaway_store::RegistrantStore;
use giveaway_web::{create_router, AppState};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_config().context("loading configuration")?;
    if config.admin.uses_default_password() {
        tracing::warn!(
            "admin password is the built-in default; set GIVEAWAY_ADMIN_PASSWORD before exposing this server"
        );
    }

    let store = RegistrantStore::connect(&config.database.url)
        .await
        .context("connecting to the registrant store")?;

    let bind = config.server.bind.clone();
    let state = AppState::new(config, store);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    tracing::info!("giveaway-server listening on {}", bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
