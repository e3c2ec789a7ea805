use routes::*;

mod config;
mod data_types;
mod db;
mod error;
mod general_helpers;
mod logging;
mod routes;
mod traits;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;
    logging::init(&config.log_level);

    let tera = load_templates()?;
    let mut tera_context = tera::Context::new();
    tera_context.insert("title", &config.site_title);

    // the only store connection; handlers share it through the router state
    let store = db::connect(&config.store).await?;
    tracing::info!(backend = config.store.kind(), "store connected");

    let app_state = AppContext {
        tera,
        tera_context,
        store,
    };

    let router = make_routes(app_state);

    tracing::info!("SERVER RUNNING AT {}", config.bind_addr);
    axum::Server::bind(&config.bind_addr)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
