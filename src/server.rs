use crate::cli::ServeArgs;
use std::sync::Arc;
use tracing::info;
use uic_registry::config::AppConfig;
use uic_registry::error::AppError;
use uic_registry::submissions::{submission_router, InMemoryResourceStore, SubmissionService};
use uic_registry::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(InMemoryResourceStore::default());
    let service = Arc::new(SubmissionService::new(
        store,
        config.notifications.base_url.clone(),
    ));

    let app = submission_router(service);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(?config.environment, %addr, "submission registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
