use actix_web::{App, HttpServer, web};
use std::path::Path;
use std::sync::Arc;
use synthlog::settings;
use synthlog::store::{
    self,
    trace::{RequestLog, RequestTiming, TRACE_LOG_FILE},
};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = settings::load()?;

    let trace_path = Path::new(&cfg.logging.dir).join(TRACE_LOG_FILE);
    let request_log = Arc::new(RequestLog::open(&trace_path)?);

    let state = web::Data::new(store::StoreState::new(cfg.faults.clone()));
    let requests_total = state.requests_total.clone();

    tracing::info!(
        host = %cfg.server_store.host,
        port = cfg.server_store.port,
        trace_log = %trace_path.display(),
        "server-store listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(RequestTiming::new(
                request_log.clone(),
                requests_total.clone(),
            ))
            .configure(store::configure)
    })
    .bind((cfg.server_store.host.as_str(), cfg.server_store.port))?
    .run()
    .await?;

    Ok(())
}
