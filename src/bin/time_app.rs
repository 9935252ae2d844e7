use actix_web::{App, HttpServer, web};
use std::path::PathBuf;
use synthlog::{settings, timeapp};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = settings::load()?;
    let state = web::Data::new(timeapp::TimeAppState::new(PathBuf::from(&cfg.logging.dir)));

    tracing::info!(
        host = %cfg.time_app.host,
        port = cfg.time_app.port,
        log_dir = %cfg.logging.dir,
        "time-app listening"
    );

    HttpServer::new(move || App::new().app_data(state.clone()).configure(timeapp::configure))
        .bind((cfg.time_app.host.as_str(), cfg.time_app.port))?
        .run()
        .await?;

    Ok(())
}
