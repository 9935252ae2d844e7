//! The server-store service: a fake inventory API for resilience testing.
//!
//! Every route first runs through the fault simulator, so callers see the
//! occasional slow or failed response exactly as they would from a flaky
//! real backend. The request-timing middleware in [`trace`] records each
//! call to the trace log.

pub mod fault;
pub mod trace;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, error, web};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::settings::FaultConfig;
use self::fault::FaultSim;

/// One unit of fake inventory.
#[derive(Debug, Clone, Serialize)]
pub struct Server {
    pub id: u32,
    pub model: String,
    pub cpu: String,
    pub ram_gb: u32,
    pub price_usd: u32,
}

/// The fixed catalog every request reads from.
pub fn seed_servers() -> Vec<Server> {
    vec![
        Server {
            id: 1,
            model: "Dell PowerEdge R750".into(),
            cpu: "2x Intel Xeon Gold".into(),
            ram_gb: 512,
            price_usd: 15_000,
        },
        Server {
            id: 2,
            model: "HP ProLiant DL380".into(),
            cpu: "2x AMD EPYC".into(),
            ram_gb: 1024,
            price_usd: 25_000,
        },
        Server {
            id: 3,
            model: "Supermicro SYS-4029GP-TR".into(),
            cpu: "4x Intel Xeon".into(),
            ram_gb: 2048,
            price_usd: 45_000,
        },
    ]
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Server not found")]
    NotFound,
    #[error("{detail}")]
    Injected { status: StatusCode, detail: String },
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Injected { status, .. } => *status,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}

pub struct StoreState {
    pub servers: Vec<Server>,
    pub faults: FaultSim,
    pub registry: Registry,
    pub requests_total: IntCounter,
}

impl StoreState {
    pub fn new(faults: FaultConfig) -> Self {
        Self::with_faults(FaultSim::new(faults))
    }

    pub fn with_faults(faults: FaultSim) -> Self {
        let registry = Registry::new();
        let requests_total =
            IntCounter::new("http_requests_total", "Requests handled by the fake API").unwrap();
        registry.register(Box::new(requests_total.clone())).unwrap();

        Self {
            servers: seed_servers(),
            faults,
            registry,
            requests_total,
        }
    }
}

// GET /
async fn index(state: web::Data<StoreState>) -> Result<HttpResponse, ApiError> {
    state.faults.induce().await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Welcome to Fake Server Store API" })))
}

// GET /servers
async fn list_servers(state: web::Data<StoreState>) -> Result<HttpResponse, ApiError> {
    state.faults.induce().await?;
    Ok(HttpResponse::Ok().json(&state.servers))
}

// GET /servers/{id}
async fn get_server(
    state: web::Data<StoreState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    state.faults.induce().await?;
    let id = path.into_inner();
    match state.servers.iter().find(|s| s.id == id) {
        Some(server) => Ok(HttpResponse::Ok().json(server)),
        None => Err(ApiError::NotFound),
    }
}

// POST /servers
async fn create_server(state: web::Data<StoreState>) -> Result<HttpResponse, ApiError> {
    state.faults.induce().await?;
    // Acknowledges with the id the entry would get; the catalog itself
    // stays fixed so repeated runs see identical data.
    Ok(HttpResponse::Ok().json(json!({
        "id": state.servers.len() as u32 + 1,
        "message": "Server created successfully",
    })))
}

// GET /metrics
async fn metrics(state: web::Data<StoreState>) -> actix_web::Result<HttpResponse> {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .append_header(("Content-Type", encoder.format_type()))
        .body(buffer))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/servers", web::get().to(list_servers))
        .route("/servers/{id}", web::get().to(get_server))
        .route("/servers", web::post().to(create_server))
        .route("/metrics", web::get().to(metrics));
}
