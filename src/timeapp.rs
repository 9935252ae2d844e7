//! The time-app service: current wall-clock time plus on-demand synthetic
//! log files.
//!
//! `/logs` fabricates a handful of access-style records and returns the file
//! itself, `/longlog` fabricates a batch of service events and only
//! acknowledges. Both overwrite their target file on every call.

use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, error, web};
use chrono::Local;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use serde_json::json;
use std::path::PathBuf;

use crate::{sink, synth};

pub const LOG_FILE: &str = "time-app.log";
pub const LARGE_LOG_FILE: &str = "large.log";

const ACCESS_RECORDS_PER_CALL: usize = 5;

pub struct TimeAppState {
    pub log_dir: PathBuf,
    pub registry: Registry,
    pub lines_written: IntCounter,
}

impl TimeAppState {
    pub fn new(log_dir: PathBuf) -> Self {
        let registry = Registry::new();
        let lines_written = IntCounter::new(
            "synthetic_log_lines_total",
            "Synthetic log lines written to disk",
        )
        .unwrap();
        registry.register(Box::new(lines_written.clone())).unwrap();

        Self {
            log_dir,
            registry,
            lines_written,
        }
    }
}

// GET /
async fn index() -> impl Responder {
    let now = Local::now();
    HttpResponse::Ok().json(json!({
        "date": now.format("%Y-%m-%d").to_string(),
        "time": now.format("%H:%M:%S").to_string(),
    }))
}

// GET /logs
async fn logs(state: web::Data<TimeAppState>) -> actix_web::Result<NamedFile> {
    let mut lines = Vec::with_capacity(ACCESS_RECORDS_PER_CALL);
    {
        let mut rng = rand::thread_rng();
        for _ in 0..ACCESS_RECORDS_PER_CALL {
            let record = synth::access_record(&mut rng);
            lines.push(synth::to_json_line(&record).map_err(error::ErrorInternalServerError)?);
        }
    }

    let path = state.log_dir.join(LOG_FILE);
    sink::write_log_file(&path, &lines)?;
    state.lines_written.inc_by(lines.len() as u64);

    let file = NamedFile::open(&path)?
        .set_content_type(mime::TEXT_PLAIN)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(LOG_FILE.to_string())],
        });
    Ok(file)
}

// GET /longlog
async fn longlog(state: web::Data<TimeAppState>) -> actix_web::Result<HttpResponse> {
    // One timestamp for the whole batch, captured up front.
    let timestamp = synth::now_iso();
    let events = synth::service_events(&timestamp);

    let mut lines = Vec::with_capacity(events.len());
    for event in &events {
        lines.push(synth::to_json_line(event).map_err(error::ErrorInternalServerError)?);
    }

    sink::write_log_file(&state.log_dir.join(LARGE_LOG_FILE), &lines)?;
    state.lines_written.inc_by(lines.len() as u64);

    Ok(HttpResponse::Ok().json(json!({ "status": "logs generated" })))
}

// GET /metrics
async fn metrics(state: web::Data<TimeAppState>) -> actix_web::Result<HttpResponse> {
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
        .route("/logs", web::get().to(logs))
        .route("/longlog", web::get().to(longlog))
        .route("/metrics", web::get().to(metrics));
}
