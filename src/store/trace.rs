//! Request tracing: every call through the fake API leaves one line in a
//! persistent trace log, timed end to end.
//!
//! The log sink is built once at startup and handed to the middleware, so
//! its lifecycle is the process lifecycle: opened before the server binds,
//! flushed and closed when the last handle drops at shutdown.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use chrono::Local;
use futures::future::LocalBoxFuture;
use prometheus::IntCounter;
use std::fs::{self, File, OpenOptions};
use std::future::{Ready, ready};
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub const APP_NAME: &str = "server-store-api";
pub const TRACE_LOG_FILE: &str = "app.log";

/// Append-only sink for request trace lines.
pub struct RequestLog {
    hostname: String,
    file: Mutex<File>,
}

impl RequestLog {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
            file: Mutex::new(file),
        })
    }

    /// Appends one trace line. A failed write must not fail the request it
    /// describes, so errors only reach the process log.
    pub fn record(
        &self,
        level: &str,
        method: &str,
        url: &str,
        client_ip: &str,
        message: &str,
        duration_ms: f64,
    ) {
        let line = format!(
            "{} {} {} {} {} {} {} {} {:.3}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            self.hostname,
            APP_NAME,
            method,
            url,
            client_ip,
            message,
            duration_ms,
        );
        let mut file = self.file.lock().unwrap();
        if let Err(err) = file.write_all(line.as_bytes()) {
            tracing::warn!(error = %err, "failed to append request trace line");
        }
    }
}

/// Middleware that wraps every route, timing it and recording the outcome
/// to a [`RequestLog`]. Errors from downstream are recorded and re-raised
/// untouched, so the usual error-to-response translation still happens.
pub struct RequestTiming {
    log: Arc<RequestLog>,
    requests: IntCounter,
}

impl RequestTiming {
    pub fn new(log: Arc<RequestLog>, requests: IntCounter) -> Self {
        Self { log, requests }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTiming
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestTimingMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimingMiddleware {
            service: Rc::new(service),
            log: self.log.clone(),
            requests: self.requests.clone(),
        }))
    }
}

pub struct RequestTimingMiddleware<S> {
    service: Rc<S>,
    log: Arc<RequestLog>,
    requests: IntCounter,
}

impl<S, B> Service<ServiceRequest> for RequestTimingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let log = self.log.clone();
        let requests = self.requests.clone();

        let method = req.method().to_string();
        let url = req.path().to_string();
        let client_ip = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let start = Instant::now();

        Box::pin(async move {
            let result = service.call(req).await;
            let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
            requests.inc();

            match &result {
                Ok(res) => {
                    log.record(
                        "INFO",
                        &method,
                        &url,
                        &client_ip,
                        &format!(
                            "Request processed successfully. Status: {}",
                            res.status().as_u16()
                        ),
                        duration_ms,
                    );
                }
                Err(err) => {
                    log.record(
                        "ERROR",
                        &method,
                        &url,
                        &client_ip,
                        &format!("Request failed: {err}"),
                        duration_ms,
                    );
                }
            }

            result
        })
    }
}
