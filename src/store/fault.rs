//! Probabilistic load and fault injection, applied ahead of every route's
//! main logic.
//!
//! Two independent draws per request: a chance of an artificial delay and a
//! chance of an artificial failure. Both can fire on the same request, in
//! which case the caller waits and then still gets the error. The decision
//! is split from its execution so tests can sample distributions without
//! ever sleeping.

use actix_web::http::StatusCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

use super::ApiError;
use crate::settings::FaultConfig;

pub const FAULT_STATUSES: &[StatusCode] = &[
    StatusCode::BAD_REQUEST,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::SERVICE_UNAVAILABLE,
];

pub const FAULT_MESSAGES: &[&str] = &["Invalid data", "DB error", "Service unavailable"];

/// What the simulator decided for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub delay: Option<Duration>,
    pub fault: Option<(StatusCode, String)>,
}

pub struct FaultSim {
    cfg: FaultConfig,
    rng: Mutex<StdRng>,
}

impl FaultSim {
    pub fn new(cfg: FaultConfig) -> Self {
        Self {
            cfg: sanitized(cfg),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Same simulator with a fixed seed, for reproducible draws in tests.
    pub fn seeded(cfg: FaultConfig, seed: u64) -> Self {
        Self {
            cfg: sanitized(cfg),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draws this request's fate. Independent delay and fault branches.
    pub fn decide(&self) -> Outcome {
        let mut rng = self.rng.lock().unwrap();

        let delay = if rng.gen_bool(self.cfg.delay_probability) {
            let secs = if self.cfg.delay_max_secs > self.cfg.delay_min_secs {
                rng.gen_range(self.cfg.delay_min_secs..self.cfg.delay_max_secs)
            } else {
                self.cfg.delay_min_secs
            };
            Some(Duration::from_secs_f64(secs))
        } else {
            None
        };

        let fault = if rng.gen_bool(self.cfg.error_probability) {
            let status = FAULT_STATUSES[rng.gen_range(0..FAULT_STATUSES.len())];
            let detail = FAULT_MESSAGES[rng.gen_range(0..FAULT_MESSAGES.len())].to_string();
            Some((status, detail))
        } else {
            None
        };

        Outcome { delay, fault }
    }

    /// Sleeps out any decided delay, then fails the request if a fault was
    /// drawn. The sleep stalls only this request's task.
    pub async fn induce(&self) -> Result<(), ApiError> {
        let outcome = self.decide();
        if let Some(delay) = outcome.delay {
            sleep(delay).await;
        }
        if let Some((status, detail)) = outcome.fault {
            return Err(ApiError::Injected { status, detail });
        }
        Ok(())
    }
}

/// Probabilities are clamped into [0, 1] and the delay window is kept
/// non-negative and ordered, so no later draw can panic.
fn sanitized(mut cfg: FaultConfig) -> FaultConfig {
    cfg.delay_probability = cfg.delay_probability.clamp(0.0, 1.0);
    cfg.error_probability = cfg.error_probability.clamp(0.0, 1.0);
    cfg.delay_min_secs = cfg.delay_min_secs.max(0.0);
    if cfg.delay_max_secs < cfg.delay_min_secs {
        cfg.delay_max_secs = cfg.delay_min_secs;
    }
    cfg
}
