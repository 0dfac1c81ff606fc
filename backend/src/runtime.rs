//! Process-wide runtime facts, captured once at startup.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::domain::models::format_timestamp;
use shared::StatusResponse;

/// Start time and build version, handed to the status endpoint by the
/// composition root.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    started_at: DateTime<Utc>,
    started: Instant,
    version: &'static str,
}

impl RuntimeContext {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            status: "ok".to_string(),
            started_at: format_timestamp(&self.started_at),
            uptime_seconds: self.uptime().as_secs(),
            version: self.version.to_string(),
        }
    }
}
