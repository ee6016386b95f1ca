//! Liveness and readiness probes used by compose and the startup gate

use std::future::Future;
use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::types::Json;
use crate::domain::DomainError;
use crate::infrastructure::storage;

use super::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Outcome of probing one dependency
#[derive(Serialize, Debug)]
pub struct ComponentCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

#[derive(Serialize, Debug)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<ComponentCheck>,
}

impl HealthReport {
    fn from_checks(checks: Vec<ComponentCheck>) -> Self {
        let status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            version: VERSION,
            timestamp: Utc::now(),
            checks,
        }
    }
}

async fn probe<F>(name: &'static str, check: F) -> ComponentCheck
where
    F: Future<Output = Result<(), DomainError>>,
{
    let started = Instant::now();
    let outcome = check.await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => ComponentCheck {
            name,
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            tracing::warn!(component = name, error = %e, "Readiness probe failed");
            ComponentCheck {
                name,
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                latency_ms,
            }
        }
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthReport> {
    Json(HealthReport::from_checks(Vec::new()))
}

/// GET /ready: 503 unless the department store, and the pool when present, answer
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let departments = state.department_service.clone();
    let mut checks = vec![probe("departments", async move {
        departments.count(None).await.map(|_| ())
    })
    .await];

    if let Some(pool) = &state.pool {
        checks.push(probe("database", storage::ping(pool)).await);
    }

    let report = HealthReport::from_checks(checks);

    (report.status.status_code(), Json(report))
}

/// GET /live
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}
