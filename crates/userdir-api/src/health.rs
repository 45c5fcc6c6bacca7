//! Health check endpoints for Kubernetes probes
//!
//! Provides liveness, readiness, and overall health with per-component
//! status for container orchestration.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Service is healthy
    Healthy,
    /// Service is degraded but functional
    Degraded,
    /// Service is unhealthy
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Storage backend status
    pub storage: ComponentStatus,
}

/// Health tracker for the service
#[derive(Clone)]
pub struct HealthTracker {
    /// Service start time
    start_time: Arc<AtomicU64>,
    /// Is service ready?
    ready: Arc<AtomicBool>,
    /// Is service alive?
    alive: Arc<AtomicBool>,
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthTracker {
    /// Create a new health tracker
    pub fn new() -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();

        Self {
            start_time: Arc::new(AtomicU64::new(now)),
            ready: Arc::new(AtomicBool::new(false)),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let start = self.start_time.load(Ordering::Relaxed);
        now.saturating_sub(start)
    }

    /// Mark service as ready
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Check if service is ready
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Check if service is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Overall health, including storage connectivity.
pub async fn health_check_handler(State(state): State<AppState>) -> impl IntoResponse {
    let storage = match state.client.ping().await {
        Ok(()) => ComponentStatus { status: HealthStatus::Healthy, message: None },
        Err(e) => {
            ComponentStatus { status: HealthStatus::Unhealthy, message: Some(e.to_string()) }
        },
    };

    let (status, code) = match storage.status {
        HealthStatus::Healthy => (HealthStatus::Healthy, StatusCode::OK),
        _ => (HealthStatus::Degraded, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        service: "userdir".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.health_tracker.uptime_seconds(),
        storage,
    };

    (code, Json(response))
}

/// Liveness probe: is the process responsive at all?
pub async fn liveness_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.health_tracker.is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Readiness probe: is the service accepting traffic?
pub async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.health_tracker.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
