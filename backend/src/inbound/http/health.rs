//! Orchestrator probes.
//!
//! ```text
//! GET /health/live   200 {"status":"alive","store":"postgres"}
//! GET /health/ready  503 {"status":"starting","store":"postgres"} until the
//!                    listener is bound, then 200 {"status":"ready",...}
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, HttpResponseBuilder, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::outbound::StoreBackend;

/// Probe state shared by every worker.
#[derive(Debug)]
pub struct HealthState {
    store: StoreBackend,
    serving: AtomicBool,
}

impl HealthState {
    /// Probe state for a server backed by `store`, not yet serving.
    pub fn new(store: StoreBackend) -> Self {
        Self {
            store,
            serving: AtomicBool::new(false),
        }
    }

    /// Record that the listener is bound and requests are accepted.
    pub fn mark_ready(&self) {
        self.serving.store(true, Ordering::Release);
    }

    /// Whether [`Self::mark_ready`] has run.
    pub fn is_ready(&self) -> bool {
        self.serving.load(Ordering::Acquire)
    }

    fn report(&self, status: ProbeStatus) -> ProbeReport {
        ProbeReport {
            status,
            store: self.store.label().to_owned(),
        }
    }
}

/// Probe verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The process answers requests.
    Alive,
    /// The listener is not bound yet.
    Starting,
    /// The API accepts traffic.
    Ready,
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeReport {
    /// Probe verdict.
    pub status: ProbeStatus,
    /// Backing store in use, `memory` or `postgres`.
    #[schema(example = "postgres")]
    pub store: String,
}

fn probe(mut response: HttpResponseBuilder, report: &ProbeReport) -> HttpResponse {
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic", body = ProbeReport),
        (status = 503, description = "Still starting", body = ProbeReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        probe(HttpResponse::Ok(), &state.report(ProbeStatus::Ready))
    } else {
        probe(
            HttpResponse::ServiceUnavailable(),
            &state.report(ProbeStatus::Starting),
        )
    }
}

/// Liveness probe; answers whenever a worker can run a handler.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Process is alive", body = ProbeReport))
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(HttpResponse::Ok(), &state.report(ProbeStatus::Alive))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn fetch(state: web::Data<HealthState>, uri: &str) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        (status, cache, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_waits_for_the_listener() {
        let state = web::Data::new(HealthState::new(StoreBackend::Postgres));

        let (status, cache, body) = fetch(state.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, json!({"status": "starting", "store": "postgres"}));

        state.mark_ready();
        let (status, _, body) = fetch(state, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ready", "store": "postgres"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_reports_the_store_before_readiness() {
        let state = web::Data::new(HealthState::new(StoreBackend::Memory));

        let (status, _, body) = fetch(state, "/health/live").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "alive", "store": "memory"}));
    }
}
