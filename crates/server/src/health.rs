use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use croprec_core::RecommendationService;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    service: RecommendationService,
}

impl HealthState {
    pub fn new(service: RecommendationService) -> Self {
        Self { service }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub model: HealthCheck,
    pub advisor: HealthCheck,
    pub model_version: String,
    pub classifier: &'static str,
    pub checked_at: String,
}

pub fn router(service: RecommendationService) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState::new(service))
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let classifier = state.service.classifier();
    let model = HealthCheck {
        status: "ready",
        detail: format!(
            "{} over {} stages",
            classifier.predictor_kind(),
            classifier.stages().len()
        ),
    };
    let advisor = advisor_check(&state.service);
    let ready = advisor.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "croprec-server runtime initialized".to_string(),
        },
        model,
        advisor,
        model_version: classifier.version().to_string(),
        classifier: classifier.predictor_kind(),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn advisor_check(service: &RecommendationService) -> HealthCheck {
    let seasons = service.advisor().seasons();
    if seasons.is_empty() {
        return HealthCheck { status: "degraded", detail: "suggestion table is empty".to_string() };
    }
    HealthCheck {
        status: "ready",
        detail: format!(
            "{} seasons, {} cities",
            seasons.len(),
            service.advisor().all_cities().len()
        ),
    }
}
