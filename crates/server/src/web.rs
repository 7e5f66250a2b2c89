//! Form and JSON routes for crop recommendations.
//!
//! HTML Endpoints:
//! - `GET  /`                          — input form
//! - `POST /predict`                   — form submission, renders the result on the form page
//!
//! JSON API Endpoints:
//! - `POST /api/v1/recommendations`    — same pipeline as `/predict`, JSON in and out
//! - `GET  /api/v1/suggestions`        — season/city lookup only
//!
//! `/health` is merged in from the health module and `/static` serves the stylesheet.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use croprec_core::{
    ApplicationError, Feature, Recommendation, RecommendationInput, RecommendationService,
};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::health;

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Clone)]
pub struct AppState {
    service: RecommendationService,
    templates: Arc<Tera>,
}

impl AppState {
    pub fn new(service: RecommendationService, templates: Arc<Tera>) -> Self {
        Self { service, templates }
    }

    pub fn service(&self) -> &RecommendationService {
        &self.service
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub season: String,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub season: String,
    pub city: String,
    pub known: bool,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub fields: Vec<String>,
    pub messages: Vec<String>,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
struct FormField {
    name: &'static str,
    label: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct ResultView {
    crop: Option<String>,
    message: String,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PageView {
    fields: Vec<FormField>,
    season: String,
    city: String,
    seasons: Vec<&'static str>,
    cities: Vec<&'static str>,
    errors: Vec<String>,
    result: Option<ResultView>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Templates from `templates_dir`, with the bundled form page as fallback.
pub fn init_templates(templates_dir: &Path) -> Arc<Tera> {
    let pattern = format!("{}/**/*.html", templates_dir.display());
    let mut tera = match Tera::new(&pattern) {
        Ok(tera) => tera,
        Err(error) => {
            warn!(
                event_name = "web.templates.fallback",
                correlation_id = "bootstrap",
                error = %error,
                "failed to load templates from filesystem, using embedded form page"
            );
            Tera::default()
        }
    };

    if !tera.get_template_names().any(|name| name == INDEX_TEMPLATE) {
        if let Err(error) =
            tera.add_raw_template(INDEX_TEMPLATE, include_str!("../../../templates/index.html"))
        {
            error!(
                event_name = "web.templates.embedded_invalid",
                correlation_id = "bootstrap",
                error = %error,
                "embedded form page failed to parse"
            );
        }
    }

    Arc::new(tera)
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let health = health::router(state.service.clone());

    Router::new()
        .route("/", get(index_page))
        .route("/predict", post(predict_page))
        .route("/api/v1/recommendations", post(recommend_json))
        .route("/api/v1/suggestions", get(suggestions_json))
        .with_state(state)
        .merge(health)
        .nest_service("/static", ServeDir::new(static_dir))
}

// ---------------------------------------------------------------------------
// HTML handlers
// ---------------------------------------------------------------------------

async fn index_page(State(state): State<AppState>) -> Response {
    let view = page_view(&state, &RecommendationInput::default(), Vec::new(), None);
    render_page(&state, StatusCode::OK, &view, "index")
}

async fn predict_page(
    State(state): State<AppState>,
    Form(input): Form<RecommendationInput>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    match recommend(&state.service, &input, &correlation_id) {
        Ok(recommendation) => {
            let result = ResultView {
                crop: recommendation.crop,
                message: recommendation.message,
                suggestions: recommendation.suggestions,
            };
            let view = page_view(&state, &input, Vec::new(), Some(result));
            render_page(&state, StatusCode::OK, &view, &correlation_id)
        }
        Err(error) => {
            let (status, messages) = match error.validation_errors().map(|errors| errors.messages()) {
                Some(messages) => (StatusCode::BAD_REQUEST, messages),
                None => {
                    let interface = error.into_interface(&correlation_id);
                    (StatusCode::INTERNAL_SERVER_ERROR, vec![interface.user_message().to_string()])
                }
            };
            let view = page_view(&state, &input, messages, None);
            render_page(&state, status, &view, &correlation_id)
        }
    }
}

// ---------------------------------------------------------------------------
// JSON handlers
// ---------------------------------------------------------------------------

async fn recommend_json(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationInput>, JsonRejection>,
) -> Result<Json<Recommendation>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(input) = payload.map_err(|rejection| {
        info!(
            event_name = "recommendation.rejected",
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "recommendation body could not be decoded"
        );
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "request body must be a JSON object of readings, season and city"
                    .to_string(),
                fields: Vec::new(),
                messages: vec![rejection.body_text()],
                correlation_id: correlation_id.clone(),
            }),
        )
    })?;

    recommend(&state.service, &input, &correlation_id).map(Json).map_err(|error| {
        let (fields, messages): (Vec<String>, Vec<String>) = match error.validation_errors() {
            Some(errors) => (
                errors.fields().into_iter().map(str::to_string).collect(),
                errors.messages(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        let status = if fields.is_empty() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        };
        let interface = error.into_interface(&correlation_id);

        (
            status,
            Json(ApiError {
                error: interface.user_message().to_string(),
                fields,
                messages,
                correlation_id,
            }),
        )
    })
}

async fn suggestions_json(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<SuggestionResponse> {
    let advisor = state.service.advisor();
    let suggestions = advisor.suggest(&query.season, &query.city);

    Json(SuggestionResponse {
        known: advisor.is_known(&query.season, &query.city),
        suggestions: suggestions.iter().map(|crop| crop.to_string()).collect(),
        season: query.season.trim().to_lowercase(),
        city: query.city.trim().to_lowercase(),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn recommend(
    service: &RecommendationService,
    input: &RecommendationInput,
    correlation_id: &str,
) -> Result<Recommendation, ApplicationError> {
    let request = match input.validate() {
        Ok(request) => request,
        Err(errors) => {
            info!(
                event_name = "recommendation.rejected",
                correlation_id,
                fields = ?errors.fields(),
                "recommendation input failed validation"
            );
            return Err(errors.into());
        }
    };

    info!(
        event_name = "recommendation.received",
        correlation_id,
        features = ?request.features.values(),
        season = %request.season,
        city = %request.city,
        "recommendation requested"
    );

    match service.recommend_request(&request) {
        Ok(recommendation) => {
            info!(
                event_name = "recommendation.completed",
                correlation_id,
                label = recommendation.label,
                crop = recommendation.crop.as_deref().unwrap_or("unknown"),
                suggestions = ?recommendation.suggestions,
                message = %recommendation.message,
                "recommendation produced"
            );
            Ok(recommendation)
        }
        Err(error) => {
            error!(
                event_name = "recommendation.failed",
                correlation_id,
                error = %error,
                "recommendation pipeline failed"
            );
            Err(error)
        }
    }
}

fn page_view(
    state: &AppState,
    input: &RecommendationInput,
    errors: Vec<String>,
    result: Option<ResultView>,
) -> PageView {
    let values = input.form_values();
    let fields = Feature::ALL
        .into_iter()
        .map(|feature| FormField {
            name: feature.form_field(),
            label: feature.label(),
            value: values.get(feature.form_field()).cloned().unwrap_or_default(),
        })
        .collect();
    let advisor = state.service.advisor();

    PageView {
        fields,
        season: input.season.clone().unwrap_or_default(),
        city: input.city.clone().unwrap_or_default(),
        seasons: advisor.seasons(),
        cities: advisor.all_cities(),
        errors,
        result,
    }
}

fn render_page(state: &AppState, status: StatusCode, view: &PageView, correlation_id: &str) -> Response {
    let rendered = Context::from_serialize(view)
        .and_then(|context| state.templates.render(INDEX_TEMPLATE, &context));

    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(error) => {
            error!(
                event_name = "web.render.failed",
                correlation_id,
                error = %error,
                "form page failed to render"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Error</h1><p>The page could not be rendered.</p>".to_string()),
            )
                .into_response()
        }
    }
}
