//! # API REST
//!
//! REST API implementation for Clarion.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON, CORS, API key guard, request timeout)
//!
//! Uses `api-shared` for wire types and `clarion-core` for the analysis itself.

#![warn(rust_2018_idioms)]

pub mod convert;

use api_shared::auth::{validate_api_key, API_KEY_HEADER};
use api_shared::{
    AnalyseReq, AnalyseRes, AnalysisReportDto, HealthRes, HealthService, UserPreferencesDto,
};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clarion_core::ContentAnalyser;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::Instrument;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyser: ContentAnalyser,
    /// Upper bound on one analysis; in-flight analyzer tasks are aborted on expiry.
    pub timeout: Duration,
    /// When set, `POST /analyse` requires a matching `x-api-key` header.
    pub api_key: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyse),
    components(schemas(HealthRes, AnalyseReq, AnalyseRes, AnalysisReportDto, UserPreferencesDto))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI, CORS and per-request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyse", post(analyse))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(trace_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Tags each request with a UUID and logs its outcome.
async fn trace_request(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let span = tracing::info_span!("request", id = %request_id, %method, %path);

    async move {
        let response = next.run(req).await;
        tracing::info!(status = response.status().as_u16(), "request handled");
        response
    }
    .instrument(span)
    .await
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/analyse",
    request_body = AnalyseReq,
    responses(
        (status = 200, description = "Analysis report", body = AnalyseRes),
        (status = 401, description = "Missing or invalid API key", body = AnalyseRes),
        (status = 500, description = "Validation or internal analysis failure", body = AnalyseRes)
    )
)]
/// Analyse a content idea
///
/// Runs the full analysis pipeline and returns one report. The operation is all-or-nothing:
/// any failure, including a malformed body or content shorter than three characters, returns
/// `500` with `success: false` and `analysis: null`.
#[axum::debug_handler]
async fn analyse(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AnalyseReq>, JsonRejection>,
) -> Response {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if let Err(err) = validate_api_key(provided, expected) {
            tracing::warn!(error = %err, "rejected request");
            return failure(StatusCode::UNAUTHORIZED, &err);
        }
    }

    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::error!(error = %rejection.body_text(), "invalid request body");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    let submission = match convert::submission_from_req(req) {
        Ok(submission) => submission,
        Err(message) => {
            tracing::error!(%message, "invalid request");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("validation failed: {message}"),
            );
        }
    };

    let now = chrono::Utc::now();
    match tokio::time::timeout(state.timeout, state.analyser.analyse(submission, now)).await {
        Ok(Ok(report)) => {
            let res = AnalyseRes::success(convert::report_to_dto(report));
            (StatusCode::OK, Json(res)).into_response()
        }
        Ok(Err(err)) => {
            tracing::error!(error = %err, "analysis failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &err)
        }
        Err(_) => {
            tracing::error!(timeout_ms = state.timeout.as_millis() as u64, "analysis timed out");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("analysis timed out after {} ms", state.timeout.as_millis()),
            )
        }
    }
}

fn failure(status: StatusCode, error: &dyn std::fmt::Display) -> Response {
    (status, Json(AnalyseRes::failure(error.to_string()))).into_response()
}
