use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use fota_common::SessionContext;
use fota_frontend::auth::{self, Credentials, Registration};
use fota_frontend::backend::FotaApi;
use fota_frontend::error::{ApiError, FailureKind};
use fota_frontend::views::{self, LocationProposal, NewActivation, SpotDraft};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn FotaApi>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        .route(
            "/view/activations",
            get(activations_list).post(start_activation),
        )
        .route("/view/activations/{id}", get(activation_details))
        .route("/view/activations/{id}/contacts", get(activation_contacts))
        .route("/view/activations/{id}/end", post(finish_activation))
        .route("/view/past", get(past_activations))
        .route("/view/on-air-map", get(on_air_map))
        .route("/view/sites/map", get(site_map))
        .route("/view/sites", get(site_browser))
        .route("/view/dashboard", get(dashboard))
        .route("/view/spots", get(spot_helper).post(post_spot))
        .route("/view/location-categories", get(location_categories))
        .route("/view/location-proposals", post(propose_location))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .with_state(state)
}

/// Session of the caller, from every `Cookie` header on the request.
fn session_from(headers: &HeaderMap) -> SessionContext {
    let cookies = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    SessionContext::from_cookie_header(&cookies)
}

const BACKEND_FAILED: &str = "The FOTA backend could not complete the request.";
const BACKEND_GARBLED: &str = "The FOTA backend sent an unexpected response.";

/// Client-facing error body. Backend endpoints and transport details stay in
/// the log.
fn error_response(error: &ApiError) -> Response {
    let (status, fallback) = match error.kind() {
        FailureKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, BACKEND_FAILED),
        FailureKind::Fetch => (StatusCode::BAD_GATEWAY, BACKEND_FAILED),
        FailureKind::Shape | FailureKind::Parse => (StatusCode::BAD_GATEWAY, BACKEND_GARBLED),
    };
    tracing::warn!("Write request failed: {}", error);
    let message = error.server_message().unwrap_or(fallback);
    (status, Json(json!({ "error": message }))).into_response()
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Stats endpoint - returns basic server information
async fn stats() -> impl IntoResponse {
    Json(json!({
        "status": "running",
        "service": "fota-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn activations_list(State(state): State<AppState>) -> impl IntoResponse {
    Json(views::load_activations_list(state.api.as_ref(), Utc::now()).await)
}

async fn activation_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(views::load_activation_details(state.api.as_ref(), Some(&id), Utc::now()).await)
}

async fn activation_contacts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(views::load_activation_contacts(state.api.as_ref(), Some(&id)).await)
}

async fn past_activations(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = session_from(&headers);
    Json(views::load_past_activations(state.api.as_ref(), &session, Utc::now()).await)
}

async fn on_air_map(State(state): State<AppState>) -> impl IntoResponse {
    Json(views::load_on_air_map(state.api.as_ref(), Utc::now()).await)
}

async fn site_map(State(state): State<AppState>) -> impl IntoResponse {
    Json(views::load_site_map(state.api.as_ref()).await)
}

async fn site_browser(State(state): State<AppState>) -> impl IntoResponse {
    Json(views::load_site_browser(state.api.as_ref()).await)
}

async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = session_from(&headers);
    Json(views::load_dashboard(state.api.as_ref(), &session).await)
}

async fn spot_helper(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = session_from(&headers);
    Json(views::load_spot_helper(state.api.as_ref(), &session, Utc::now()).await)
}

async fn post_spot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<SpotDraft>,
) -> Response {
    let session = session_from(&headers);
    let outcome = views::submit_spot(state.api.as_ref(), &draft, &session, Utc::now()).await;
    let status = match outcome.failure {
        Some(FailureKind::Validation) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (status, Json(outcome)).into_response()
}

async fn start_activation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<NewActivation>,
) -> Response {
    let session = session_from(&headers);
    match views::create_activation(state.api.as_ref(), &draft, &session, Utc::now()).await {
        Ok(activation) => (StatusCode::CREATED, Json(activation)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn finish_activation(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match views::end_activation(state.api.as_ref(), &id, Utc::now()).await {
        Ok(activation) => Json(activation).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn location_categories(State(state): State<AppState>) -> impl IntoResponse {
    Json(views::load_location_categories(state.api.as_ref()).await)
}

async fn propose_location(
    State(state): State<AppState>,
    Json(proposal): Json<LocationProposal>,
) -> impl IntoResponse {
    Json(views::submit_location_proposal(state.api.as_ref(), &proposal).await)
}

async fn login(State(state): State<AppState>, Json(credentials): Json<Credentials>) -> Response {
    let outcome = auth::login(state.api.as_ref(), &credentials).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    let mut response = (status, Json(&outcome)).into_response();
    if let Some(cookie) = outcome
        .session
        .to_set_cookie()
        .and_then(|cookie| HeaderValue::from_str(&cookie).ok())
    {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Response {
    let outcome = auth::register(state.api.as_ref(), &registration).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(outcome)).into_response()
}

async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, "callsign=; Path=/; SameSite=Lax; Max-Age=0")],
    )
}
