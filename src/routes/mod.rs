//! API routes

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::session::SessionStore;
use crate::weather::{CurrentConditions, DailyForecastEntry, Location, WeatherError};
use crate::AppState;

/// Request/response header carrying the opaque per-browser session token.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/weather", post(weather))
        .route("/chat", post(chat))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<WeatherRequest>,
) -> Response {
    let location = match Location::from_parts(request.city, request.lat, request.lon) {
        Ok(location) => location,
        Err(err) => return err.into_response(),
    };

    match state.weather.resolve(&location).await {
        Ok((current, daily)) => {
            // Remember the resolved city for the chat assistant, minting a
            // token when the client did not send one.
            let token = session_token(&headers)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            state.sessions.set(&token, &current.city).await;

            (
                [(SESSION_HEADER, token)],
                Json(WeatherResponse { current, daily }),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Always 200: the gateway folds every failure into the reply text so the
/// front-end can render a chat bubble unconditionally.
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let last_city = match session_token(&headers) {
        Some(token) => state.sessions.get(&token).await,
        None => None,
    };

    let reply = state
        .gateway
        .respond(&request.message, last_city.as_deref())
        .await;

    Json(ChatResponse { reply })
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
