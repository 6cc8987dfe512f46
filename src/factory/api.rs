use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::debug;

use super::bot::Bot;
use super::models::{BotMessageRequest, BotResponse, Sourced};
use super::store::DataStore;

/// Response header naming whether the body came from the dataset or the
/// placeholder generator.
pub const DATA_ORIGIN_HEADER: HeaderName = HeaderName::from_static("x-data-origin");

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub store: DataStore,
    pub bot: Bot,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/factory/metrics", get(get_metrics))
        .route("/api/factory/status", get(get_status))
        .route("/api/factory/machine-types", get(get_machine_types))
        .route("/api/factory/batch-quality", get(get_batch_quality))
        .route("/api/factory/energy-metrics", get(get_energy_metrics))
        .route("/api/factory/bot", post(bot_message))
        .route("/health", get(health_check))
}

// ── Helpers ───────────────────────────────────────────────────────────

fn sourced_json<T: Serialize>(sourced: Sourced<T>) -> Response {
    (
        [(DATA_ORIGIN_HEADER, sourced.origin.as_str())],
        Json(sourced.value),
    )
        .into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn get_metrics(State(state): State<SharedState>) -> Response {
    sourced_json(state.store.metrics())
}

async fn get_status(State(state): State<SharedState>) -> Response {
    sourced_json(state.store.status())
}

async fn get_machine_types(State(state): State<SharedState>) -> Response {
    sourced_json(state.store.machine_types())
}

async fn get_batch_quality(State(state): State<SharedState>) -> Response {
    sourced_json(state.store.batch_quality())
}

async fn get_energy_metrics(State(state): State<SharedState>) -> Response {
    sourced_json(state.store.energy_metrics())
}

async fn bot_message(
    State(state): State<SharedState>,
    payload: Result<Json<BotMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    debug!(message = %req.message, "Bot question received");
    let message = state.bot.reply(&req.message).await;
    Ok(Json(BotResponse { message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BotError;
    use crate::factory::bot::{AnswerProvider, DEFAULT_PRODUCTION_TARGET, KeywordResponder};
    use crate::factory::fixtures::{row, table, with_machine, with_production, with_utilization};
    use crate::factory::models::Table;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state_for(store: DataStore) -> SharedState {
        let bot = Bot::new(KeywordResponder::new(store.clone(), DEFAULT_PRODUCTION_TARGET));
        Arc::new(AppState { store, bot })
    }

    fn test_app(t: Table) -> Router {
        api_router().with_state(state_for(DataStore::new(t)))
    }

    fn sample_table() -> Table {
        table(vec![
            with_production(with_utilization(row("2020-01-01"), 40.0), 50.0),
            with_production(with_machine(row("2020-01-01"), "Mixer", "B2"), 70.0),
            with_production(with_utilization(row("2020-01-02"), 53.0), 150.0),
            with_production(with_utilization(row("2020-01-02"), 59.0), 150.0),
        ])
    }

    async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(app: Router, uri: &str) -> Response {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn post_bot(app: Router, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/api/factory/bot")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    fn origin(resp: &Response) -> &str {
        resp.headers()
            .get(&DATA_ORIGIN_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = get(test_app(Table::empty()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_metrics_from_dataset() {
        let response = get(test_app(sample_table()), "/api/factory/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(origin(&response), "observed");

        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["production"], 105.0);
        let points = body["timeSeriesData"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["name"], "2020-01-01");
        assert_eq!(points[0]["production"], 60.0);
        assert_eq!(points[1]["production"], 150.0);
        assert!(body.get("profitMargin").is_some());
    }

    #[tokio::test]
    async fn test_metrics_without_dataset() {
        let response = get(test_app(Table::empty()), "/api/factory/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(origin(&response), "synthetic");

        let body: serde_json::Value = body_json(response.into_body()).await;
        let production = body["production"].as_f64().unwrap();
        assert!((1000.0..=1500.0).contains(&production));
        assert_eq!(body["timeSeriesData"][0]["name"], "Day 1");
    }

    #[tokio::test]
    async fn test_status_latest_date_only() {
        let response = get(test_app(sample_table()), "/api/factory/status").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(origin(&response), "observed");

        let body: Vec<serde_json::Value> = body_json(response.into_body()).await;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0]["id"], "line-2");
        assert_eq!(body[0]["status"], "warning");
        assert_eq!(body[0]["efficiency"], "53.0%");
        assert_eq!(body[1]["status"], "operational");
        assert_eq!(body[1]["lastMaintenance"], "3.0 years");
    }

    #[tokio::test]
    async fn test_status_without_dataset() {
        let response = get(test_app(Table::empty()), "/api/factory/status").await;
        assert_eq!(origin(&response), "synthetic");
        let body: Vec<serde_json::Value> = body_json(response.into_body()).await;
        assert_eq!(body.len(), 5);
        assert_eq!(body[3]["efficiency"], "0%");
    }

    #[tokio::test]
    async fn test_machine_types() {
        let response = get(test_app(sample_table()), "/api/factory/machine-types").await;
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body, serde_json::json!({"machine_types": ["Extruder", "Mixer"]}));

        let response = get(test_app(Table::empty()), "/api/factory/machine-types").await;
        assert_eq!(origin(&response), "synthetic");
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body, serde_json::json!({"machine_types": ["Type 1", "Type 2", "Type 3"]}));
    }

    #[tokio::test]
    async fn test_batch_quality_and_energy() {
        let response = get(test_app(sample_table()), "/api/factory/batch-quality").await;
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body, serde_json::json!({"average": 90.0, "min": 90.0, "max": 90.0}));

        let response = get(test_app(sample_table()), "/api/factory/energy-metrics").await;
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(
            body,
            serde_json::json!({"consumption": 700.0, "efficiency": 1.5, "emissions": 600.0})
        );

        let response = get(test_app(Table::empty()), "/api/factory/energy-metrics").await;
        assert_eq!(origin(&response), "synthetic");
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["consumption"], 800.0);
    }

    #[tokio::test]
    async fn test_missing_values_serialize_as_null() {
        let mut r = row("2020-01-01");
        r.batch_quality = f64::NAN;
        let response = get(test_app(table(vec![r])), "/api/factory/batch-quality").await;
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["average"].is_null());
    }

    #[tokio::test]
    async fn test_bot_answers() {
        let response = post_bot(test_app(sample_table()), r#"{"message": "How's our efficiency?"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: BotResponse = body_json(response.into_body()).await;
        assert!(body.message.starts_with("Factory efficiency is currently at"));

        let response = post_bot(test_app(sample_table()), r#"{"message": "sing me a song"}"#).await;
        let body: BotResponse = body_json(response.into_body()).await;
        assert!(body.message.starts_with("I'm not sure I understand."));
    }

    #[tokio::test]
    async fn test_bot_rejects_malformed_body() {
        let response = post_bot(test_app(sample_table()), "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["error"].is_string());

        let response = post_bot(test_app(sample_table()), r#"{"text": "production"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    struct Unreachable;

    #[async_trait]
    impl AnswerProvider for Unreachable {
        async fn answer(&self, _question: &str) -> Result<String, BotError> {
            Err(BotError::Timeout { secs: 0 })
        }
    }

    #[tokio::test]
    async fn test_bot_remote_failure_falls_back() {
        let store = DataStore::new(sample_table());
        let bot = Bot::new(KeywordResponder::new(store.clone(), DEFAULT_PRODUCTION_TARGET))
            .with_remote(Arc::new(Unreachable), Duration::from_secs(1));
        let app = api_router().with_state(Arc::new(AppState { store, bot }));

        let response = post_bot(app, r#"{"message": "downtime?"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: BotResponse = body_json(response.into_body()).await;
        assert!(body.message.starts_with("Current downtime is 1.00 hours."));
    }
}
