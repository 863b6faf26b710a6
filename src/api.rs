// src/api.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::aggregate::{self, CommentBatch, InputError, PostBatch};
use crate::config::{NegationMode, ScoringConfig, ScoringPolicy};
use crate::nlp;
use crate::sentiment::{SentimentAnalyzer, SentimentScore};

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<SentimentAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: SentimentAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }

    /// Shared lexical resource plus scoring config from env/TOML.
    pub fn from_env() -> anyhow::Result<Self> {
        let resource = nlp::init_shared()?;
        let config = ScoringConfig::from_env()?;
        info!(target: "api", policy = %config.policy, negation = ?config.negation_mode, "scoring config loaded");
        Ok(Self::new(SentimentAnalyzer::new(resource, config)))
    }
}

fn debug_routes_enabled() -> bool {
    std::env::var(ENV_DEBUG_ROUTES).ok().is_some_and(|v| v == "1")
}

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze_comments", post(analyze_comments))
        .route("/analyze_posts", post(analyze_posts));

    if debug_routes_enabled() {
        router = router.route("/debug/score", get(debug_score));
    }

    router.layer(CorsLayer::very_permissive()).with_state(state)
}

/// Caller error rendered as `400 {"error": "..."}`.
pub struct ApiError(InputError);

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(target: "api", error = %self.0, "rejected request body");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct Envelope<T> {
    data: T,
}

// A missing key means "empty list"; a body that is not an object is a shape error.
fn list_field(body: &Value, key: &str, err: InputError) -> Result<Value, InputError> {
    let obj = body.as_object().ok_or(err)?;
    Ok(obj.get(key).cloned().unwrap_or_else(|| Value::Array(Vec::new())))
}

async fn analyze_comments(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Envelope<CommentBatch>>, ApiError> {
    let comments = list_field(&body, "comments", InputError::CommentsNotList)?;
    let batch = aggregate::score_comments(&state.analyzer, &comments)?;
    info!(
        target: "api",
        comments = batch.comments.len(),
        positive = batch.total.positive,
        neutral = batch.total.neutral,
        negative = batch.total.negative,
        "comments scored"
    );
    Ok(Json(Envelope { data: batch }))
}

async fn analyze_posts(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Envelope<PostBatch>>, ApiError> {
    let posts = list_field(&body, "posts", InputError::PostsNotList)?;
    let batch = aggregate::score_posts(&state.analyzer, &posts)?;
    info!(
        target: "api",
        posts = batch.posts.len(),
        positive = batch.overall_total.positive,
        neutral = batch.overall_total.neutral,
        negative = batch.overall_total.negative,
        "posts scored"
    );
    Ok(Json(Envelope { data: batch }))
}

#[derive(Deserialize)]
struct DebugScoreQuery {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct DebugScoreOut {
    policy: ScoringPolicy,
    negation_mode: NegationMode,
    /// `(positive, negative)`
    thresholds: (f32, f32),
    enriched: String,
    #[serde(flatten)]
    score: SentimentScore,
}

async fn debug_score(
    State(state): State<AppState>,
    Query(q): Query<DebugScoreQuery>,
) -> Json<DebugScoreOut> {
    let analyzer = &state.analyzer;
    let config = analyzer.config();
    let enriched = analyzer.enrich(&q.text.to_lowercase());
    let score = analyzer.score_enriched(&enriched);
    Json(DebugScoreOut {
        policy: config.policy,
        negation_mode: config.negation_mode,
        thresholds: config.thresholds(),
        enriched,
        score,
    })
}
