use crate::app::build_extractor;
use crate::config::AppConfig;
use crate::core::extractor::LinkExtractor;
use crate::domain::model::{ErrorBody, ExtractRequest};
use crate::domain::ports::{PageFetcher, TitleShortener};
use crate::utils::error::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("index.html");

/// 所有 handler 共用的狀態
pub struct AppState<F: PageFetcher, S: TitleShortener> {
    pub extractor: Arc<LinkExtractor<F, S>>,
    // 請求沒帶 api_key 時使用
    pub default_api_key: Option<String>,
}

impl<F: PageFetcher, S: TitleShortener> Clone for AppState<F, S> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            default_api_key: self.default_api_key.clone(),
        }
    }
}

impl<F: PageFetcher, S: TitleShortener> AppState<F, S> {
    pub fn new(extractor: LinkExtractor<F, S>, default_api_key: Option<String>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            default_api_key,
        }
    }
}

/// 網頁介面與 `/extract` API 的路由
pub fn router<F, S>(state: AppState<F, S>) -> Router
where
    F: PageFetcher + 'static,
    S: TitleShortener + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/extract", post(extract::<F, S>))
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let extractor = build_extractor(&config)?;
    let state = AppState::new(extractor, config.gemini.resolved_api_key());
    if state.default_api_key.is_none() {
        tracing::info!("💡 No Gemini API key configured, long titles will be truncated");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
    tracing::info!("🌐 Listening on {}", config.server.public_url());
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

/// POST /extract，body 為 `{"url": ..., "api_key": ...}`
async fn extract<F, S>(
    State(state): State<AppState<F, S>>,
    Json(request): Json<ExtractRequest>,
) -> Response
where
    F: PageFetcher + 'static,
    S: TitleShortener + 'static,
{
    let Some(video_url) = request.url.filter(|url| !url.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "No URL provided".to_string());
    };

    let api_key = request
        .api_key
        .filter(|key| !key.is_empty())
        .or_else(|| state.default_api_key.clone());

    match state.extractor.extract(&video_url, api_key.as_deref()).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!("❌ Extraction failed for {}: {}", video_url, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
