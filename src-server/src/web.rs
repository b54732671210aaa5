use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiResult;
use crate::message::{MessageListResponse, MessageProjection, MessageQuery, MessageService, NewMessage};
use crate::providers::{ProviderListMode, ProviderRegistry, ProviderStatus};
use crate::store::RunSummary;

#[derive(Clone)]
pub struct WebState {
    pub messages: MessageService,
    pub providers: Arc<ProviderRegistry>,
}

pub fn build_router(state: WebState, config: &ServerConfig) -> Router {
    let index = config.static_dir.join("index.html");
    // SPA fallback: unknown paths get index.html
    let assets = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/messages", get(list_messages))
        .route("/api/pipeline-runs", get(list_runs))
        .route("/api/pipeline-runs/:run_id/messages", get(list_run_messages).post(append_message))
        .route("/api/providers", get(list_providers))
        .fallback_service(assets)
        .with_state(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn list_messages(
    State(state): State<WebState>,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> ApiResult<Json<MessageListResponse>> {
    let Query(query) = query?;
    Ok(Json(state.messages.list(&query).await?))
}

#[derive(Deserialize)]
struct AgentFilter {
    agent: Option<String>,
}

async fn list_run_messages(
    State(state): State<WebState>,
    Path(run_id): Path<String>,
    filter: Result<Query<AgentFilter>, QueryRejection>,
) -> ApiResult<Json<MessageListResponse>> {
    let Query(filter) = filter?;
    let query = MessageQuery {
        pipeline_run_id: Some(run_id),
        agent: filter.agent,
    };
    Ok(Json(state.messages.list(&query).await?))
}

async fn append_message(
    State(state): State<WebState>,
    Path(run_id): Path<String>,
    body: Result<Json<NewMessage>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageProjection>)> {
    let Json(body) = body?;
    let stored = state.messages.append(&run_id, body).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn list_runs(State(state): State<WebState>) -> ApiResult<Json<Vec<RunSummary>>> {
    Ok(Json(state.messages.runs().await?))
}

#[derive(Deserialize)]
struct ProviderParams {
    refresh: Option<String>,
}

impl ProviderParams {
    fn mode(&self) -> ProviderListMode {
        match self.refresh.as_deref().map(str::trim) {
            Some("true") | Some("1") | Some("") => ProviderListMode::Refresh,
            _ => ProviderListMode::Routine,
        }
    }
}

async fn list_providers(
    State(state): State<WebState>,
    params: Result<Query<ProviderParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ProviderStatus>>> {
    let Query(params) = params?;
    Ok(Json(state.providers.list(params.mode()).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(refresh: Option<&str>) -> ProviderParams {
        ProviderParams {
            refresh: refresh.map(str::to_string),
        }
    }

    #[test]
    fn refresh_hint_selects_refresh_mode() {
        assert_eq!(params(None).mode(), ProviderListMode::Routine);
        assert_eq!(params(Some("false")).mode(), ProviderListMode::Routine);
        assert_eq!(params(Some("true")).mode(), ProviderListMode::Refresh);
        assert_eq!(params(Some("1")).mode(), ProviderListMode::Refresh);
        assert_eq!(params(Some("")).mode(), ProviderListMode::Refresh);
    }
}
