//! 모델 레지스트리 조회 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 모델 레지스트리 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    /// 아티팩트 디렉토리
    pub model_dir: String,
    /// 메모리에 캐시된 horizon (오름차순)
    pub cached: Vec<usize>,
    /// 디렉토리에서 로드 가능한 horizon (오름차순)
    pub available: Vec<usize>,
    /// 시도 순서대로의 로드 전략 이름
    pub strategies: Vec<String>,
}

/// 모델 레지스트리 상태 조회.
///
/// GET /api/v1/models
#[utoipa::path(
    get,
    path = "/api/v1/models",
    responses((status = 200, description = "캐시 및 디렉토리 상태", body = ModelsResponse)),
    tag = "models"
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let registry = state.registry();

    Json(ModelsResponse {
        model_dir: registry.model_dir().display().to_string(),
        cached: registry.cached_horizons(),
        available: registry.available_horizons(),
        strategies: registry
            .strategy_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// 모델 라우터 생성.
pub fn models_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_models))
}
