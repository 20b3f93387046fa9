//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서버 동작 확인 메시지
//! - `/predict` - 주가 예측
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/models` - 모델 레지스트리 상태

pub mod health;
pub mod models;
pub mod predict;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use models::{models_router, ModelsResponse};
pub use predict::{predict_router, PredictRequest};

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 루트 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

/// 서버 동작 확인.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "서버 동작 중", body = RootResponse)),
    tag = "health"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Stock Prediction API is running".to_string(),
    })
}

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .nest("/predict", predict_router())
        .nest("/health", health_router())
        .nest("/api/v1/models", models_router())
}
