//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use forecast_analytics::{ForecastReport, IndicatorSet, MacdSeries, SeriesPayload};

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, ModelsResponse, PredictRequest,
    RootResponse,
};

/// Stock Forecaster API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stock Forecaster API",
        version = "0.1.0",
        description = r#"
# 주가 예측 REST API

일별 종가 이력으로 LSTM 모델의 자기회귀 예측을 수행하고,
차트용 기술적 지표(RSI, MACD, SMA50, EMA200)를 함께 반환합니다.

## 응답 규칙

- 시세 데이터가 없으면 `404 DATA_UNAVAILABLE`
- 예측만 실패한 경우 `200`과 함께 빈 `predicted`와 `error` 메시지
- 유한하지 않은 값은 `null`
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "forecast", description = "예측 - 과거 데이터, 예측, 지표"),
        (name = "models", description = "모델 - 레지스트리 캐시 및 아티팩트 상태")
    ),
    components(
        schemas(
            // ===== Health =====
            RootResponse,
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Forecast =====
            PredictRequest,
            ForecastReport,
            SeriesPayload,
            IndicatorSet,
            MacdSeries,

            // ===== Models =====
            ModelsResponse,
        )
    ),
    paths(
        crate::routes::root,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::predict::predict,
        crate::routes::models::list_models,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_valid() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&doc).unwrap();

        assert!(json.contains("Stock Forecaster API"));
        assert!(json.contains("/predict"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/models"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("PredictRequest"));
        assert!(json.contains("ForecastReport"));
        assert!(json.contains("IndicatorSet"));
        assert!(json.contains("ApiErrorResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
