//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트에서 같은 에러 형식을 사용하며,
//! 파이프라인 에러([`ForecastError`])는 [`forecast_error_response`]로 변환합니다.

use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::ValidationErrors;

use forecast_core::ForecastError;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "DATA_UNAVAILABLE",
///   "message": "Could not fetch data for ZZZZ",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DATA_UNAVAILABLE", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// HTTP 메서드 (GET, POST 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// ```
    /// use forecast_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("DATA_UNAVAILABLE", "Could not fetch data for ZZZZ");
    /// assert_eq!(error.code(), "DATA_UNAVAILABLE");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 파이프라인 에러의 HTTP 상태 코드.
///
/// 예측 분기 에러는 보통 응답 본문의 `error` 필드로 격하되므로
/// 여기까지 오는 경우는 드뭅니다.
pub fn status_for(err: &ForecastError) -> StatusCode {
    match err {
        ForecastError::DataUnavailable(_) | ForecastError::ModelNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ForecastError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ForecastError::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::ModelLoad(_) | ForecastError::Inference(_) | ForecastError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// [`ForecastError`]를 API 에러 응답으로 변환합니다.
pub fn forecast_error_response(err: &ForecastError) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        status_for(err),
        Json(ApiErrorResponse::new(err.code(), err.to_string())),
    )
}

/// `validator` 검증 실패를 400 응답으로 변환합니다.
///
/// 필드별 메시지를 `; `로 이어 붙이고, 원본 에러는 `details`에 담습니다.
pub fn validation_error_response(errors: &ValidationErrors) -> (StatusCode, Json<ApiErrorResponse>) {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    let details = serde_json::to_value(errors).unwrap_or(Value::Null);

    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "VALIDATION_ERROR",
            message,
            details,
        )),
    )
}

/// JSON 본문 추출 실패(문법 오류, 누락 필드, 타입 불일치, Content-Type)를
/// 400 `VALIDATION_ERROR` 응답으로 변환합니다.
pub fn json_rejection_response(rejection: &JsonRejection) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "VALIDATION_ERROR",
            rejection.body_text(),
            serde_json::json!({ "rejection_status": rejection.status().as_u16() }),
        )),
    )
}

/// 500 응답 헬퍼.
pub fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse::new("INTERNAL_ERROR", message)),
    )
}
