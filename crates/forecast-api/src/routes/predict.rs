//! 예측 endpoint.
//!
//! `POST /predict`는 전체 일봉 이력을 조회한 뒤 예측 파이프라인을
//! blocking 풀에서 실행하고, 과거 데이터/예측/지표를 하나의 응답으로 반환합니다.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, State},
    http::{Method, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use forecast_analytics::ForecastReport;
use forecast_core::{ForecastConfig, ForecastError, HistoryPeriod};
use forecast_data::normalize_ticker;

use crate::error::{
    forecast_error_response, internal_error, json_rejection_response, validation_error_response,
    ApiErrorResponse, ApiResult,
};
use crate::metrics::{record_forecast, record_forecast_duration, set_cached_models, ForecastOutcome};
use crate::state::AppState;

/// 허용되는 최대 입력 윈도우 길이.
pub const MAX_TIME_STEPS: usize = 10_000;

/// 예측 요청.
///
/// `ticker` 외의 필드는 생략하면 서버 설정의 기본값을 사용합니다.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PredictRequest {
    /// 종목 코드 (예: "AAPL")
    #[validate(
        length(min = 1, max = 20, message = "ticker must be 1-20 characters"),
        custom(function = "validate_ticker")
    )]
    pub ticker: String,

    /// 표시 기간 ("1d", "5d", "1m", "6m", "1y", "5y", "ytd", "max"). 알 수 없는 값은 "1y".
    #[serde(default)]
    pub period: Option<String>,

    /// 모델 입력 윈도우 길이 (1-10000)
    #[serde(default)]
    #[validate(range(min = 1, max = 10000, message = "time_steps must be within 1..=10000"))]
    pub time_steps: Option<usize>,

    /// 예측 영업일 수 (1 이상, 서버 한도 이하)
    #[serde(default)]
    #[validate(range(min = 1, message = "predict_days must be at least 1"))]
    pub predict_days: Option<usize>,
}

fn validate_ticker(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("ticker_blank").with_message("ticker must not be blank".into()));
    }
    // 지수(^GSPC), 해외 거래소(005930.KS), 선물(ES=F) 표기를 허용
    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(ValidationError::new("ticker_charset")
            .with_message("ticker may only contain letters, digits, '.', '-', '^' and '='".into()));
    }
    Ok(())
}

/// 기본값이 적용된 요청 파라미터.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub ticker: String,
    pub period: HistoryPeriod,
    pub time_steps: usize,
    pub predict_days: usize,
}

impl PredictRequest {
    /// 설정 기본값을 채우고 요청 한도를 검사합니다.
    pub fn resolve(&self, config: &ForecastConfig) -> Result<ResolvedRequest, ValidationErrors> {
        self.validate()?;

        let predict_days = self.predict_days.unwrap_or(config.default_predict_days);
        if predict_days > config.max_predict_days {
            let mut errors = ValidationErrors::new();
            errors.add(
                "predict_days",
                ValidationError::new("range").with_message(
                    format!("predict_days must be within 1..={}", config.max_predict_days).into(),
                ),
            );
            return Err(errors);
        }

        let period = self
            .period
            .as_deref()
            .unwrap_or(&config.default_period);

        Ok(ResolvedRequest {
            ticker: normalize_ticker(&self.ticker),
            period: HistoryPeriod::parse_lenient(period),
            time_steps: self.time_steps.unwrap_or(config.default_time_steps),
            predict_days,
        })
    }
}

/// 예측 실행.
///
/// POST /predict
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "과거 데이터, 예측, 지표 (예측 실패 시 error 필드 포함)", body = ForecastReport),
        (status = 400, description = "요청 검증 실패", body = ApiErrorResponse),
        (status = 404, description = "시세 데이터 없음", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "forecast"
)]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<Json<ForecastReport>> {
    let reject = |(status, Json(body)): (StatusCode, Json<ApiErrorResponse>)| {
        record_forecast(ForecastOutcome::Invalid);
        (status, Json(body.with_request_info(&method, &uri)))
    };

    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected predict body");
        reject(json_rejection_response(&rejection))
    })?;

    let params = request
        .resolve(&state.config.forecast)
        .map_err(|errors| reject(validation_error_response(&errors)))?;

    let started = Instant::now();

    let series = state
        .provider
        .fetch_history(&params.ticker)
        .await
        .map_err(|e| {
            warn!(ticker = %params.ticker, provider = state.provider.name(), error = %e, "Market data fetch failed");
            record_forecast(ForecastOutcome::NotFound);
            forecast_error_response(&ForecastError::from(e))
        })?;

    let service = Arc::clone(&state.service);
    let ResolvedRequest {
        ticker,
        period,
        time_steps,
        predict_days,
    } = params;

    let result = tokio::task::spawn_blocking(move || {
        service.report(&series, period, time_steps, predict_days)
    })
    .await
    .map_err(|e| {
        record_forecast(ForecastOutcome::Failed);
        internal_error(format!("Forecast task failed: {}", e))
    })?;

    let report = result.map_err(|e| {
        warn!(ticker = %ticker, error = %e, "Forecast request failed");
        let outcome = if e.is_fatal() {
            ForecastOutcome::NotFound
        } else {
            ForecastOutcome::Failed
        };
        record_forecast(outcome);
        forecast_error_response(&e)
    })?;

    let outcome = if report.has_forecast() {
        ForecastOutcome::Ok
    } else {
        ForecastOutcome::Degraded
    };
    record_forecast(outcome);
    record_forecast_duration(time_steps, started.elapsed().as_secs_f64());
    set_cached_models(state.registry().cached_horizons().len());

    info!(
        ticker = %ticker,
        time_steps,
        predict_days,
        outcome = outcome.as_str(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Prediction served"
    );

    Ok(Json(report))
}

/// 예측 라우터 생성.
pub fn predict_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(predict))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ticker: &str) -> PredictRequest {
        PredictRequest {
            ticker: ticker.to_string(),
            period: None,
            time_steps: None,
            predict_days: None,
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = request(" aapl ").resolve(&ForecastConfig::default()).unwrap();
        assert_eq!(
            resolved,
            ResolvedRequest {
                ticker: "AAPL".to_string(),
                period: HistoryPeriod::OneYear,
                time_steps: 60,
                predict_days: 30,
            }
        );
    }

    #[test]
    fn test_resolve_unknown_period_falls_back() {
        let mut req = request("MSFT");
        req.period = Some("2w".to_string());
        let resolved = req.resolve(&ForecastConfig::default()).unwrap();
        assert_eq!(resolved.period, HistoryPeriod::OneYear);

        req.period = Some("max".to_string());
        let resolved = req.resolve(&ForecastConfig::default()).unwrap();
        assert_eq!(resolved.period, HistoryPeriod::Max);
    }

    #[test]
    fn test_rejects_bad_ticker() {
        assert!(request("").resolve(&ForecastConfig::default()).is_err());
        assert!(request("   ").resolve(&ForecastConfig::default()).is_err());
        assert!(request("AAPL; DROP").resolve(&ForecastConfig::default()).is_err());
        assert!(request("ABCDEFGHIJKLMNOPQRSTU").resolve(&ForecastConfig::default()).is_err());
        assert!(request("^GSPC").resolve(&ForecastConfig::default()).is_ok());
        assert!(request("005930.KS").resolve(&ForecastConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_numbers() {
        let mut req = request("AAPL");
        req.time_steps = Some(0);
        assert!(req.resolve(&ForecastConfig::default()).is_err());

        req.time_steps = Some(MAX_TIME_STEPS + 1);
        assert!(req.resolve(&ForecastConfig::default()).is_err());

        req.time_steps = Some(MAX_TIME_STEPS);
        assert!(req.resolve(&ForecastConfig::default()).is_ok());

        req.predict_days = Some(0);
        assert!(req.resolve(&ForecastConfig::default()).is_err());
    }

    #[test]
    fn test_predict_days_limited_by_config() {
        let mut config = ForecastConfig::default();
        config.max_predict_days = 10;

        let mut req = request("AAPL");
        req.predict_days = Some(11);
        let errors = req.resolve(&config).unwrap_err();
        assert!(errors.field_errors().contains_key("predict_days"));

        req.predict_days = Some(10);
        assert_eq!(req.resolve(&config).unwrap().predict_days, 10);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: PredictRequest = serde_json::from_str(r#"{"ticker":"AAPL"}"#).unwrap();
        assert!(req.period.is_none());
        assert!(req.time_steps.is_none());
        assert!(req.predict_days.is_none());
    }
}
