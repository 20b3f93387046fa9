//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 예측 파이프라인 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # 패닉
///
/// 레코더가 이미 설치되어 있으면 패닉합니다.
pub fn setup_metrics_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )
        .expect("히스토그램 버킷 설정 실패")
        // 예측은 데이터 조회 + 수십 번의 추론이라 HTTP보다 긴 구간이 필요
        .set_buckets_for_metric(
            Matcher::Full("forecast_duration_seconds".to_string()),
            &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
        )
        .expect("히스토그램 버킷 설정 실패")
        .install_recorder()
        .expect("Prometheus 레코더 설치 실패")
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// 처리 중인 HTTP 요청 수 증감.
pub fn adjust_http_in_flight(route: &str, delta: f64) {
    gauge!("http_requests_in_flight", "route" => route.to_string()).increment(delta);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, route: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, route: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 예측 메트릭 헬퍼 함수
// ============================================================================

/// 예측 요청 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastOutcome {
    /// 예측 포함 응답
    Ok,
    /// 예측 분기 실패, 과거 데이터와 지표만 응답
    Degraded,
    /// 시세 데이터 없음
    NotFound,
    /// 요청 검증 실패
    Invalid,
    /// 내부 오류
    Failed,
}

impl ForecastOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastOutcome::Ok => "ok",
            ForecastOutcome::Degraded => "degraded",
            ForecastOutcome::NotFound => "not_found",
            ForecastOutcome::Invalid => "invalid",
            ForecastOutcome::Failed => "failed",
        }
    }
}

/// 예측 요청 카운터 증가.
pub fn record_forecast(outcome: ForecastOutcome) {
    counter!("forecast_requests_total", "outcome" => outcome.as_str()).increment(1);
}

/// 예측 파이프라인 소요 시간 기록.
pub fn record_forecast_duration(time_steps: usize, duration_secs: f64) {
    histogram!(
        "forecast_duration_seconds",
        "time_steps" => time_steps.to_string()
    )
    .record(duration_secs);
}

/// 캐시된 모델 수 설정.
pub fn set_cached_models(count: usize) {
    gauge!("forecast_models_cached").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ForecastOutcome::Ok.as_str(), "ok");
        assert_eq!(ForecastOutcome::Degraded.as_str(), "degraded");
        assert_eq!(ForecastOutcome::NotFound.as_str(), "not_found");
    }

    #[test]
    fn test_helpers_without_recorder() {
        // 레코더가 없으면 no-op
        record_forecast(ForecastOutcome::Ok);
        record_forecast_duration(60, 0.5);
        set_cached_models(2);
        adjust_http_in_flight("/predict", 1.0);
        record_http_response("POST", "/predict", 200);
        record_http_duration("POST", "/predict", 0.1);
    }
}
