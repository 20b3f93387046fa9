//! 예측 서비스 - 파이프라인 경계.
//!
//! 정규화 → 윈도우 → 모델 선택 → 자기회귀 예측을 실행하고,
//! 지표 계산과 응답 조립까지 묶습니다.
//! 예측 분기 에러는 여기서 "빈 예측 + 에러 메시지"로 격하됩니다.

use std::sync::Arc;

use tracing::{info, warn};

use forecast_core::{forecast_span, ForecastError, ForecastResult, HistoryPeriod, PriceSeries};

use crate::indicators::{IndicatorEngine, IndicatorSet};
use crate::report::ForecastReport;

use super::forecaster::AutoregressiveForecaster;
use super::registry::ModelRegistry;
use super::scaling::ScalingContext;
use super::window::InputWindow;

/// 예측 파이프라인 서비스.
///
/// 요청마다 상태를 공유하지 않으며, 레지스트리만 요청 사이에 공유됩니다.
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    engine: IndicatorEngine,
    forecaster: AutoregressiveForecaster,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            engine: IndicatorEngine::new(),
            forecaster: AutoregressiveForecaster::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// 전체 이력에서 `predict_days`개 종가를 예측합니다.
    ///
    /// 이력 길이는 모델 조회 전에 검사하므로, 데이터가 부족하면
    /// 아티팩트 유무와 관계없이 `InsufficientHistory`가 반환됩니다.
    pub fn forecast(
        &self,
        series: &PriceSeries,
        time_steps: usize,
        predict_days: usize,
    ) -> ForecastResult<Vec<f64>> {
        let closes = series.closes();
        let scaler = ScalingContext::fit(&closes)?;
        let normalized = scaler.normalize_all(&closes);
        let window = InputWindow::from_tail(&normalized, time_steps)?;
        let model = self.registry.get_model(time_steps)?;

        self.forecaster
            .forecast(window, model.as_ref(), &scaler, predict_days)
    }

    /// 전체 이력에서 지표를 계산합니다.
    pub fn indicators(&self, series: &PriceSeries) -> IndicatorSet {
        self.engine.compute(&series.closes())
    }

    /// 예측 응답 전체를 만듭니다.
    ///
    /// 지표와 과거 데이터는 예측 성공 여부와 관계없이 항상 포함됩니다.
    ///
    /// # 에러
    /// 빈 시계열이면 `DataUnavailable`. 예측 분기 에러는 반환하지 않고
    /// 응답의 `error` 필드에 기록합니다.
    pub fn report(
        &self,
        series: &PriceSeries,
        period: HistoryPeriod,
        time_steps: usize,
        predict_days: usize,
    ) -> ForecastResult<ForecastReport> {
        let span = forecast_span!("forecast_report", series.ticker(), time_steps, predict_days);
        let _enter = span.enter();

        if series.is_empty() {
            return Err(ForecastError::DataUnavailable(series.ticker().to_string()));
        }

        let indicators = self.indicators(series);

        let (forecast, error) = match self.forecast(series, time_steps, predict_days) {
            Ok(forecast) => (forecast, None),
            Err(e) if e.is_forecast_branch() => {
                warn!(error = %e, code = e.code(), "Forecast branch failed, returning history only");
                (Vec::new(), Some(e.to_string()))
            }
            Err(e) => return Err(e),
        };

        let visible = period.window(series);
        let report = ForecastReport::assemble(
            visible,
            series.last_date(),
            &forecast,
            &indicators.tail(visible.len()),
            error,
        );

        info!(
            period = %period,
            history = series.len(),
            displayed = visible.len(),
            predicted = report.predicted.prices.len(),
            "Forecast report assembled"
        );

        Ok(report)
    }
}
