//! 자기회귀 다단계 예측.

use tracing::{debug, trace};

use forecast_core::{ForecastError, ForecastResult};

use super::artifact::InferenceArtifact;
use super::scaling::ScalingContext;
use super::window::InputWindow;

/// 한 스텝 예측을 반복해 `predict_days`개 값을 생성합니다.
///
/// 매 스텝 예측값을 윈도우 끝에 붙이고 가장 오래된 값을 버립니다.
/// 스텝 사이에 숨은 상태는 없습니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoregressiveForecaster;

impl AutoregressiveForecaster {
    pub fn new() -> Self {
        Self
    }

    /// 예측을 실행하고 원래 가격 단위로 되돌린 값을 생성 순서대로 반환합니다.
    ///
    /// # 에러
    /// - 윈도우 길이가 모델의 `time_steps`와 다르면 `InvalidInput`
    /// - 모델 에러 또는 유한하지 않은 출력은 `Inference`
    pub fn forecast(
        &self,
        mut window: InputWindow,
        model: &dyn InferenceArtifact,
        scaler: &ScalingContext,
        predict_days: usize,
    ) -> ForecastResult<Vec<f64>> {
        if window.time_steps() != model.time_steps() {
            return Err(ForecastError::InvalidInput(format!(
                "window has {} steps but model expects {}",
                window.time_steps(),
                model.time_steps()
            )));
        }

        let mut normalized = Vec::with_capacity(predict_days);
        for step in 0..predict_days {
            let next = model.predict(&window)?;
            if !next.is_finite() {
                return Err(ForecastError::Inference(format!(
                    "model produced non-finite output {} at step {}",
                    next, step
                )));
            }
            trace!(step, value = next, "Forecast step");
            normalized.push(next);
            window.slide(next);
        }

        let forecast = scaler.denormalize_all(&normalized);
        debug!(
            predict_days,
            model = model.kind(),
            first = forecast.first().copied(),
            last = forecast.last().copied(),
            "Autoregressive forecast finished"
        );

        Ok(forecast)
    }
}
