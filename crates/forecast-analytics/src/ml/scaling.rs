//! Min-max 정규화.
//!
//! 전체 이력에서 한 번 fit 하고, 같은 컨텍스트로 모델 입력을 정규화하고
//! 모델 출력을 원래 가격 단위로 되돌립니다.

use serde::{Deserialize, Serialize};

use forecast_core::{ForecastError, ForecastResult};

/// 전체 시계열에서 구한 (min, max) 정규화 컨텍스트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingContext {
    min: f64,
    max: f64,
}

impl ScalingContext {
    /// 값 목록에서 min/max를 구합니다.
    ///
    /// # 에러
    /// 빈 입력이거나 유한하지 않은 값이 있으면 `InvalidInput`.
    pub fn fit(values: &[f64]) -> ForecastResult<Self> {
        if values.is_empty() {
            return Err(ForecastError::InvalidInput(
                "cannot fit scaling context on an empty series".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidInput(format!(
                "cannot fit scaling context on non-finite value {}",
                bad
            )));
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// 모든 값이 같은 경우 (max == min).
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// (x - min) / (max - min). 범위가 0이면 0.0.
    pub fn normalize(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (x - self.min) / (self.max - self.min)
        }
    }

    /// y × (max - min) + min. 범위가 0이면 min.
    pub fn denormalize(&self, y: f64) -> f64 {
        if self.is_degenerate() {
            self.min
        } else {
            y * (self.max - self.min) + self.min
        }
    }

    /// 모델 입력용 f32 정규화 시퀀스.
    pub fn normalize_all(&self, values: &[f64]) -> Vec<f32> {
        values.iter().map(|&v| self.normalize(v) as f32).collect()
    }

    pub fn denormalize_all(&self, values: &[f32]) -> Vec<f64> {
        values.iter().map(|&v| self.denormalize(v as f64)).collect()
    }
}
