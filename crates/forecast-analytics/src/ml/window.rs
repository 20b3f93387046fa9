//! 모델 입력 윈도우.

use forecast_core::{ForecastError, ForecastResult};

/// 정규화된 최근 `time_steps`개 값 (오래된 순서).
///
/// 모델 입력 형태는 `[1, time_steps, 1]`입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct InputWindow {
    values: Vec<f32>,
}

impl InputWindow {
    /// 정규화된 시퀀스의 마지막 `time_steps`개로 윈도우를 만듭니다.
    ///
    /// # 에러
    /// - `time_steps == 0`이면 `InvalidInput`
    /// - 시퀀스가 더 짧으면 `InsufficientHistory`
    pub fn from_tail(normalized: &[f32], time_steps: usize) -> ForecastResult<Self> {
        if time_steps == 0 {
            return Err(ForecastError::InvalidInput(
                "time_steps must be positive".to_string(),
            ));
        }
        if normalized.len() < time_steps {
            return Err(ForecastError::InsufficientHistory {
                required: time_steps,
                actual: normalized.len(),
            });
        }

        Ok(Self {
            values: normalized[normalized.len() - time_steps..].to_vec(),
        })
    }

    pub fn time_steps(&self) -> usize {
        self.values.len()
    }

    /// 텐서 형태 `[batch, time_steps, features]`.
    pub fn shape(&self) -> [usize; 3] {
        [1, self.values.len(), 1]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// 가장 최근 값.
    pub fn last(&self) -> Option<f32> {
        self.values.last().copied()
    }

    /// 가장 오래된 값을 버리고 `next`를 뒤에 붙입니다. 길이는 유지됩니다.
    pub fn slide(&mut self, next: f32) {
        self.values.rotate_left(1);
        if let Some(slot) = self.values.last_mut() {
            *slot = next;
        }
    }
}
