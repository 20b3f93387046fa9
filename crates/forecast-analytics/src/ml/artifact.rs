//! 추론 아티팩트 trait.
//!
//! 레지스트리가 캐시하는 로드된 모델은 모두 이 trait 뒤에 있습니다.
//! 구현체는 여러 요청 스레드에서 동시에 공유됩니다.

use std::sync::Arc;

use forecast_core::{ForecastError, ForecastResult};

use super::window::InputWindow;

/// 한 스텝 예측이 가능한 로드된 모델.
pub trait InferenceArtifact: Send + Sync {
    /// 정규화된 입력 윈도우에서 다음 정규화 값 하나를 예측합니다.
    fn predict(&self, window: &InputWindow) -> ForecastResult<f32>;

    /// 학습 시 사용한 입력 윈도우 길이.
    fn time_steps(&self) -> usize;

    /// 아티팩트 종류 (로그/응답용, 예: "onnx", "weights").
    fn kind(&self) -> &'static str;
}

/// 레지스트리가 반환하는 공유 모델 핸들.
pub type ModelHandle = Arc<dyn InferenceArtifact>;

/// 실제 모델 파일 없이 테스트하기 위한 mock 아티팩트.
#[derive(Debug, Clone)]
pub struct MockArtifact {
    time_steps: usize,
    mode: MockMode,
}

/// mock 출력 방식.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockMode {
    /// 항상 같은 값
    Fixed(f32),
    /// 윈도우의 마지막 값을 그대로 반환 (지속 모델)
    LastValue,
    /// 항상 추론 에러
    Failing,
}

impl MockArtifact {
    pub fn new(time_steps: usize, mode: MockMode) -> Self {
        Self { time_steps, mode }
    }

    pub fn fixed(time_steps: usize, value: f32) -> Self {
        Self::new(time_steps, MockMode::Fixed(value))
    }

    pub fn last_value(time_steps: usize) -> Self {
        Self::new(time_steps, MockMode::LastValue)
    }
}

impl InferenceArtifact for MockArtifact {
    fn predict(&self, window: &InputWindow) -> ForecastResult<f32> {
        match self.mode {
            MockMode::Fixed(value) => Ok(value),
            MockMode::LastValue => window
                .last()
                .ok_or_else(|| ForecastError::Inference("empty input window".to_string())),
            MockMode::Failing => Err(ForecastError::Inference("mock failure".to_string())),
        }
    }

    fn time_steps(&self) -> usize {
        self.time_steps
    }

    fn kind(&self) -> &'static str {
        "mock"
    }
}
