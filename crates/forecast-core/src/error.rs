//! 예측 파이프라인의 에러 타입.
//!
//! 요청 전체를 중단시키는 에러(`DataUnavailable`)와 예측 분기만 실패시키는
//! 에러를 구분합니다. 예측 분기 에러는 파이프라인 경계에서
//! "빈 예측 + 에러 메시지"로 격하됩니다.

use thiserror::Error;

/// 예측 파이프라인 에러.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// 티커에 대한 시계열이 없음 (요청 전체 실패)
    #[error("Could not fetch data for {0}")]
    DataUnavailable(String),

    /// 요청한 time_steps보다 시계열이 짧음
    #[error("Not enough data for prediction: need {required} samples, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// 요청한 horizon에 대한 모델 아티팩트가 없음
    #[error("No model artifact for time_steps={time_steps}")]
    ModelNotFound { time_steps: usize },

    /// 아티팩트는 있으나 모든 로드 전략이 실패함
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// 모델 추론 중 에러
    #[error("Inference error: {0}")]
    Inference(String),

    /// 유효하지 않은 입력 데이터
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("Config error: {0}")]
    Config(String),
}

/// 예측 작업을 위한 Result 타입.
pub type ForecastResult<T> = Result<T, ForecastError>;

impl ForecastError {
    /// 예측 분기에서만 치명적인 에러인지 확인합니다.
    ///
    /// 이 에러들은 과거 데이터와 지표 응답을 막지 않습니다.
    pub fn is_forecast_branch(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientHistory { .. }
                | ForecastError::ModelNotFound { .. }
                | ForecastError::ModelLoad(_)
                | ForecastError::Inference(_)
        )
    }

    /// 요청 전체를 중단시키는 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ForecastError::DataUnavailable(_))
    }

    /// API 응답용 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            ForecastError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            ForecastError::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            ForecastError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            ForecastError::Inference(_) => "INFERENCE_ERROR",
            ForecastError::InvalidInput(_) => "INVALID_INPUT",
            ForecastError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ModelLoad(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForecastError::InsufficientHistory {
            required: 5000,
            actual: 200,
        };
        assert_eq!(
            err.to_string(),
            "Not enough data for prediction: need 5000 samples, got 200"
        );

        let err = ForecastError::DataUnavailable("ZZZZ".to_string());
        assert_eq!(err.to_string(), "Could not fetch data for ZZZZ");
    }

    #[test]
    fn test_forecast_branch_classification() {
        assert!(ForecastError::ModelNotFound { time_steps: 60 }.is_forecast_branch());
        assert!(ForecastError::Inference("nan".to_string()).is_forecast_branch());
        assert!(!ForecastError::DataUnavailable("X".to_string()).is_forecast_branch());
        assert!(ForecastError::DataUnavailable("X".to_string()).is_fatal());
        assert!(!ForecastError::ModelLoad("bad".to_string()).is_fatal());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            ForecastError::ModelNotFound { time_steps: 1 }.code(),
            "MODEL_NOT_FOUND"
        );
        assert_eq!(
            ForecastError::DataUnavailable("X".to_string()).code(),
            "DATA_UNAVAILABLE"
        );
    }
}
