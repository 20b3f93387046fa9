//! 데이터 제공자 에러 타입.

use forecast_core::ForecastError;
use thiserror::Error;

/// 시세 데이터 조회 에러.
///
/// 모든 변형은 조회한 티커를 포함합니다.
#[derive(Debug, Error)]
pub enum DataError {
    /// 티커에 대한 데이터 없음
    #[error("No data for {0}")]
    NoData(String),

    /// 네트워크/API 에러
    #[error("Network error ({ticker}): {message}")]
    Network { ticker: String, message: String },

    /// 응답 파싱 에러
    #[error("Parse error ({ticker}): {message}")]
    Parse { ticker: String, message: String },

    /// 받은 데이터가 유효한 시계열이 아님
    #[error("Invalid data ({ticker}): {message}")]
    InvalidData { ticker: String, message: String },
}

impl DataError {
    /// 에러가 발생한 티커.
    pub fn ticker(&self) -> &str {
        match self {
            DataError::NoData(ticker) => ticker,
            DataError::Network { ticker, .. }
            | DataError::Parse { ticker, .. }
            | DataError::InvalidData { ticker, .. } => ticker,
        }
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::Network { .. })
    }
}

/// 모든 데이터 에러는 요청 전체를 중단시키는 `DataUnavailable`이 됩니다.
impl From<DataError> for ForecastError {
    fn from(err: DataError) -> Self {
        ForecastError::DataUnavailable(err.ticker().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_becomes_data_unavailable() {
        let err: ForecastError = DataError::Network {
            ticker: "ZZZZ".to_string(),
            message: "404 Not Found".to_string(),
        }
        .into();
        assert!(matches!(err, ForecastError::DataUnavailable(ref t) if t == "ZZZZ"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_no_data() {
        let err: ForecastError = DataError::NoData("AAPL".to_string()).into();
        assert_eq!(err.to_string(), "Could not fetch data for AAPL");
    }

    #[test]
    fn test_retryable() {
        let network = DataError::Network {
            ticker: "X".to_string(),
            message: "reset".to_string(),
        };
        assert!(network.is_retryable());
        assert!(!DataError::NoData("X".to_string()).is_retryable());
    }
}
