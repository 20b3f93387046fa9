//! 시세 데이터 제공자 trait.

use async_trait::async_trait;
use forecast_core::PriceSeries;

use crate::DataError;

/// 일별 종가 이력 제공자.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 티커의 전체 일별 종가 이력을 조회합니다.
    ///
    /// # 인자
    /// * `ticker` - 정규화된(대문자) 티커 (예: "AAPL", "005930.KS")
    ///
    /// # 반환
    /// 날짜 오름차순의 검증된 시계열. 데이터가 없으면 `DataError::NoData`.
    async fn fetch_history(&self, ticker: &str) -> Result<PriceSeries, DataError>;

    /// 제공자 이름 (로그용).
    fn name(&self) -> &'static str;
}

/// 티커 정규화: 앞뒤 공백 제거 후 대문자 변환.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}
