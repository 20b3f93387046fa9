//! Yahoo Finance 일봉 종가 제공자.
//!
//! 예측과 지표는 전체 이력을 사용하므로 항상 `range=max`, `interval=1d`로 조회합니다.
//!
//! # 티커 형식
//!
//! - 미국 주식/ETF: "AAPL", "SPY"
//! - 한국 주식: "005930.KS" (코스피), "124560.KQ" (코스닥)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use forecast_data::{MarketDataProvider, YahooFinanceProvider};
//!
//! let provider = YahooFinanceProvider::new()?;
//! let series = provider.fetch_history("AAPL").await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::{debug, info, warn};
use yahoo_finance_api as yahoo;

use forecast_core::{PricePoint, PriceSeries};

use crate::provider::{normalize_ticker, MarketDataProvider};
use crate::DataError;

/// 일봉 간격.
const DAILY_INTERVAL: &str = "1d";
/// 전체 이력 범위.
const FULL_RANGE: &str = "max";

/// Yahoo Finance 일봉 종가 제공자.
pub struct YahooFinanceProvider {
    connector: yahoo::YahooConnector,
}

impl YahooFinanceProvider {
    /// 새로운 Yahoo Finance 제공자 생성.
    pub fn new() -> Result<Self, DataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| DataError::Network {
            ticker: String::new(),
            message: format!("Yahoo Finance connector init failed: {}", e),
        })?;

        Ok(Self { connector })
    }

    /// (Unix 타임스탬프, 종가) 목록을 검증된 시계열로 변환합니다.
    ///
    /// 봉 날짜는 거래소 현지 날짜입니다 (`gmtoffset`은 UTC 대비 초 단위 오프셋).
    /// 유한한 양수가 아닌 종가는 버리고, 날짜 오름차순으로 정렬한 뒤
    /// 같은 날짜가 여러 번 나오면 마지막 값을 사용합니다.
    pub fn quotes_to_series(
        ticker: &str,
        gmtoffset: i32,
        quotes: impl IntoIterator<Item = (i64, f64)>,
    ) -> Result<PriceSeries, DataError> {
        let offset = FixedOffset::east_opt(gmtoffset).ok_or_else(|| DataError::InvalidData {
            ticker: ticker.to_string(),
            message: format!("Invalid exchange gmtoffset: {}", gmtoffset),
        })?;

        let mut points: Vec<PricePoint> = quotes
            .into_iter()
            .filter(|(_, close)| close.is_finite() && *close > 0.0)
            .filter_map(|(ts, close)| {
                exchange_date(ts, &offset).map(|date| PricePoint::new(date, close))
            })
            .collect();

        if points.is_empty() {
            return Err(DataError::NoData(ticker.to_string()));
        }

        // 안정 정렬이므로 같은 날짜에서는 원래 순서가 유지됨
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        PriceSeries::new(ticker, deduped).map_err(|e| DataError::InvalidData {
            ticker: ticker.to_string(),
            message: e.to_string(),
        })
    }
}

fn exchange_date(timestamp: i64, offset: &FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(offset).date_naive())
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn fetch_history(&self, ticker: &str) -> Result<PriceSeries, DataError> {
        let ticker = normalize_ticker(ticker);

        info!(
            ticker = %ticker,
            interval = DAILY_INTERVAL,
            range = FULL_RANGE,
            "Fetching price history from Yahoo Finance"
        );

        let response = self
            .connector
            .get_quote_range(&ticker, DAILY_INTERVAL, FULL_RANGE)
            .await
            .map_err(|e| DataError::Network {
                ticker: ticker.clone(),
                message: e.to_string(),
            })?;

        let quotes = response.quotes().map_err(|e| DataError::Parse {
            ticker: ticker.clone(),
            message: e.to_string(),
        })?;

        if quotes.is_empty() {
            warn!(ticker = %ticker, "Yahoo Finance returned no quotes");
            return Err(DataError::NoData(ticker));
        }

        // 메타데이터가 없으면 UTC 날짜로 처리
        let gmtoffset = match response.metadata() {
            Ok(meta) => meta.gmtoffset,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Yahoo Finance metadata missing, dating bars in UTC");
                0
            }
        };

        let received = quotes.len();
        let series = Self::quotes_to_series(
            &ticker,
            gmtoffset,
            quotes.iter().map(|q| (q.timestamp, q.close)),
        )?;

        debug!(
            ticker = %ticker,
            gmtoffset,
            received,
            kept = series.len(),
            "Yahoo Finance quotes converted"
        );

        Ok(series)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
