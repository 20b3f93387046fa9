//! 메모리 기반 시세 제공자.
//!
//! 테스트와 CLI 오프라인 실행(JSON 픽스처)에 사용합니다.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use forecast_core::{PricePoint, PriceSeries};

use crate::provider::{normalize_ticker, MarketDataProvider};
use crate::DataError;

/// JSON 픽스처 파일 형식.
///
/// ```json
/// { "ticker": "AAPL", "prices": [ { "date": "2024-01-02", "close": 185.6 } ] }
/// ```
#[derive(Debug, Deserialize)]
struct Fixture {
    ticker: String,
    prices: Vec<PricePoint>,
}

/// 고정 시계열을 제공하는 제공자.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    series: RwLock<HashMap<String, PriceSeries>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시계열을 등록한 제공자를 생성합니다.
    pub fn with_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        let map = series
            .into_iter()
            .map(|s| (normalize_ticker(s.ticker()), s))
            .collect();
        Self {
            series: RwLock::new(map),
        }
    }

    /// JSON 픽스처 파일에서 제공자를 생성합니다.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| DataError::Parse {
            ticker: String::new(),
            message: format!("{}: {}", path.display(), e),
        })?;
        let fixture: Fixture = serde_json::from_str(&raw).map_err(|e| DataError::Parse {
            ticker: String::new(),
            message: format!("{}: {}", path.display(), e),
        })?;

        let ticker = normalize_ticker(&fixture.ticker);
        let series = PriceSeries::new(&ticker, fixture.prices).map_err(|e| {
            DataError::InvalidData {
                ticker: ticker.clone(),
                message: e.to_string(),
            }
        })?;

        debug!(ticker = %ticker, points = series.len(), "Loaded price fixture");
        Ok(Self::with_series([series]))
    }

    /// 시계열을 등록하거나 교체합니다.
    pub async fn insert(&self, series: PriceSeries) {
        let key = normalize_ticker(series.ticker());
        self.series.write().await.insert(key, series);
    }

    /// 등록된 티커 목록 (정렬됨).
    pub async fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.series.read().await.keys().cloned().collect();
        tickers.sort();
        tickers
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryProvider {
    async fn fetch_history(&self, ticker: &str) -> Result<PriceSeries, DataError> {
        let ticker = normalize_ticker(ticker);
        match self.series.read().await.get(&ticker) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(DataError::NoData(ticker)),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
