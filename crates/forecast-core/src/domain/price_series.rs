//! 일별 종가 시계열.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// 한 거래일의 종가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// 검증된 일별 종가 시계열.
///
/// 날짜는 엄격히 증가하고(중복 없음) 모든 종가는 유한한 양수입니다.
/// 생성 후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// 새 시계열을 생성합니다.
    ///
    /// # 에러
    ///
    /// 날짜 순서가 어긋나거나 종가가 유한한 양수가 아니면 `InvalidInput`.
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> ForecastResult<Self> {
        let ticker = ticker.into();

        for (idx, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(ForecastError::InvalidInput(format!(
                    "{}: close at {} must be finite and positive, got {}",
                    ticker, point.date, point.close
                )));
            }
            if idx > 0 && points[idx - 1].date >= point.date {
                return Err(ForecastError::InvalidInput(format!(
                    "{}: dates must be strictly increasing ({} then {})",
                    ticker,
                    points[idx - 1].date,
                    point.date
                )));
            }
        }

        Ok(Self { ticker, points })
    }

    /// 날짜/종가 쌍에서 시계열을 생성합니다.
    pub fn from_pairs(
        ticker: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> ForecastResult<Self> {
        let points = pairs
            .into_iter()
            .map(|(date, close)| PricePoint::new(date, close))
            .collect();
        Self::new(ticker, points)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 오래된 순서의 종가 목록.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// 오래된 순서의 날짜 목록.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// 마지막 관측일. 빈 시계열이면 `None`.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `start` 이후(포함)의 마지막 구간을 반환합니다.
    pub fn tail_from(&self, start: NaiveDate) -> &[PricePoint] {
        let idx = self.points.partition_point(|p| p.date < start);
        &self.points[idx..]
    }
}
