//! 기술적 지표 모듈.
//!
//! 차트 표시용 지표를 종가 시계열 전체에서 계산합니다.
//! 모든 결과는 입력과 길이가 같고 위치별로 정렬되며,
//! 정의되지 않은 값은 `None`으로 표시됩니다.
//! 비유한 값 정리는 응답 경계에서 [`IndicatorSet::sanitized`]로 한 번만 수행합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표
//! - **SMA**: 단순 이동평균 (기본 50)
//! - **EMA**: 지수 이동평균 (기본 span 200)
//! - **MACD**: 12/26/9
//!
//! ## 모멘텀 지표
//! - **RSI**: 상대강도지수 (기본 14)
//!
//! # 사용 예시
//!
//! ```ignore
//! use forecast_analytics::indicators::{IndicatorEngine, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//! let set = engine.compute(&closes);
//! let rsi = engine.rsi(&closes, RsiParams { period: 14 });
//! ```

pub mod momentum;
pub mod trend;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdSeries, SmaParams, TrendIndicators};

/// 유한하지 않은 값(NaN, ±Inf)을 `None`으로 바꿉니다.
pub fn sanitize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect()
}

/// 원시 값 시퀀스를 정리합니다.
pub fn sanitize_values(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&x| if x.is_finite() { Some(x) } else { None })
        .collect()
}

/// 차트용 지표 묶음.
///
/// 모든 시퀀스는 계산에 사용한 종가와 같은 길이입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct IndicatorSet {
    /// RSI(14)
    pub rsi: Vec<Option<f64>>,
    /// MACD(12, 26, 9)
    pub macd: MacdSeries,
    /// SMA(50)
    pub sma50: Vec<Option<f64>>,
    /// EMA(200)
    pub ema200: Vec<Option<f64>>,
}

impl IndicatorSet {
    /// 정렬 기준 길이.
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    /// 마지막 `n`개 위치만 남깁니다 (표시 구간 정렬용).
    pub fn tail(&self, n: usize) -> Self {
        fn last(values: &[Option<f64>], n: usize) -> Vec<Option<f64>> {
            values[values.len().saturating_sub(n)..].to_vec()
        }

        Self {
            rsi: last(&self.rsi, n),
            macd: MacdSeries {
                macd: last(&self.macd.macd, n),
                signal: last(&self.macd.signal, n),
                histogram: last(&self.macd.histogram, n),
            },
            sma50: last(&self.sma50, n),
            ema200: last(&self.ema200, n),
        }
    }

    /// 모든 시퀀스에 `sanitize`를 적용합니다.
    ///
    /// 응답 경계(`ForecastReport::assemble`, CLI 지표 출력)에서만 호출합니다.
    pub fn sanitized(&self) -> Self {
        Self {
            rsi: sanitize(&self.rsi),
            macd: MacdSeries {
                macd: sanitize(&self.macd.macd),
                signal: sanitize(&self.macd.signal),
                histogram: sanitize(&self.macd.histogram),
            },
            sma50: sanitize(&self.sma50),
            ema200: sanitize(&self.ema200),
        }
    }
}

/// 통합 지표 엔진.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 파라미터로 전체 지표 묶음을 계산합니다.
    ///
    /// 빈 입력은 빈 시퀀스를 반환합니다 (에러 아님).
    pub fn compute(&self, closes: &[f64]) -> IndicatorSet {
        let set = IndicatorSet {
            rsi: self.rsi(closes, RsiParams::default()),
            macd: self.macd(closes, MacdParams::default()),
            sma50: self.sma(closes, SmaParams { period: 50 }),
            ema200: self.ema(closes, EmaParams { span: 200 }),
        };

        debug!(samples = closes.len(), "Indicators computed");
        set
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 인자
    /// * `prices` - 종가
    /// * `params` - SMA 파라미터 (기간)
    ///
    /// # 반환
    /// 처음 `period - 1`개는 `None`
    pub fn sma(&self, prices: &[f64], params: SmaParams) -> Vec<Option<f64>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// # 인자
    /// * `prices` - 종가
    /// * `params` - EMA 파라미터 (span)
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> Vec<Option<f64>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    ///
    /// # 반환
    /// MACD 라인, 시그널 라인, 히스토그램
    pub fn macd(&self, prices: &[f64], params: MacdParams) -> MacdSeries {
        self.trend.macd(prices, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (Relative Strength Index) 계산.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> Vec<Option<f64>> {
        self.momentum.rsi(prices, params)
    }
}
