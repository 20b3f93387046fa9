//! 추세 지표 (Trend Indicators).
//!
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average, span 방식)
//! - MACD (Moving Average Convergence Divergence)

use serde::{Deserialize, Serialize};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 50 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// span (alpha = 2 / (span + 1)).
    pub span: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { span: 200 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA span (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA span (기본: 26).
    pub slow_period: usize,
    /// 시그널 EMA span (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과 시계열.
///
/// 세 시퀀스 모두 입력과 길이가 같습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct MacdSeries {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Vec<Option<f64>>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Vec<Option<f64>>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Vec<Option<f64>>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값. 처음 `period - 1`개는 `None`이며,
    /// 데이터가 `period`보다 적거나 `period == 0`이면 전부 `None`.
    pub fn sma(&self, prices: &[f64], params: SmaParams) -> Vec<Option<f64>> {
        let period = params.period;
        if period == 0 || prices.len() < period {
            return vec![None; prices.len()];
        }

        let mut result = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(None);
            } else {
                let sum: f64 = prices[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period as f64));
            }
        }

        result
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// 첫 값으로 시작하며 최소 기간 제한이 없습니다.
    /// EMA(t) = EMA(t-1) + alpha × (P(t) - EMA(t-1)), alpha = 2 / (span + 1)
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> Vec<Option<f64>> {
        if params.span == 0 {
            return vec![None; prices.len()];
        }

        span_ema(prices, params.span).into_iter().map(Some).collect()
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    pub fn macd(&self, prices: &[f64], params: MacdParams) -> MacdSeries {
        if params.fast_period == 0 || params.slow_period == 0 || params.signal_period == 0 {
            let empty = vec![None; prices.len()];
            return MacdSeries {
                macd: empty.clone(),
                signal: empty.clone(),
                histogram: empty,
            };
        }

        let fast = span_ema(prices, params.fast_period);
        let slow = span_ema(prices, params.slow_period);
        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = span_ema(&macd_line, params.signal_period);
        let histogram: Vec<f64> = macd_line.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdSeries {
            macd: macd_line.into_iter().map(Some).collect(),
            signal: signal.into_iter().map(Some).collect(),
            histogram: histogram.into_iter().map(Some).collect(),
        }
    }
}

/// 첫 값으로 시작하는 span EMA.
///
/// 증분 형태로 계산하므로 일정한 입력에서는 값이 정확히 유지됩니다.
fn span_ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return result;
    };

    let mut prev = first;
    result.push(prev);
    for &value in iter {
        prev += alpha * (value - prev);
        result.push(prev);
    }

    result
}
