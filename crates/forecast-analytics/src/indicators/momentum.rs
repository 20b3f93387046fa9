//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSI (Relative Strength Index, 단순 이동평균 방식)

use serde::{Deserialize, Serialize};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 최근 `period`개(최소 1개) 구간의 단순 평균입니다.
    /// 첫 시점은 이전 값이 없으므로 상승/하락 모두 0입니다.
    /// 평균 하락폭이 0이면 RSI는 정확히 100입니다.
    ///
    /// # 반환
    /// 모든 시점에서 정의된 0-100 사이의 값. `period == 0`이면 전부 `None`.
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> Vec<Option<f64>> {
        let period = params.period;
        if period == 0 {
            return vec![None; prices.len()];
        }

        // 상승/하락 분리 (첫 번째는 변화 없음)
        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            let delta = if i == 0 { 0.0 } else { prices[i] - prices[i - 1] };
            gains.push(delta.max(0.0));
            losses.push((-delta).max(0.0));
        }

        let mut result = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            let start = (i + 1).saturating_sub(period);
            let count = (i + 1 - start) as f64;
            let avg_gain = gains[start..=i].iter().sum::<f64>() / count;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / count;

            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                let rs = avg_gain / avg_loss;
                (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
            };
            result.push(Some(rsi));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rsi_first_position_is_100() {
        let calc = MomentumCalculator::new();
        let rsi = calc.rsi(&[10.0, 9.0, 8.0], RsiParams::default());
        assert_eq!(rsi[0], Some(100.0));
        // 하락만 있으면 0
        assert_eq!(rsi[2], Some(0.0));
    }

    #[test]
    fn test_rsi_mixed() {
        let calc = MomentumCalculator::new();
        // 변화: 0, +2, -1, +1 (period 3 → 마지막 창: +2, -1, +1)
        let rsi = calc.rsi(&[100.0, 102.0, 101.0, 102.0], RsiParams { period: 3 });
        // avg_gain = 1.0, avg_loss = 1/3 → RS = 3 → RSI = 75
        assert!((rsi[3].unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_flat_is_100() {
        let calc = MomentumCalculator::new();
        let rsi = calc.rsi(&vec![100.0; 30], RsiParams::default());
        assert!(rsi.iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_zero_period_and_empty() {
        let calc = MomentumCalculator::new();
        assert!(calc
            .rsi(&[1.0, 2.0], RsiParams { period: 0 })
            .iter()
            .all(Option::is_none));
        assert!(calc.rsi(&[], RsiParams::default()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_rsi_within_bounds(
            prices in prop::collection::vec(0.01f64..10_000.0, 0..300),
            period in 1usize..40,
        ) {
            let rsi = MomentumCalculator::new().rsi(&prices, RsiParams { period });
            prop_assert_eq!(rsi.len(), prices.len());
            for value in rsi {
                let v = value.unwrap();
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }
    }
}
