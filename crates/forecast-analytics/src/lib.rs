//! # Forecast Analytics
//!
//! 종가 예측 파이프라인과 차트용 기술적 지표.
//!
//! - [`ml`]: 정규화, 입력 윈도우, 모델 레지스트리, 자기회귀 예측, 예측 서비스
//! - [`indicators`]: RSI, MACD, SMA, EMA
//! - [`report`]: 응답 조립

pub mod indicators;
pub mod ml;
pub mod report;

pub use indicators::{IndicatorEngine, IndicatorSet, MacdSeries};
pub use ml::{ModelRegistry, PredictionService};
pub use report::{ForecastReport, SeriesPayload};
