//! 종가 시계열 예측을 위한 도메인 모델.

pub mod calendar;
mod period;
mod price_series;

pub use calendar::business_days_after;
pub use period::*;
pub use price_series::*;
