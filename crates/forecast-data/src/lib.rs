//! # Forecast Data
//!
//! 예측 파이프라인에 일별 종가 시계열을 공급하는 데이터 제공자.
//!
//! - [`YahooFinanceProvider`]: Yahoo Finance 전체 일봉 이력
//! - [`InMemoryProvider`]: 테스트 및 오프라인 실행용 고정 시계열

pub mod error;
pub mod memory;
pub mod provider;
pub mod yahoo;

pub use error::*;
pub use memory::InMemoryProvider;
pub use provider::{normalize_ticker, MarketDataProvider};
pub use yahoo::YahooFinanceProvider;
