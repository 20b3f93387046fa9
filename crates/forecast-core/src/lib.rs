//! # Forecast Core
//!
//! 주가 예측 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 예측 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종가 시계열 (`PriceSeries`) 및 검증
//! - 표시 기간 (`HistoryPeriod`) 계산
//! - 영업일 달력 (예측 날짜 생성)
//! - 에러 분류 체계 (`ForecastError`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
