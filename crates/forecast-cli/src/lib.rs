//! 주가 예측 CLI 도구 모음.
//!
//! - 단일 티커 예측 (API와 같은 응답 형식)
//! - 지표만 계산
//! - 모델 디렉토리 점검 및 미리 로드

pub mod commands;
