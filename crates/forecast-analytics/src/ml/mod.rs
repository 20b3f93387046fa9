//! 종가 예측 ML 파이프라인.
//!
//! # 아키텍처
//!
//! ```text
//! PriceSeries (전체 이력)
//!        │
//!        ▼
//! ┌─────────────────┐
//! │ ScalingContext  │ ← 전체 이력에서 min/max fit
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  InputWindow    │     │  ModelRegistry   │ ← time_steps별 캐시
//! │ [1, T, 1]       │     │ (ONNX / weights) │
//! └────────┬────────┘     └────────┬─────────┘
//!          └───────────┬───────────┘
//!                      ▼
//!       ┌──────────────────────────┐
//!       │ AutoregressiveForecaster │ ← predict → slide 반복
//!       └─────────────┬────────────┘
//!                     ▼
//!              denormalized forecast
//! ```
//!
//! # 예제
//!
//! ```ignore
//! use std::sync::Arc;
//! use forecast_analytics::ml::{ModelRegistry, PredictionService};
//!
//! let registry = Arc::new(ModelRegistry::new("models"));
//! let service = PredictionService::new(registry);
//! let forecast = service.forecast(&series, 60, 30)?;
//! ```

pub mod artifact;
pub mod forecaster;
pub mod lstm;
#[cfg(feature = "ml")]
pub mod onnx;
pub mod registry;
pub mod scaling;
pub mod service;
pub mod window;

pub use artifact::{InferenceArtifact, MockArtifact, MockMode, ModelHandle};
pub use forecaster::AutoregressiveForecaster;
pub use lstm::{LstmArchitecture, LstmNetwork, LstmWeights, WeightShapeError};
#[cfg(feature = "ml")]
pub use onnx::{OnnxArtifact, OnnxLoadStrategy};
pub use registry::{
    onnx_artifact_path, weights_artifact_path, LoadStrategy, ModelRegistry, WeightsLoadStrategy,
};
pub use scaling::ScalingContext;
pub use service::PredictionService;
pub use window::InputWindow;
