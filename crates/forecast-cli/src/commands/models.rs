//! 모델 디렉토리 점검.

use std::path::PathBuf;

use serde::Serialize;

use forecast_analytics::ModelRegistry;

/// 모델 점검 설정.
#[derive(Debug, Clone)]
pub struct ModelsConfig {
    pub model_dir: PathBuf,
    /// 실제로 로드해 볼 horizon
    pub preload: Vec<usize>,
}

/// 모델 디렉토리 상태.
#[derive(Debug, Serialize)]
pub struct ModelsReport {
    pub model_dir: String,
    pub strategies: Vec<&'static str>,
    pub available: Vec<usize>,
    /// 로드에 성공한 horizon
    pub loaded: Vec<usize>,
}

/// 로드 가능한 아티팩트를 나열하고, 요청한 horizon을 로드해 봅니다.
pub fn run_models(config: ModelsConfig) -> ModelsReport {
    let registry = ModelRegistry::new(config.model_dir);
    registry.preload(&config.preload);

    ModelsReport {
        model_dir: registry.model_dir().display().to_string(),
        strategies: registry.strategy_names(),
        available: registry.available_horizons(),
        loaded: registry.cached_horizons(),
    }
}
