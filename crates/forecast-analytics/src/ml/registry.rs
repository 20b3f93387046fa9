//! 다중 horizon 모델 레지스트리.
//!
//! `time_steps`별로 아티팩트를 한 번만 로드하고 프로세스 수명 동안 캐시합니다.
//!
//! # 아티팩트 위치
//!
//! - `{dir}/lstm_{T}.onnx`: 직렬화된 전체 그래프 (`ml` feature)
//! - `{dir}/lstm_{T}.weights.json`: 가중치만 (네이티브 LSTM으로 복원)
//!
//! # 동시성
//!
//! 같은 키에 대한 첫 로드가 동시에 들어오면 같은 `OnceCell`에서 대기하므로
//! 로드는 한 번만 실행되고 모든 호출자가 같은 `Arc`를 받습니다.
//! 로드에 실패한 키는 캐시에 남지 않습니다.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use forecast_core::{ForecastError, ForecastResult};

use super::artifact::ModelHandle;
use super::lstm::{LstmArchitecture, LstmNetwork, LstmWeights};

/// ONNX 아티팩트 경로.
pub fn onnx_artifact_path(dir: &Path, time_steps: usize) -> PathBuf {
    dir.join(format!("lstm_{}.onnx", time_steps))
}

/// 가중치 아티팩트 경로.
pub fn weights_artifact_path(dir: &Path, time_steps: usize) -> PathBuf {
    dir.join(format!("lstm_{}.weights.json", time_steps))
}

/// 파일명에서 `time_steps`를 추출합니다 (`lstm_60.onnx` → 60).
fn horizon_from_file_name(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("lstm_")?;
    let digits = rest
        .strip_suffix(".weights.json")
        .or_else(|| rest.strip_suffix(".onnx"))?;
    digits.parse().ok().filter(|&t| t > 0)
}

/// 아티팩트 로드 전략.
///
/// 레지스트리는 등록 순서대로 전략을 시도하고, 처음 성공한 핸들을 사용합니다.
pub trait LoadStrategy: Send + Sync {
    /// 전략 이름 (로그용).
    fn name(&self) -> &'static str;

    /// 이 전략이 읽는 아티팩트 경로.
    fn artifact_path(&self, dir: &Path, time_steps: usize) -> PathBuf;

    /// 아티팩트가 존재하는지 확인합니다.
    fn is_present(&self, dir: &Path, time_steps: usize) -> bool {
        self.artifact_path(dir, time_steps).is_file()
    }

    /// 아티팩트를 로드합니다.
    fn load(&self, path: &Path, time_steps: usize) -> ForecastResult<ModelHandle>;
}

/// 알려진 구조를 복원하고 가중치만 로드하는 전략.
#[derive(Debug, Clone, Default)]
pub struct WeightsLoadStrategy {
    arch: LstmArchitecture,
}

impl WeightsLoadStrategy {
    pub fn new(arch: LstmArchitecture) -> Self {
        Self { arch }
    }
}

impl LoadStrategy for WeightsLoadStrategy {
    fn name(&self) -> &'static str {
        "weights"
    }

    fn artifact_path(&self, dir: &Path, time_steps: usize) -> PathBuf {
        weights_artifact_path(dir, time_steps)
    }

    fn load(&self, path: &Path, time_steps: usize) -> ForecastResult<ModelHandle> {
        let weights = LstmWeights::from_json_file(path)?;
        let network = LstmNetwork::from_weights(&weights, self.arch, time_steps)?;
        Ok(Arc::new(network))
    }
}

type ModelCell = Arc<OnceCell<ModelHandle>>;

/// 스레드 안전한 모델 레지스트리.
pub struct ModelRegistry {
    model_dir: PathBuf,
    strategies: Vec<Box<dyn LoadStrategy>>,
    cache: RwLock<HashMap<usize, ModelCell>>,
}

impl ModelRegistry {
    /// 기본 전략으로 레지스트리를 생성합니다.
    ///
    /// `ml` feature가 켜져 있으면 ONNX를 먼저 시도하고, 그다음 가중치 파일을 시도합니다.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self::with_strategies(model_dir, Self::default_strategies())
    }

    /// 지정한 전략 목록으로 레지스트리를 생성합니다.
    pub fn with_strategies(
        model_dir: impl Into<PathBuf>,
        strategies: Vec<Box<dyn LoadStrategy>>,
    ) -> Self {
        Self {
            model_dir: model_dir.into(),
            strategies,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// 기본 로드 전략 목록.
    pub fn default_strategies() -> Vec<Box<dyn LoadStrategy>> {
        let mut strategies: Vec<Box<dyn LoadStrategy>> = Vec::new();
        #[cfg(feature = "ml")]
        strategies.push(Box::new(super::onnx::OnnxLoadStrategy::default()));
        strategies.push(Box::new(WeightsLoadStrategy::default()));
        strategies
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// 등록된 전략 이름 (시도 순서).
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// `time_steps`에 맞는 모델을 반환합니다.
    ///
    /// 다른 horizon의 모델로 대체하지 않습니다.
    ///
    /// # 에러
    /// - 아티팩트가 없으면 `ModelNotFound`
    /// - 아티팩트는 있으나 모든 전략이 실패하면 `ModelLoad`
    pub fn get_model(&self, time_steps: usize) -> ForecastResult<ModelHandle> {
        if time_steps == 0 {
            return Err(ForecastError::InvalidInput(
                "time_steps must be positive".to_string(),
            ));
        }

        if let Some(handle) = self.cached(time_steps) {
            return Ok(handle);
        }

        let cell = {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(time_steps).or_default())
        };

        let result = cell
            .get_or_try_init(|| self.load(time_steps))
            .map(Arc::clone);

        if result.is_err() {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            let stale = cache
                .get(&time_steps)
                .is_some_and(|existing| Arc::ptr_eq(existing, &cell) && existing.get().is_none());
            if stale {
                cache.remove(&time_steps);
            }
        }

        result
    }

    /// 이미 로드된 모델만 조회합니다.
    fn cached(&self, time_steps: usize) -> Option<ModelHandle> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(&time_steps).and_then(|cell| cell.get().cloned())
    }

    fn load(&self, time_steps: usize) -> ForecastResult<ModelHandle> {
        let mut present = false;
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            if !strategy.is_present(&self.model_dir, time_steps) {
                debug!(strategy = strategy.name(), time_steps, "Artifact not present");
                continue;
            }
            present = true;

            let path = strategy.artifact_path(&self.model_dir, time_steps);
            match strategy.load(&path, time_steps) {
                Ok(handle) => {
                    info!(
                        strategy = strategy.name(),
                        time_steps,
                        path = %path.display(),
                        "Model loaded"
                    );
                    return Ok(handle);
                }
                Err(e) => {
                    warn!(
                        strategy = strategy.name(),
                        time_steps,
                        error = %e,
                        "Model load strategy failed"
                    );
                    failures.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        if present {
            Err(ForecastError::ModelLoad(failures.join("; ")))
        } else {
            Err(ForecastError::ModelNotFound { time_steps })
        }
    }

    /// 캐시에 로드된 horizon 목록 (오름차순).
    pub fn cached_horizons(&self) -> Vec<usize> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<usize> = cache
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(&k, _)| k)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// 모델 디렉토리에서 로드 가능한 아티팩트가 있는 horizon 목록 (오름차순).
    pub fn available_horizons(&self) -> Vec<usize> {
        let entries = match std::fs::read_dir(&self.model_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.model_dir.display(), error = %e, "Model directory unreadable");
                return Vec::new();
            }
        };

        let candidates: BTreeSet<usize> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| horizon_from_file_name(&entry.file_name().to_string_lossy()))
            .collect();

        candidates
            .into_iter()
            .filter(|&t| {
                self.strategies
                    .iter()
                    .any(|s| s.is_present(&self.model_dir, t))
            })
            .collect()
    }

    /// 시작 시 캐시를 미리 채웁니다.
    ///
    /// 실패한 horizon은 경고 로그만 남깁니다. 로드에 성공한 개수를 반환합니다.
    pub fn preload(&self, horizons: &[usize]) -> usize {
        let mut loaded = 0;
        for &time_steps in horizons {
            match self.get_model(time_steps) {
                Ok(_) => loaded += 1,
                Err(e) => warn!(time_steps, error = %e, "Model preload failed"),
            }
        }
        info!(requested = horizons.len(), loaded, "Model preload finished");
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::artifact::MockArtifact;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn write_zero_weights(dir: &Path, time_steps: usize) {
        LstmWeights::zeros(LstmArchitecture::default())
            .save_json_file(&weights_artifact_path(dir, time_steps))
            .unwrap();
    }

    /// 로드 횟수를 세는 테스트 전략.
    struct CountingStrategy {
        loads: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl LoadStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn artifact_path(&self, dir: &Path, time_steps: usize) -> PathBuf {
            dir.join(format!("counting_{}", time_steps))
        }

        fn is_present(&self, _dir: &Path, _time_steps: usize) -> bool {
            true
        }

        fn load(&self, _path: &Path, time_steps: usize) -> ForecastResult<ModelHandle> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            Ok(Arc::new(MockArtifact::fixed(time_steps, 0.5)))
        }
    }

    /// 항상 실패하는 테스트 전략.
    struct BrokenStrategy;

    impl LoadStrategy for BrokenStrategy {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn artifact_path(&self, dir: &Path, time_steps: usize) -> PathBuf {
            dir.join(format!("broken_{}", time_steps))
        }

        fn is_present(&self, _dir: &Path, _time_steps: usize) -> bool {
            true
        }

        fn load(&self, _path: &Path, _time_steps: usize) -> ForecastResult<ModelHandle> {
            Err(ForecastError::ModelLoad("corrupted".to_string()))
        }
    }

    #[test]
    fn test_horizon_from_file_name() {
        assert_eq!(horizon_from_file_name("lstm_60.onnx"), Some(60));
        assert_eq!(horizon_from_file_name("lstm_120.weights.json"), Some(120));
        assert_eq!(horizon_from_file_name("lstm_0.onnx"), None);
        assert_eq!(horizon_from_file_name("lstm_x.onnx"), None);
        assert_eq!(horizon_from_file_name("model.onnx"), None);
    }

    #[test]
    fn test_model_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::new(dir.path());

        let err = registry.get_model(60).err().unwrap();
        assert!(matches!(err, ForecastError::ModelNotFound { time_steps: 60 }));
        assert!(registry.cached_horizons().is_empty());
    }

    #[test]
    fn test_loads_weights_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_zero_weights(dir.path(), 60);
        let registry = ModelRegistry::with_strategies(
            dir.path(),
            vec![Box::new(WeightsLoadStrategy::default())],
        );

        let first = registry.get_model(60).unwrap();
        let second = registry.get_model(60).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.kind(), "weights");
        assert_eq!(first.time_steps(), 60);
        assert_eq!(registry.cached_horizons(), vec![60]);
    }

    #[test]
    fn test_no_substitution_between_horizons() {
        let dir = tempfile::tempdir().unwrap();
        write_zero_weights(dir.path(), 60);
        let registry = ModelRegistry::new(dir.path());

        assert!(registry.get_model(60).is_ok());
        assert!(matches!(
            registry.get_model(120).err().unwrap(),
            ForecastError::ModelNotFound { time_steps: 120 }
        ));
    }

    #[test]
    fn test_corrupt_weights_is_model_load_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(weights_artifact_path(dir.path(), 30), "[]").unwrap();
        let registry = ModelRegistry::with_strategies(
            dir.path(),
            vec![Box::new(WeightsLoadStrategy::default())],
        );

        assert!(matches!(
            registry.get_model(30).err().unwrap(),
            ForecastError::ModelLoad(_)
        ));
        assert!(registry.cache.read().unwrap().is_empty());

        // 파일을 고치면 다음 호출에서 다시 시도
        write_zero_weights(dir.path(), 30);
        assert!(registry.get_model(30).is_ok());
    }

    #[test]
    fn test_falls_through_failed_strategy() {
        let dir = tempfile::tempdir().unwrap();
        write_zero_weights(dir.path(), 60);
        let registry = ModelRegistry::with_strategies(
            dir.path(),
            vec![
                Box::new(BrokenStrategy),
                Box::new(WeightsLoadStrategy::default()),
            ],
        );

        assert_eq!(registry.get_model(60).unwrap().kind(), "weights");

        let only_broken = ModelRegistry::with_strategies(dir.path(), vec![Box::new(BrokenStrategy)]);
        let err = only_broken.get_model(60).err().unwrap();
        assert!(matches!(err, ForecastError::ModelLoad(ref msg) if msg.contains("broken")));
    }

    #[test]
    fn test_concurrent_first_load_runs_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(ModelRegistry::with_strategies(
            "unused",
            vec![Box::new(CountingStrategy {
                loads: Arc::clone(&loads),
                delay: Duration::from_millis(50),
            })],
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_model(60).unwrap())
            })
            .collect();
        let models: Vec<ModelHandle> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(models.iter().all(|m| Arc::ptr_eq(m, &models[0])));
    }

    #[test]
    fn test_available_horizons_and_preload() {
        let dir = tempfile::tempdir().unwrap();
        write_zero_weights(dir.path(), 60);
        write_zero_weights(dir.path(), 120);
        std::fs::write(dir.path().join("README.txt"), "models").unwrap();

        let registry = ModelRegistry::with_strategies(
            dir.path(),
            vec![Box::new(WeightsLoadStrategy::default())],
        );
        assert_eq!(registry.available_horizons(), vec![60, 120]);

        assert_eq!(registry.preload(&[60, 90, 120]), 2);
        assert_eq!(registry.cached_horizons(), vec![60, 120]);
    }
}
