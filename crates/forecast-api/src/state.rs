//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 요청 사이에 공유되는 가변 상태는 모델 레지스트리 캐시뿐입니다.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use forecast_analytics::{ModelRegistry, PredictionService};
use forecast_core::AppConfig;
use forecast_data::MarketDataProvider;

use crate::metrics::set_cached_models;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 시세 데이터 제공자 (Yahoo Finance 또는 메모리)
    pub provider: Arc<dyn MarketDataProvider>,

    /// 예측 파이프라인 서비스 (모델 레지스트리 포함)
    pub service: Arc<PredictionService>,

    /// 애플리케이션 설정 (기본값 및 요청 한도)
    pub config: Arc<AppConfig>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 모델 레지스트리는 `config.models.dir`를 기준으로 만듭니다.
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: AppConfig) -> Self {
        let registry = Arc::new(ModelRegistry::new(config.models.dir.clone()));
        Self::with_registry(provider, registry, config)
    }

    /// 이미 구성된 레지스트리로 AppState를 생성합니다.
    pub fn with_registry(
        provider: Arc<dyn MarketDataProvider>,
        registry: Arc<ModelRegistry>,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            service: Arc::new(PredictionService::new(registry)),
            config: Arc::new(config),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        self.service.registry()
    }

    /// 설정된 horizon 모델을 백그라운드에서 미리 로드합니다.
    ///
    /// 서버는 로드 완료를 기다리지 않고 요청을 받습니다. horizon 하나씩
    /// blocking 풀에서 로드하며, `shutdown`이 취소되면 남은 horizon은 건너뜁니다.
    pub fn start_model_preload(
        &self,
        horizons: Vec<usize>,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<usize> {
        let registry = Arc::clone(self.registry());

        tokio::spawn(async move {
            let mut loaded = 0;
            for time_steps in horizons {
                if shutdown.is_cancelled() {
                    info!(loaded, "Model preload cancelled by shutdown");
                    break;
                }

                let registry = Arc::clone(&registry);
                match tokio::task::spawn_blocking(move || registry.preload(&[time_steps])).await {
                    Ok(count) => loaded += count,
                    Err(e) => warn!(time_steps, error = %e, "Model preload task failed"),
                }
                set_cached_models(loaded);
            }
            loaded
        })
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 빈 메모리 제공자와 존재하지 않는 모델 디렉토리를 사용하므로
/// 모든 티커가 `DATA_UNAVAILABLE`이 됩니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use forecast_data::InMemoryProvider;

    let mut config = AppConfig::default();
    config.models.dir = std::path::PathBuf::from("target/test-models-missing");

    AppState::new(Arc::new(InMemoryProvider::new()), config)
}
