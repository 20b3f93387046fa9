//! 주가 예측 API 서버 진입점.
//!
//! # 환경변수
//!
//! - `FORECAST_CONFIG`: 설정 파일 경로 (기본: `config/default.toml`, 없으면 환경 변수만 사용)
//! - `FORECAST__*`: 설정 덮어쓰기 (예: `FORECAST__SERVER__PORT=8080`)
//! - `FORECAST_FIXTURE`: 설정 시 Yahoo Finance 대신 JSON 픽스처 사용 (오프라인 실행)
//! - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
//! - `RUST_LOG`, `LOG_FORMAT`: 로깅 필터/형식 덮어쓰기

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use forecast_api::metrics::setup_metrics_recorder;
use forecast_api::middleware::metrics_layer;
use forecast_api::openapi::swagger_ui_router;
use forecast_api::routes::create_api_router;
use forecast_api::state::AppState;
use forecast_core::{init_logging, AppConfig, LogConfig};
use forecast_data::{InMemoryProvider, MarketDataProvider, YahooFinanceProvider};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 긴 horizon + 많은 예측 일수도 여유 있게 끝나도록 60초
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(60),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use forecast_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        println!("{}", serde_json::to_string_pretty(&ApiDoc::openapi())?);
        std::process::exit(0);
    }

    Ok(())
}

/// 설정 로드.
///
/// `FORECAST_CONFIG`가 없고 기본 파일도 없으면 환경 변수만 사용합니다.
fn load_config() -> Result<(AppConfig, String), Box<dyn std::error::Error>> {
    match std::env::var("FORECAST_CONFIG") {
        Ok(path) if !path.is_empty() => Ok((AppConfig::load(&path)?, path)),
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => Ok((
            AppConfig::load(DEFAULT_CONFIG_PATH)?,
            DEFAULT_CONFIG_PATH.to_string(),
        )),
        _ => Ok((AppConfig::from_env_only()?, "environment".to_string())),
    }
}

/// 시세 데이터 제공자 생성.
fn build_provider() -> Result<Arc<dyn MarketDataProvider>, Box<dyn std::error::Error>> {
    match std::env::var("FORECAST_FIXTURE") {
        Ok(path) if !path.is_empty() => {
            let provider = InMemoryProvider::from_json_file(&path)?;
            warn!(fixture = %path, "Using fixture market data provider (offline mode)");
            Ok(Arc::new(provider))
        }
        _ => Ok(Arc::new(YahooFinanceProvider::new()?)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    handle_export_openapi()?;

    let (config, config_source) = load_config()?;
    init_logging(LogConfig::from_app_config(&config.logging).with_env_overrides())?;

    info!(config = %config_source, "Starting Stock Forecaster API server...");

    let metrics_handle = setup_metrics_recorder();

    let provider = build_provider()?;
    let addr = config.bind_addr();
    let preload = config.models.preload.clone();
    let state = Arc::new(AppState::new(provider, config));

    info!(
        model_dir = %state.registry().model_dir().display(),
        strategies = ?state.registry().strategy_names(),
        available = ?state.registry().available_horizons(),
        "Model registry ready"
    );

    // 전역 종료 토큰 (백그라운드 모델 preload에 종료 전파)
    let shutdown_token = CancellationToken::new();

    let preload_handle = (!preload.is_empty())
        .then(|| state.start_model_preload(preload, shutdown_token.clone()));

    let app = create_router(state, metrics_handle);

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server shutdown initiated, cleaning up...");
    shutdown_token.cancel();

    // 진행 중인 horizon 로드는 중단할 수 없으므로 최대 10초만 기다림
    if let Some(handle) = preload_handle {
        match tokio::time::timeout(Duration::from_secs(10), handle).await {
            Ok(Ok(loaded)) => info!(loaded, "Model preload task finished"),
            Ok(Err(e)) => warn!(error = %e, "Model preload task panicked"),
            Err(_) => warn!("Model preload did not finish within 10s, exiting anyway"),
        }
    }

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
        _ = shutdown_token.cancelled() => {}
    }

    shutdown_token.cancel();
}
