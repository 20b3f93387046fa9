//! 단일 티커 예측.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::info;

use forecast_analytics::{ForecastReport, ModelRegistry, PredictionService};
use forecast_core::{AppConfig, ForecastConfig, ForecastError, HistoryPeriod};

use super::build_provider;

/// 예측 설정.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    /// 종목 코드
    pub ticker: String,
    /// 표시 기간
    pub period: HistoryPeriod,
    /// 입력 윈도우 길이
    pub time_steps: usize,
    /// 예측 영업일 수
    pub predict_days: usize,
    /// 모델 아티팩트 디렉토리
    pub model_dir: PathBuf,
    /// JSON 픽스처 (없으면 Yahoo Finance)
    pub fixture: Option<PathBuf>,
}

impl PredictConfig {
    fn validate(&self, limits: &ForecastConfig) -> Result<()> {
        if self.ticker.trim().is_empty() {
            bail!("ticker must not be blank");
        }
        if self.time_steps == 0 {
            bail!("time_steps must be positive");
        }
        if self.predict_days == 0 || self.predict_days > limits.max_predict_days {
            bail!(
                "predict_days must be within 1..={}, got {}",
                limits.max_predict_days,
                self.predict_days
            );
        }
        Ok(())
    }
}

/// 예측을 실행하고 API와 같은 형식의 응답을 반환합니다.
///
/// 시세 데이터가 없으면 에러, 예측 분기 실패는 응답의 `error` 필드로 반환됩니다.
pub async fn run_predict(config: PredictConfig) -> Result<ForecastReport> {
    config.validate(&AppConfig::from_env_only()?.forecast)?;

    let provider = build_provider(config.fixture.as_deref())?;
    let started = Instant::now();

    let series = provider
        .fetch_history(&config.ticker)
        .await
        .map_err(ForecastError::from)?;

    info!(
        ticker = %series.ticker(),
        points = series.len(),
        provider = provider.name(),
        "History fetched"
    );

    let registry = Arc::new(ModelRegistry::new(config.model_dir.clone()));
    let service = PredictionService::new(registry);

    let PredictConfig {
        period,
        time_steps,
        predict_days,
        ..
    } = config;

    let report = tokio::task::spawn_blocking(move || {
        service.report(&series, period, time_steps, predict_days)
    })
    .await
    .context("Forecast task panicked")??;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        predicted = report.predicted.prices.len(),
        "Prediction finished"
    );

    Ok(report)
}
