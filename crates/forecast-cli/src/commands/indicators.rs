//! 지표만 계산.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use forecast_analytics::{IndicatorEngine, IndicatorSet};
use forecast_core::{ForecastError, HistoryPeriod};

use super::build_provider;

/// 지표 계산 설정.
#[derive(Debug, Clone)]
pub struct IndicatorsConfig {
    pub ticker: String,
    pub period: HistoryPeriod,
    pub fixture: Option<PathBuf>,
}

/// 표시 기간 날짜와 같은 위치의 지표.
#[derive(Debug, Serialize)]
pub struct IndicatorsReport {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub indicators: IndicatorSet,
}

/// 전체 이력에서 지표를 계산하고 표시 기간만 잘라 반환합니다.
pub async fn run_indicators(config: IndicatorsConfig) -> Result<IndicatorsReport> {
    let provider = build_provider(config.fixture.as_deref())?;
    let series = provider
        .fetch_history(&config.ticker)
        .await
        .map_err(ForecastError::from)?;

    let indicators = IndicatorEngine::new().compute(&series.closes());
    let visible = config.period.window(&series);

    Ok(IndicatorsReport {
        ticker: series.ticker().to_string(),
        dates: visible.iter().map(|p| p.date).collect(),
        indicators: indicators.tail(visible.len()).sanitized(),
    })
}
