//! CLI 명령 통합 테스트 (JSON 픽스처 + 임시 모델 디렉토리).

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use serde_json::json;

use forecast_analytics::ml::{weights_artifact_path, LstmArchitecture, LstmWeights};
use forecast_cli::commands::indicators::{run_indicators, IndicatorsConfig};
use forecast_cli::commands::models::{run_models, ModelsConfig};
use forecast_cli::commands::predict::{run_predict, PredictConfig};
use forecast_core::HistoryPeriod;

fn write_fixture(dir: &Path, days: u64) -> PathBuf {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let prices: Vec<_> = (0..days)
        .map(|i| json!({"date": (start + Days::new(i)).to_string(), "close": 42.0}))
        .collect();

    let path = dir.join("fixture.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", json!({"ticker": "flat", "prices": prices})).unwrap();
    path
}

fn write_zero_model(dir: &Path, time_steps: usize) {
    LstmWeights::zeros(LstmArchitecture::default())
        .save_json_file(&weights_artifact_path(dir, time_steps))
        .unwrap();
}

#[tokio::test]
async fn predict_from_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path(), 120);
    write_zero_model(dir.path(), 20);

    let report = run_predict(PredictConfig {
        ticker: "FLAT".to_string(),
        period: HistoryPeriod::Max,
        time_steps: 20,
        predict_days: 4,
        model_dir: dir.path().to_path_buf(),
        fixture: Some(fixture),
    })
    .await
    .unwrap();

    assert!(report.error.is_none());
    assert_eq!(report.predicted.prices, vec![Some(42.0); 4]);
    assert_eq!(report.historical.prices.len(), 120);
}

#[tokio::test]
async fn predict_unknown_ticker_fails() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path(), 30);

    let err = run_predict(PredictConfig {
        ticker: "ZZZZ".to_string(),
        period: HistoryPeriod::OneYear,
        time_steps: 20,
        predict_days: 4,
        model_dir: dir.path().to_path_buf(),
        fixture: Some(fixture),
    })
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Could not fetch data for ZZZZ");
}

#[tokio::test]
async fn indicators_follow_display_window() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write_fixture(dir.path(), 400);

    let report = run_indicators(IndicatorsConfig {
        ticker: "flat".to_string(),
        period: HistoryPeriod::OneMonth,
        fixture: Some(fixture),
    })
    .await
    .unwrap();

    assert_eq!(report.ticker, "FLAT");
    assert_eq!(report.dates.len(), report.indicators.len());
    assert!(report.indicators.sma50.iter().all(|v| *v == Some(42.0)));
}

#[test]
fn models_lists_and_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_zero_model(dir.path(), 60);
    write_zero_model(dir.path(), 120);

    let report = run_models(ModelsConfig {
        model_dir: dir.path().to_path_buf(),
        preload: vec![60, 90],
    });

    assert_eq!(report.available, vec![60, 120]);
    assert_eq!(report.loaded, vec![60]);
}
