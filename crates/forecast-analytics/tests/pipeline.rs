//! 예측 파이프라인 통합 테스트.
//!
//! 임시 디렉토리에 가중치 아티팩트를 만들고 레지스트리 → 예측 → 응답 조립까지 실행합니다.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use forecast_analytics::ml::{
    weights_artifact_path, LstmArchitecture, LstmWeights, ModelRegistry, PredictionService,
};
use forecast_core::{ForecastError, HistoryPeriod, PriceSeries};

fn daily_series(ticker: &str, closes: impl IntoIterator<Item = f64>) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let pairs = closes
        .into_iter()
        .enumerate()
        .map(|(i, close)| (start + Days::new(i as u64), close));
    PriceSeries::from_pairs(ticker, pairs).unwrap()
}

/// 0 가중치 모델(출력 항상 0)을 `time_steps`별로 기록한 레지스트리.
fn registry_with_zero_models(horizons: &[usize]) -> (tempfile::TempDir, Arc<ModelRegistry>) {
    let dir = tempfile::tempdir().unwrap();
    let weights = LstmWeights::zeros(LstmArchitecture::default());
    for &t in horizons {
        weights
            .save_json_file(&weights_artifact_path(dir.path(), t))
            .unwrap();
    }
    let registry = Arc::new(ModelRegistry::new(dir.path()));
    (dir, registry)
}

#[test]
fn flat_series_end_to_end() {
    let (_dir, registry) = registry_with_zero_models(&[60]);
    let service = PredictionService::new(registry);
    let series = daily_series("FLAT", std::iter::repeat(100.0).take(500));

    let report = service
        .report(&series, HistoryPeriod::Max, 60, 30)
        .unwrap();

    assert!(report.error.is_none());
    assert_eq!(report.predicted.prices, vec![Some(100.0); 30]);
    assert_eq!(report.predicted.dates.len(), 30);

    let indicators = &report.indicators;
    assert_eq!(indicators.len(), 500);
    assert!(indicators.rsi.iter().all(|v| *v == Some(100.0)));
    assert!(indicators.ema200.iter().all(|v| *v == Some(100.0)));
    assert_eq!(indicators.sma50.iter().filter(|v| v.is_none()).count(), 49);
    assert!(indicators.sma50[49..].iter().all(|v| *v == Some(100.0)));
    for line in [
        &indicators.macd.macd,
        &indicators.macd.signal,
        &indicators.macd.histogram,
    ] {
        assert!(line.iter().all(|v| v.unwrap().abs() < 1e-9));
    }
}

#[test]
fn insufficient_history_keeps_history_and_indicators() {
    let (_dir, registry) = registry_with_zero_models(&[60]);
    let service = PredictionService::new(registry);
    let series = daily_series("SHORT", (0..200).map(|i| 10.0 + (i % 7) as f64));

    let report = service
        .report(&series, HistoryPeriod::Max, 5000, 30)
        .unwrap();

    assert!(report.predicted.prices.is_empty());
    assert_eq!(report.historical.prices.len(), 200);
    assert_eq!(report.indicators.rsi.len(), 200);
    assert!(report.error.is_some());

    assert!(matches!(
        service.forecast(&series, 5000, 30),
        Err(ForecastError::InsufficientHistory {
            required: 5000,
            actual: 200
        })
    ));
}

#[test]
fn missing_horizon_is_model_not_found() {
    let (_dir, registry) = registry_with_zero_models(&[60]);
    let service = PredictionService::new(registry);
    let series = daily_series("X", (0..300).map(|i| 20.0 + i as f64));

    let err = service.forecast(&series, 120, 10).unwrap_err();
    assert!(matches!(err, ForecastError::ModelNotFound { time_steps: 120 }));

    let report = service
        .report(&series, HistoryPeriod::OneMonth, 120, 10)
        .unwrap();
    assert!(report.predicted.dates.is_empty());
    assert_eq!(report.historical.dates.len(), report.indicators.len());
}

#[test]
fn concurrent_requests_share_one_model() {
    let (_dir, registry) = registry_with_zero_models(&[60]);
    let service = Arc::new(PredictionService::new(Arc::clone(&registry)));
    let series = Arc::new(daily_series("CONC", (0..400).map(|i| 50.0 + (i % 30) as f64)));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let series = Arc::clone(&series);
            std::thread::spawn(move || service.forecast(&series, 60, 5).unwrap())
        })
        .collect();

    let results: Vec<Vec<f64>> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    assert!(results.iter().all(|r| r == &results[0]));
    // 0 출력 → min
    assert!(results[0].iter().all(|&v| v == 50.0));
    assert_eq!(registry.cached_horizons(), vec![60]);
}
