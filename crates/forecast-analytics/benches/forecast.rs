//! 예측 파이프라인 벤치마크.
//!
//! # 벤치마크
//!
//! - `lstm_predict_step`: 2×50 LSTM 한 스텝 추론 (T = 60)
//! - `forecast_30_days`: 30일 자기회귀 예측
//! - `indicators_5000`: 5000개 종가 지표 계산
//!
//! ```bash
//! cargo bench -p forecast-analytics
//! ```

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use forecast_analytics::indicators::IndicatorEngine;
use forecast_analytics::ml::{
    InferenceArtifact, InputWindow, LstmArchitecture, LstmNetwork, LstmWeights, ModelRegistry,
    PredictionService, weights_artifact_path,
};
use forecast_core::PriceSeries;

fn closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * (i as f64 * 0.05).sin() + i as f64 * 0.01)
        .collect()
}

fn benchmark_lstm_step(c: &mut Criterion) {
    let arch = LstmArchitecture::default();
    let network = LstmNetwork::from_weights(&LstmWeights::constant(arch, 0.01), arch, 60).unwrap();
    let window = InputWindow::from_tail(&vec![0.5f32; 60], 60).unwrap();

    c.bench_function("lstm_predict_step", |b| {
        b.iter(|| network.predict(black_box(&window)).unwrap());
    });
}

fn benchmark_forecast(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let arch = LstmArchitecture::default();
    LstmWeights::constant(arch, 0.01)
        .save_json_file(&weights_artifact_path(dir.path(), 60))
        .unwrap();
    let service = PredictionService::new(Arc::new(ModelRegistry::new(dir.path())));

    let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    let series = PriceSeries::from_pairs(
        "BENCH",
        closes(3000)
            .into_iter()
            .enumerate()
            .map(|(i, c)| (start + Days::new(i as u64), c)),
    )
    .unwrap();

    c.bench_function("forecast_30_days", |b| {
        b.iter(|| service.forecast(black_box(&series), 60, 30).unwrap());
    });
}

fn benchmark_indicators(c: &mut Criterion) {
    let engine = IndicatorEngine::new();
    let prices = closes(5000);

    c.bench_function("indicators_5000", |b| {
        b.iter(|| engine.compute(black_box(&prices)));
    });
}

criterion_group!(
    benches,
    benchmark_lstm_step,
    benchmark_forecast,
    benchmark_indicators
);
criterion_main!(benches);
