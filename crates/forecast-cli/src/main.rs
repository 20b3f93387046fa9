//! 주가 예측 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # AAPL 30 영업일 예측 (최근 1년 표시)
//! forecast predict -t AAPL --period 1y --time-steps 60 --days 30
//!
//! # 오프라인 픽스처로 예측
//! forecast predict -t AAPL --fixture data/aapl.json --model-dir models
//!
//! # 지표만 계산
//! forecast indicators -t MSFT --period 6m
//!
//! # 모델 디렉토리 점검 및 미리 로드
//! forecast models --model-dir models --preload 60,120
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use forecast_cli::commands::indicators::{run_indicators, IndicatorsConfig};
use forecast_cli::commands::models::{run_models, ModelsConfig};
use forecast_cli::commands::predict::{run_predict, PredictConfig};
use forecast_cli::commands::print_json;
use forecast_core::{init_logging, HistoryPeriod, LogConfig};

#[derive(Parser)]
#[command(name = "forecast")]
#[command(about = "Stock forecaster CLI - LSTM 기반 주가 예측 및 기술적 지표", long_about = None)]
#[command(version)]
struct Cli {
    /// 상세 로그 출력 (stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON 들여쓰기 출력
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 종가 예측 (과거 데이터, 예측, 지표를 JSON으로 출력)
    Predict {
        /// 종목 코드 (예: AAPL, 005930.KS)
        #[arg(short, long)]
        ticker: String,

        /// 표시 기간 (1d, 5d, 1m, 6m, 1y, 5y, ytd, max)
        #[arg(short, long, default_value = "1y")]
        period: String,

        /// 모델 입력 윈도우 길이
        #[arg(long, default_value = "60")]
        time_steps: usize,

        /// 예측 영업일 수
        #[arg(short, long, default_value = "30")]
        days: usize,

        /// 모델 아티팩트 디렉토리
        #[arg(short, long, default_value = "models")]
        model_dir: PathBuf,

        /// Yahoo Finance 대신 사용할 JSON 픽스처
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// 기술적 지표 계산 (RSI, MACD, SMA50, EMA200)
    Indicators {
        /// 종목 코드
        #[arg(short, long)]
        ticker: String,

        /// 표시 기간
        #[arg(short, long, default_value = "1y")]
        period: String,

        /// Yahoo Finance 대신 사용할 JSON 픽스처
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// 모델 디렉토리 점검
    Models {
        /// 모델 아티팩트 디렉토리
        #[arg(short, long, default_value = "models")]
        model_dir: PathBuf,

        /// 로드해 볼 time_steps 목록 (쉼표 구분)
        #[arg(long, value_delimiter = ',')]
        preload: Vec<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    init_logging(LogConfig::new(level).with_stderr(true))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Predict {
            ticker,
            period,
            time_steps,
            days,
            model_dir,
            fixture,
        } => {
            let report = run_predict(PredictConfig {
                ticker,
                period: HistoryPeriod::parse_lenient(&period),
                time_steps,
                predict_days: days,
                model_dir,
                fixture,
            })
            .await?;
            print_json(&report, cli.pretty)?;
        }
        Commands::Indicators {
            ticker,
            period,
            fixture,
        } => {
            let report = run_indicators(IndicatorsConfig {
                ticker,
                period: HistoryPeriod::parse_lenient(&period),
                fixture,
            })
            .await?;
            print_json(&report, cli.pretty)?;
        }
        Commands::Models { model_dir, preload } => {
            let report = run_models(ModelsConfig { model_dir, preload });
            print_json(&report, cli.pretty)?;
        }
    }

    Ok(())
}
