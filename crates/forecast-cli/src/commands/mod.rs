//! CLI 명령어 구현 모듈.

pub mod indicators;
pub mod models;
pub mod predict;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use forecast_data::{InMemoryProvider, MarketDataProvider, YahooFinanceProvider};

/// 시세 데이터 제공자 생성.
///
/// `fixture`가 주어지면 JSON 픽스처를, 아니면 Yahoo Finance를 사용합니다.
pub fn build_provider(fixture: Option<&Path>) -> Result<Arc<dyn MarketDataProvider>> {
    match fixture {
        Some(path) => {
            let provider = InMemoryProvider::from_json_file(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(
            YahooFinanceProvider::new().context("Failed to create Yahoo Finance connector")?,
        )),
    }
}

/// 결과를 JSON으로 출력합니다.
pub fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
