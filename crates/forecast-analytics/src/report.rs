//! 응답 조립.
//!
//! 표시 구간 과거 데이터, 영업일로 날짜를 붙인 예측, 표시 구간에 맞춘 지표를
//! 하나의 응답으로 묶고 모든 수치 시퀀스를 한 번 정리합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use forecast_core::{business_days_after, PricePoint};

use crate::indicators::{sanitize_values, IndicatorSet};

/// 날짜/가격 쌍 시퀀스.
///
/// 유한하지 않은 가격은 `null`로 직렬화됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SeriesPayload {
    /// `YYYY-MM-DD`
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<Option<f64>>,
}

/// 예측 응답.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ForecastReport {
    /// 표시 기간의 과거 종가
    pub historical: SeriesPayload,
    /// 영업일 기준 예측 종가 (예측 실패 시 빈 시퀀스)
    pub predicted: SeriesPayload,
    /// `historical.dates`와 위치가 같은 지표
    pub indicators: IndicatorSet,
    /// 예측 분기 실패 사유
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForecastReport {
    /// 응답을 조립합니다.
    ///
    /// # 인자
    /// * `display` - 표시 구간 과거 데이터
    /// * `last_date` - 전체 이력의 마지막 관측일 (예측 날짜 기준)
    /// * `forecast` - 예측 가격 (생성 순서)
    /// * `indicators` - 표시 구간에 맞춰 자른 지표
    /// * `error` - 예측 분기 에러 메시지
    pub fn assemble(
        display: &[PricePoint],
        last_date: Option<NaiveDate>,
        forecast: &[f64],
        indicators: &IndicatorSet,
        error: Option<String>,
    ) -> Self {
        let historical = SeriesPayload {
            dates: display.iter().map(|p| p.date).collect(),
            prices: sanitize_values(&display.iter().map(|p| p.close).collect::<Vec<_>>()),
        };

        let predicted = match last_date {
            Some(last) if !forecast.is_empty() => SeriesPayload {
                dates: business_days_after(last, forecast.len()),
                prices: sanitize_values(forecast),
            },
            _ => SeriesPayload::default(),
        };

        Self {
            historical,
            predicted,
            indicators: indicators.sanitized(),
            error,
        }
    }

    /// 예측이 포함되어 있는지 확인합니다.
    pub fn has_forecast(&self) -> bool {
        !self.predicted.prices.is_empty()
    }
}
