//! 과거 데이터 표시 기간.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::price_series::{PricePoint, PriceSeries};

/// 응답에 포함할 과거 데이터 기간.
///
/// 예측과 지표 계산은 항상 전체 이력을 사용하며,
/// 이 기간은 응답에 표시되는 구간만 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HistoryPeriod {
    /// 1일
    #[serde(rename = "1d")]
    OneDay,
    /// 5일
    #[serde(rename = "5d")]
    FiveDays,
    /// 1개월
    #[serde(rename = "1m")]
    OneMonth,
    /// 6개월
    #[serde(rename = "6m")]
    SixMonths,
    /// 1년
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    /// 5년
    #[serde(rename = "5y")]
    FiveYears,
    /// 연초부터
    #[serde(rename = "ytd")]
    YearToDate,
    /// 전체 이력
    #[serde(rename = "max", alias = "all")]
    Max,
}

impl HistoryPeriod {
    /// 문자열을 해석합니다. 알 수 없는 값은 1년으로 처리합니다.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneDay => "1d",
            HistoryPeriod::FiveDays => "5d",
            HistoryPeriod::OneMonth => "1m",
            HistoryPeriod::SixMonths => "6m",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::FiveYears => "5y",
            HistoryPeriod::YearToDate => "ytd",
            HistoryPeriod::Max => "max",
        }
    }

    /// 마지막 관측일 기준 표시 시작일(포함)을 계산합니다.
    ///
    /// 월/연 단위는 달력 월 연산을 사용합니다 (3/31 - 1개월 = 2/29 또는 2/28).
    /// `Max`는 `None`을 반환합니다.
    pub fn start_date(&self, last_date: NaiveDate) -> Option<NaiveDate> {
        match self {
            HistoryPeriod::OneDay => last_date.checked_sub_days(Days::new(1)),
            HistoryPeriod::FiveDays => last_date.checked_sub_days(Days::new(5)),
            HistoryPeriod::OneMonth => last_date.checked_sub_months(Months::new(1)),
            HistoryPeriod::SixMonths => last_date.checked_sub_months(Months::new(6)),
            HistoryPeriod::OneYear => last_date.checked_sub_months(Months::new(12)),
            HistoryPeriod::FiveYears => last_date.checked_sub_months(Months::new(60)),
            HistoryPeriod::YearToDate => NaiveDate::from_ymd_opt(last_date.year(), 1, 1),
            HistoryPeriod::Max => None,
        }
    }

    /// 시계열에서 표시 구간을 잘라냅니다.
    pub fn window<'a>(&self, series: &'a PriceSeries) -> &'a [PricePoint] {
        match series.last_date().and_then(|last| self.start_date(last)) {
            Some(start) => series.tail_from(start),
            None => series.points(),
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(HistoryPeriod::OneDay),
            "5d" => Ok(HistoryPeriod::FiveDays),
            "1m" => Ok(HistoryPeriod::OneMonth),
            "6m" => Ok(HistoryPeriod::SixMonths),
            "1y" => Ok(HistoryPeriod::OneYear),
            "5y" => Ok(HistoryPeriod::FiveYears),
            "ytd" => Ok(HistoryPeriod::YearToDate),
            "max" | "all" => Ok(HistoryPeriod::Max),
            other => Err(format!("Unknown history period: {}", other)),
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!("1Y".parse::<HistoryPeriod>().unwrap(), HistoryPeriod::OneYear);
        assert_eq!("all".parse::<HistoryPeriod>().unwrap(), HistoryPeriod::Max);
        assert!("2w".parse::<HistoryPeriod>().is_err());
        assert_eq!(HistoryPeriod::parse_lenient("2w"), HistoryPeriod::OneYear);
    }

    #[test]
    fn test_start_date_calendar_months() {
        let last = date(2024, 3, 31);
        assert_eq!(HistoryPeriod::OneMonth.start_date(last), Some(date(2024, 2, 29)));
        assert_eq!(HistoryPeriod::SixMonths.start_date(last), Some(date(2023, 9, 30)));
        assert_eq!(HistoryPeriod::OneYear.start_date(last), Some(date(2023, 3, 31)));
        assert_eq!(HistoryPeriod::FiveDays.start_date(last), Some(date(2024, 3, 26)));
        assert_eq!(HistoryPeriod::YearToDate.start_date(last), Some(date(2024, 1, 1)));
        assert_eq!(HistoryPeriod::Max.start_date(last), None);
    }

    #[test]
    fn test_window() {
        let start = date(2022, 1, 1);
        let pairs = (0..800).map(|i| (start + Days::new(i), 100.0 + i as f64));
        let series = PriceSeries::from_pairs("X", pairs).unwrap();
        let last = series.last_date().unwrap();

        let year = HistoryPeriod::OneYear.window(&series);
        assert_eq!(year.first().unwrap().date, last - Months::new(12));
        assert_eq!(year.last().unwrap().date, last);

        assert_eq!(HistoryPeriod::Max.window(&series).len(), 800);
        assert_eq!(HistoryPeriod::OneDay.window(&series).len(), 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&HistoryPeriod::YearToDate).unwrap();
        assert_eq!(json, "\"ytd\"");
        let parsed: HistoryPeriod = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, HistoryPeriod::Max);
    }
}
