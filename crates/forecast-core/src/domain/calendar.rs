//! 영업일 달력.
//!
//! 공휴일은 고려하지 않고 토/일요일만 건너뜁니다.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// 주말이 아닌 날인지 확인합니다.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `last_date` 이후(미포함)의 영업일 `n`개를 반환합니다.
///
/// `n == 0`이면 빈 벡터를 반환합니다.
pub fn business_days_after(last_date: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut cursor = last_date;

    while dates.len() < n {
        match cursor.checked_add_days(Days::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
        if is_business_day(cursor) {
            dates.push(cursor);
        }
    }

    dates
}
