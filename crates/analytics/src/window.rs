//! Reporting windows over UTC timestamps.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Half-open `[start, end)` range covering one calendar month (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// The calendar month containing `now`.
    pub fn containing(now: DateTime<Utc>) -> Self {
        let (year, month) = (now.year(), now.month());
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        Self {
            start: first_instant(year, month),
            end: first_instant(next_year, next_month),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn first_instant(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Half-open `[start, end)` range covering `date` (UTC).
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + chrono::Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_window_is_half_open() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let w = MonthWindow::containing(now);
        assert_eq!(w.start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(w.end, Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap());
        assert!(w.contains(w.start));
        assert!(!w.contains(w.end));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let w = MonthWindow::containing(now);
        assert_eq!(w.end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn day_bounds_cover_one_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap());
        assert_eq!(end - start, chrono::Duration::days(1));
    }
}
