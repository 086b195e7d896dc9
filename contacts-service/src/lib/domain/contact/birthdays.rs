use chrono::Datelike;
use chrono::NaiveDate;

/// Anniversary of `birthday` in `year`.
///
/// Feb 29 falls on Feb 28 in non-leap years.
fn anniversary(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

/// First anniversary of `birthday` on or after `today`.
pub fn next_birthday(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    match anniversary(birthday, today.year()) {
        Some(date) if date >= today => Some(date),
        _ => anniversary(birthday, today.year() + 1),
    }
}

/// Whether the next anniversary falls within `[today, today + days]`.
pub fn is_upcoming(birthday: NaiveDate, today: NaiveDate, days: u32) -> bool {
    next_birthday(birthday, today)
        .map(|next| (next - today).num_days() <= i64::from(days))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_today_is_upcoming() {
        assert!(is_upcoming(date(1990, 6, 1), date(2024, 6, 1), 0));
        assert!(is_upcoming(date(1990, 6, 1), date(2024, 6, 1), 7));
    }

    #[test]
    fn test_window_bounds() {
        let today = date(2024, 6, 1);
        assert!(is_upcoming(date(1985, 6, 8), today, 7));
        assert!(!is_upcoming(date(1985, 6, 9), today, 7));
        assert!(!is_upcoming(date(1985, 5, 31), today, 7));
    }

    #[test]
    fn test_year_wrap() {
        let today = date(2024, 12, 28);
        assert!(is_upcoming(date(2000, 1, 2), today, 7));
        assert_eq!(next_birthday(date(2000, 1, 2), today), Some(date(2025, 1, 2)));
        assert!(!is_upcoming(date(2000, 1, 5), today, 7));
    }

    #[test]
    fn test_leap_day_in_non_leap_year() {
        assert_eq!(
            next_birthday(date(2000, 2, 29), date(2023, 2, 20)),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            next_birthday(date(2000, 2, 29), date(2024, 2, 20)),
            Some(date(2024, 2, 29))
        );
        assert!(is_upcoming(date(2000, 2, 29), date(2023, 2, 25), 3));
    }
}
