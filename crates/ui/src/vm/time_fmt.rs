use chrono::{DateTime, Datelike, NaiveDate, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y %H:%M").to_string()
}

/// `Nov 14, 2023`.
#[must_use]
pub fn format_date(value: NaiveDate) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// `November 2023`.
#[must_use]
pub fn format_month(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map_or_else(String::new, |d| d.format("%B %Y").to_string())
}

/// `2023-11-14`, the value format of date inputs.
#[must_use]
pub fn format_input_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[must_use]
pub fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::time::fixed_now;

    #[test]
    fn formats_fixed_instant() {
        let now = fixed_now();
        assert_eq!(format_datetime(now), "Nov 14, 2023 22:13");
        assert_eq!(format_date(now.date_naive()), "Nov 14, 2023");
        assert_eq!(format_month(2023, 11), "November 2023");
    }

    #[test]
    fn input_dates_round_trip() {
        let date = fixed_now().date_naive();
        assert_eq!(parse_input_date(&format_input_date(date)), Some(date));
        assert_eq!(parse_input_date("14/11/2023"), None);
    }
}
