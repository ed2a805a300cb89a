use std::collections::BTreeMap;

use attendance_core::stats::DayTally;
use chrono::{Datelike, NaiveDate};

use crate::vm::time_fmt::format_month;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarDayVm {
    pub date: NaiveDate,
    pub day: u32,
    pub tile_class: &'static str,
    pub is_today: bool,
    pub tally: DayTally,
}

/// One month grid, weeks starting on Sunday.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarMonthVm {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDayVm>,
}

#[must_use]
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

#[must_use]
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

#[must_use]
pub fn build_month(
    year: i32,
    month: u32,
    tallies: &BTreeMap<NaiveDate, DayTally>,
    today: NaiveDate,
) -> CalendarMonthVm {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return CalendarMonthVm {
            year,
            month,
            title: String::new(),
            leading_blanks: 0,
            days: Vec::new(),
        };
    };
    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let tally = tallies.get(&date).copied().unwrap_or_default();
            CalendarDayVm {
                date,
                day: date.day(),
                tile_class: tally.tile().css_class(),
                is_today: date == today,
                tally,
            }
        })
        .collect();

    CalendarMonthVm {
        year,
        month,
        title: format_month(year, month),
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    }
}
