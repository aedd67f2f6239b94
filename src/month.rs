//! Helpers for the month navigation shared by the calendar and stats
//! views.
//!
//! A month is represented by the date of its first day, and appears in
//! query strings as `YYYY-MM`.

use time::{Date, Month};

/// The first day of the month containing `date`.
pub fn month_anchor(date: Date) -> Date {
    date.replace_day(1).unwrap()
}

/// The first day of the month before the one containing `date`.
pub fn previous_month(date: Date) -> Date {
    let year = match date.month() {
        Month::January => date.year() - 1,
        _ => date.year(),
    };

    Date::from_calendar_date(year, date.month().previous(), 1).unwrap()
}

/// The first day of the month after the one containing `date`.
pub fn next_month(date: Date) -> Date {
    let year = match date.month() {
        Month::December => date.year() + 1,
        _ => date.year(),
    };

    Date::from_calendar_date(year, date.month().next(), 1).unwrap()
}

/// Format the month containing `date` as a `YYYY-MM` query parameter.
pub fn format_month_param(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// Parse a `YYYY-MM` query parameter into the first day of that month.
pub fn parse_month_param(param: &str) -> Option<Date> {
    let (year, month) = param.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;

    Date::from_calendar_date(year, month, 1).ok()
}

/// The display name of the month containing `date`, e.g. "June 2024".
pub fn month_title(date: Date) -> String {
    let name = match date.month() {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    };

    format!("{name} {}", date.year())
}

/// The short display form of `date`, e.g. "Jun 5".
pub fn short_day_title(date: Date) -> String {
    let name = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {}", date.day())
}
