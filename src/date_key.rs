//! The codec between calendar dates and the canonical `YYYY-MM-DD` date
//! bucket keys used to group expenses.
//!
//! Keys are built from the calendar fields of a [Date] directly. A [Date]
//! carries no time-of-day or UTC offset, so the same calendar date always
//! produces the same key and `parse_date_key(format_date_key(date)) == date`
//! for every representable date.

use time::{Date, Month};

use crate::Error;

/// Format a calendar date as a zero-padded `YYYY-MM-DD` date key.
pub fn format_date_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parse a `YYYY-MM-DD` date key back into a calendar date.
///
/// # Errors
///
/// Returns [Error::InvalidDateKey] if `date_key` does not have three dash
/// separated parts, a part is not a number, or the parts do not name a real
/// calendar date (e.g. `2023-02-29`).
pub fn parse_date_key(date_key: &str) -> Result<Date, Error> {
    let invalid = || Error::InvalidDateKey(date_key.to_owned());

    let mut parts = date_key.splitn(3, '-');
    let year: i32 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid)?;
    let month: u8 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid)?;
    let day: u8 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid)?;

    let month = Month::try_from(month).map_err(|_| invalid())?;

    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

#[cfg(test)]
mod date_key_tests {
    use time::{Date, macros::date};

    use crate::Error;

    use super::{format_date_key, parse_date_key};

    #[test]
    fn format_zero_pads_month_and_day() {
        assert_eq!(format_date_key(date!(2024 - 01 - 05)), "2024-01-05");
    }

    #[test]
    fn parse_returns_calendar_date() {
        assert_eq!(parse_date_key("2024-06-15"), Ok(date!(2024 - 06 - 15)));
    }

    #[test]
    fn round_trip_is_lossless() {
        let dates = [
            date!(2024 - 02 - 29),
            date!(2023 - 12 - 31),
            date!(2024 - 01 - 01),
            date!(1999 - 09 - 09),
            date!(2025 - 10 - 26),
        ];

        for date in dates {
            let got = parse_date_key(&format_date_key(date));

            assert_eq!(got, Ok(date), "round trip failed for {date}");
        }
    }

    #[test]
    fn round_trip_covers_every_day_of_a_leap_year() {
        let mut date = date!(2024 - 01 - 01);

        while date.year() == 2024 {
            assert_eq!(parse_date_key(&format_date_key(date)), Ok(date));
            date = date.next_day().expect("dates in 2024 have a next day");
        }
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        let keys = ["", "2024", "2024-06", "foo-bar-baz", "2024/06/15", "2024-13-01"];

        for key in keys {
            assert_eq!(
                parse_date_key(key),
                Err(Error::InvalidDateKey(key.to_owned())),
                "expected \"{key}\" to be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_impossible_calendar_dates() {
        assert_eq!(
            parse_date_key("2023-02-29"),
            Err(Error::InvalidDateKey("2023-02-29".to_owned()))
        );
    }

    #[test]
    fn leap_day_round_trips() {
        let date: Date = parse_date_key("2024-02-29").unwrap();

        assert_eq!(format_date_key(date), "2024-02-29");
    }
}
