//! Wire date formatting
//!
//! The client protocol carries message dates as `DD.MM.YYYY` strings; system
//! messages generated by the server use the same format.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[day].[month].[year]");

/// Format a timestamp as `DD.MM.YYYY` with zero-padded day and month.
pub fn format_date(date: OffsetDateTime) -> String {
    // A const description over calendar components cannot fail to format.
    date.format(&DATE_FORMAT).unwrap_or_default()
}

/// Today's date in wire format, for server-generated messages.
pub fn today() -> String {
    format_date(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_zero_pads_day_and_month() {
        assert_eq!(format_date(datetime!(2024-01-01 0:00 UTC)), "01.01.2024");
        assert_eq!(format_date(datetime!(2024-03-09 12:30 UTC)), "09.03.2024");
    }

    #[test]
    fn test_double_digit_components() {
        assert_eq!(format_date(datetime!(2023-12-31 23:59 UTC)), "31.12.2023");
        assert_eq!(format_date(datetime!(2024-10-15 8:00 UTC)), "15.10.2024");
    }

    #[test]
    fn test_today_matches_format() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[2..3], ".");
        assert_eq!(&today[5..6], ".");
    }
}
