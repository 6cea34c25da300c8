//! Date of birth formatting.
//!
//! Dates of birth are stored as free text in the `D Month, YYYY` form, for
//! example `14 September, 2019`.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Store format: unpadded day, full English month name, four-digit year.
const STORE_FORMAT: &str = "%-d %B, %Y";

/// Formats accepted when reading a date typed by the user.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B, %Y", "%d %B %Y", "%d/%m/%Y"];

/// Format a date the way it is stored.
#[must_use]
pub fn format_date_of_birth(date: NaiveDate) -> String {
    date.format(STORE_FORMAT).to_string()
}

/// Parse a user-supplied date of birth.
///
/// Accepts ISO dates (`2000-01-31`), the store format (`31 January, 2000`),
/// the same without the comma, and `DD/MM/YYYY`.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if no accepted format matches.
pub fn parse_date_of_birth(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| Error::InvalidDate {
            input: input.to_string(),
        })
}

/// Normalize a user-supplied date of birth into the store format.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the input cannot be parsed.
pub fn normalize_date_of_birth(input: &str) -> Result<String> {
    parse_date_of_birth(input).map(format_date_of_birth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_unpadded_day() {
        assert_eq!(format_date_of_birth(date(2000, 1, 1)), "1 January, 2000");
    }

    #[test]
    fn test_format_every_month_name() {
        let names = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        for (month, name) in (1..=12).zip(names) {
            assert_eq!(
                format_date_of_birth(date(2019, month, 14)),
                format!("14 {name}, 2019")
            );
        }
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date_of_birth("1999-12-31").unwrap(), date(1999, 12, 31));
    }

    #[test]
    fn test_parse_store_format() {
        assert_eq!(
            parse_date_of_birth("14 September, 2019").unwrap(),
            date(2019, 9, 14)
        );
        assert_eq!(parse_date_of_birth(" 1 January, 2000 ").unwrap(), date(2000, 1, 1));
    }

    #[test]
    fn test_parse_slashes() {
        assert_eq!(parse_date_of_birth("05/06/1987").unwrap(), date(1987, 6, 5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_date_of_birth("yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert!(parse_date_of_birth("2001-02-29").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_date_of_birth("2000-01-01").unwrap(), "1 January, 2000");
    }
}
