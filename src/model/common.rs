use chrono::{DateTime, NaiveDate};

pub type Id = i64;

/// Release dates arrive either ISO formatted or in the day-first form the
/// metadata service uses.
const RELEASE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Parse a release date. Full RFC 3339 timestamps are accepted as well and
/// keep the calendar date as written, ignoring the offset.
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    RELEASE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
