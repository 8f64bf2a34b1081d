use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DAY_FIRST_TS: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const ISO_TS: &str = "%Y-%m-%d %H:%M:%S";

/// Day-first parse of a launch date. `None` for anything unrecognised.
///
/// Accepts `DD/MM/YYYY` with optional time, bare `MM/YYYY` (first of the
/// month, the shape the monthly extract actually carries) and ISO dates.
pub fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    for fmt in DAY_FIRST_TS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }

    // MM/YYYY
    if s.len() <= 7 && s.matches('/').count() == 1 {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("01/{s}"), "%d/%m/%Y") {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    NaiveDateTime::parse_from_str(s, ISO_TS).ok()
}
