use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Local formats produced by browser `datetime-local` inputs; read as UTC.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parses an interview timestamp. Accepts RFC 3339 and offset-less local
/// date-times. Past dates are valid.
pub fn parse_interview_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::Validation("Interview date is required".to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::Validation(format!("Invalid interview date: {}", raw)))
}
