//! Embedded timestamps, reduced to one representation: UTC, `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

pub const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format(UTC_FORMAT).to_string()
}

pub fn from_unix_seconds(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(format_utc)
}

fn take_number(digits: &str, start: usize, len: usize, default: u32) -> Option<u32> {
    match digits.get(start..start + len) {
        Some(part) => part.parse().ok(),
        None if digits.len() <= start => Some(default),
        None => None,
    }
}

/// PDF date strings: `D:YYYYMMDDHHmmSSOHH'mm'`, where everything after the year is optional.
pub fn normalize_pdf_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);
    let digit_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if !(4..=14).contains(&digit_len) {
        return None;
    }
    let (digits, rest) = s.split_at(digit_len);

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = take_number(digits, 4, 2, 1)?;
    let day = take_number(digits, 6, 2, 1)?;
    let hour = take_number(digits, 8, 2, 0)?;
    let minute = take_number(digits, 10, 2, 0)?;
    let second = take_number(digits, 12, 2, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?
        .and_time(NaiveTime::from_hms_opt(hour, minute, second)?);

    let offset_secs = parse_pdf_offset(rest)?;
    let offset = FixedOffset::east_opt(offset_secs)?;
    let local = offset.from_local_datetime(&naive).single()?;
    Some(format_utc(local.with_timezone(&Utc)))
}

fn parse_pdf_offset(rest: &str) -> Option<i32> {
    let mut chars = rest.chars();
    let sign = match chars.next() {
        None | Some('Z') | Some('z') => return Some(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let digits: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(0..2).map_or(Some(0), |h| h.parse().ok())?;
    let minutes: i32 = digits.get(2..4).map_or(Some(0), |m| m.parse().ok())?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// W3CDTF as used in OOXML core properties; a value without a zone is taken as UTC.
pub fn normalize_w3cdtf(raw: &str) -> Option<String> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(format_utc(dt.with_timezone(&Utc)));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(format_utc(Utc.from_utc_datetime(&naive)));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| format_utc(Utc.from_utc_datetime(&naive)))
}

/// EXIF `YYYY:MM:DD HH:MM:SS`. EXIF carries no zone here, so the value is read as UTC.
pub fn normalize_exif_datetime(raw: &str) -> Option<String> {
    let s = raw.trim_end_matches(char::from(0)).trim();
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|naive| format_utc(Utc.from_utc_datetime(&naive)))
}
