//! Built-in fallback codec, used when a column resolves to no converter and
//! for write-format overrides.

use std::fmt::Write as _;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use flatbind_model::{FieldKind, FieldValue};
use rust_decimal::Decimal;

use crate::convert::boolean;
use crate::convert::numeric::NumericFormat;

/// Accepted on input; the first entry is the canonical output shape.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y%m%d%H%M%S",
    "%Y%m%d",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

const CANONICAL_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
const CANONICAL_DATE: &str = "%Y-%m-%d";

pub(crate) fn parse(kind: FieldKind, text: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Bool => boolean::parse_default(text).map(FieldValue::Bool),
        FieldKind::Int16
        | FieldKind::Int32
        | FieldKind::Int64
        | FieldKind::Float32
        | FieldKind::Float64
        | FieldKind::Decimal => parse_numeric(kind, text),
        FieldKind::Text => Some(FieldValue::Text(text.to_string())),
        FieldKind::Date => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Some(FieldValue::Date(NaiveDate::MIN));
            }
            parse_date(trimmed).map(FieldValue::Date)
        }
        FieldKind::DateTime => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Some(FieldValue::DateTime(NaiveDateTime::MIN));
            }
            parse_datetime(trimmed).map(FieldValue::DateTime)
        }
        FieldKind::Span => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Some(FieldValue::Span(Duration::MIN));
            }
            parse_span(trimmed).map(FieldValue::Span)
        }
        // No native representation; schema construction rejects this path.
        FieldKind::Reference => None,
    }
}

pub(crate) fn format(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Bool(v) => Some(boolean::format_default(*v).to_string()),
        FieldValue::Int16(v) => Some(v.to_string()),
        FieldValue::Int32(v) => Some(v.to_string()),
        FieldValue::Int64(v) => Some(v.to_string()),
        FieldValue::Float32(v) => Some(v.to_string()),
        FieldValue::Float64(v) => Some(v.to_string()),
        FieldValue::Decimal(v) => Some(v.to_string()),
        FieldValue::Text(v) => Some(v.clone()),
        FieldValue::Date(v) => format_chrono_date(*v, CANONICAL_DATE),
        FieldValue::DateTime(v) => format_chrono_datetime(*v, CANONICAL_DATETIME),
        FieldValue::Span(v) => Some(format_span(*v)),
        FieldValue::Reference(_) => None,
    }
}

/// Renders a value through an explicit write-format string.
pub(crate) fn format_with(value: &FieldValue, write_format: &str) -> Option<String> {
    match value {
        FieldValue::Int16(_)
        | FieldValue::Int32(_)
        | FieldValue::Int64(_)
        | FieldValue::Float32(_)
        | FieldValue::Float64(_)
        | FieldValue::Decimal(_) => {
            let format = NumericFormat::parse(write_format)?;
            format_numeric(value, &format)
        }
        FieldValue::Date(v) => format_chrono_date(*v, write_format),
        FieldValue::DateTime(v) => format_chrono_datetime(*v, write_format),
        _ => None,
    }
}

/// Build-time check that a write-format string is renderable for the kind.
pub(crate) fn write_format_ok(kind: FieldKind, write_format: &str) -> bool {
    match kind {
        _ if kind.is_numeric() => NumericFormat::parse(write_format).is_some(),
        FieldKind::Date => {
            let probe = NaiveDate::from_ymd_opt(2000, 1, 2).unwrap_or(NaiveDate::MIN);
            format_chrono_date(probe, write_format).is_some()
        }
        FieldKind::DateTime => {
            let probe = NaiveDate::from_ymd_opt(2000, 1, 2)
                .unwrap_or(NaiveDate::MIN)
                .and_time(NaiveTime::MIN);
            format_chrono_datetime(probe, write_format).is_some()
        }
        _ => false,
    }
}

pub(crate) fn parse_numeric(kind: FieldKind, text: &str) -> Option<FieldValue> {
    let text = text.trim();
    match kind {
        FieldKind::Int16 => text.parse::<i16>().ok().map(FieldValue::Int16),
        FieldKind::Int32 => text.parse::<i32>().ok().map(FieldValue::Int32),
        FieldKind::Int64 => text.parse::<i64>().ok().map(FieldValue::Int64),
        FieldKind::Float32 => text.parse::<f32>().ok().map(FieldValue::Float32),
        FieldKind::Float64 => text.parse::<f64>().ok().map(FieldValue::Float64),
        FieldKind::Decimal => text.parse::<Decimal>().ok().map(FieldValue::Decimal),
        _ => None,
    }
}

pub(crate) fn format_numeric(value: &FieldValue, format: &NumericFormat) -> Option<String> {
    let base = match value {
        FieldValue::Int16(v) => integer_base(i64::from(*v), format.decimals),
        FieldValue::Int32(v) => integer_base(i64::from(*v), format.decimals),
        FieldValue::Int64(v) => integer_base(*v, format.decimals),
        FieldValue::Float32(v) => match format.decimals {
            Some(decimals) => format!("{v:.decimals$}"),
            None => v.to_string(),
        },
        FieldValue::Float64(v) => match format.decimals {
            Some(decimals) => format!("{v:.decimals$}"),
            None => v.to_string(),
        },
        FieldValue::Decimal(v) => match format.decimals {
            Some(decimals) => {
                let mut rescaled = *v;
                rescaled.rescale(u32::try_from(decimals).ok()?);
                rescaled.to_string()
            }
            None => v.to_string(),
        },
        _ => return None,
    };
    Some(match format.width {
        Some(width) if base.chars().count() < width => {
            if format.zero_pad {
                zero_pad(&base, width)
            } else {
                format!("{base:>width$}")
            }
        }
        _ => base,
    })
}

fn integer_base(value: i64, decimals: Option<usize>) -> String {
    match decimals {
        Some(decimals) if decimals > 0 => format!("{value}.{:0<decimals$}", ""),
        _ => value.to_string(),
    }
}

/// Pads with zeros between the sign and the digits.
fn zero_pad(text: &str, width: usize) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let pad = width.saturating_sub(text.chars().count());
    format!("{sign}{}{digits}", "0".repeat(pad))
}

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
        // Date-only shapes promote to midnight.
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Formatting with a user-supplied pattern must not panic; chrono reports
/// bad patterns through the formatter, so render into a string by hand.
pub(crate) fn format_chrono_date(value: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format)).ok()?;
    Some(out)
}

pub(crate) fn format_chrono_datetime(value: NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format)).ok()?;
    Some(out)
}

/// Parses `[-][days.]HH:MM[:SS[.fraction]]`.
pub(crate) fn parse_span(text: &str) -> Option<Duration> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let first_colon = rest.find(':')?;
    let (days, clock) = match rest.find('.') {
        Some(dot) if dot < first_colon => {
            let days_text = &rest[..dot];
            if days_text.is_empty() || !days_text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (days_text.parse::<i64>().ok()?, &rest[dot + 1..])
        }
        _ => (0, rest),
    };
    let (clock, fraction_nanos) = match clock.find('.') {
        Some(dot) => {
            let fraction = &clock[dot + 1..];
            if fraction.is_empty()
                || fraction.len() > 9
                || !fraction.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            let mut nanos: i64 = fraction.parse().ok()?;
            for _ in fraction.len()..9 {
                nanos *= 10;
            }
            (&clock[..dot], nanos)
        }
        None => (clock, 0),
    };
    let mut parts = clock.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = match parts.next() {
        Some(part) => part.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    let total = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60 + seconds)?;
    let span = Duration::try_seconds(total)?.checked_add(&Duration::nanoseconds(fraction_nanos))?;
    Some(if negative { -span } else { span })
}

/// Formats as `[-][days.]HH:MM:SS[.fraction]`, omitting zero days and a zero
/// fraction.
pub(crate) fn format_span(span: Duration) -> String {
    let negative = span < Duration::zero();
    let secs = span.num_seconds().unsigned_abs();
    let nanos = span.subsec_nanos().unsigned_abs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}
