use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use flatbind_model::{FieldKind, FieldValue};

use crate::convert::{ValueConverter, native};
use crate::error::{Result, SchemaError};

/// Date/time codec for the `Date` and `DateTime` kinds.
///
/// Empty input is a value, not an error: it parses to the kind's minimum.
/// With an explicit chrono pattern the parse is exact-format only; a
/// date-only pattern on a `DateTime` column promotes to midnight.
#[derive(Debug, Clone)]
pub struct DateTimeConverter {
    kind: FieldKind,
    format: Option<String>,
}

impl DateTimeConverter {
    pub fn new(kind: FieldKind) -> Result<Self> {
        if !kind.is_temporal() {
            return Err(SchemaError::unsupported_kind("date/time", kind));
        }
        Ok(DateTimeConverter { kind, format: None })
    }

    pub fn with_format(kind: FieldKind, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        let mut converter = DateTimeConverter::new(kind)?;
        if !native::write_format_ok(kind, &format) {
            return Err(SchemaError::invalid_temporal_format(format, kind));
        }
        converter.format = Some(format);
        Ok(converter)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    fn minimum(&self) -> FieldValue {
        match self.kind {
            FieldKind::Date => FieldValue::Date(NaiveDate::MIN),
            _ => FieldValue::DateTime(NaiveDateTime::MIN),
        }
    }
}

impl ValueConverter for DateTimeConverter {
    fn try_parse(&self, text: &str) -> Option<FieldValue> {
        let text = text.trim();
        if text.is_empty() {
            return Some(self.minimum());
        }
        match (&self.format, self.kind) {
            (Some(format), FieldKind::Date) => NaiveDate::parse_from_str(text, format)
                .ok()
                .map(FieldValue::Date),
            (Some(format), _) => NaiveDateTime::parse_from_str(text, format)
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, format)
                        .ok()
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
                .map(FieldValue::DateTime),
            (None, FieldKind::Date) => native::parse_date(text).map(FieldValue::Date),
            (None, _) => native::parse_datetime(text).map(FieldValue::DateTime),
        }
    }

    fn try_format(&self, value: &FieldValue) -> Option<String> {
        if value.kind() != self.kind {
            return None;
        }
        match (&self.format, value) {
            (Some(format), FieldValue::Date(date)) => native::format_chrono_date(*date, format),
            (Some(format), FieldValue::DateTime(datetime)) => {
                native::format_chrono_datetime(*datetime, format)
            }
            (None, _) => native::format(value),
            _ => None,
        }
    }
}

/// Duration codec over `[-][days.]HH:MM[:SS[.fraction]]` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanConverter;

impl SpanConverter {
    pub fn new() -> Self {
        SpanConverter
    }
}

impl ValueConverter for SpanConverter {
    fn try_parse(&self, text: &str) -> Option<FieldValue> {
        let text = text.trim();
        if text.is_empty() {
            return Some(FieldValue::Span(Duration::MIN));
        }
        native::parse_span(text).map(FieldValue::Span)
    }

    fn try_format(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Span(span) => Some(native::format_span(*span)),
            _ => None,
        }
    }
}
