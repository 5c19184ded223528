use flatbind_model::{FieldKind, FieldValue};

use crate::convert::{ValueConverter, native};
use crate::error::{Result, SchemaError};

/// Compact numeric output format: `[0]width[.decimals]`.
///
/// `"8.2"` pads to 8 characters with 2 decimal places, `"08.2"` zero-pads,
/// `".2"` fixes the decimal places without padding, `"06"` zero-pads
/// integers to 6 characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericFormat {
    pub width: Option<usize>,
    pub decimals: Option<usize>,
    pub zero_pad: bool,
}

impl NumericFormat {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let (width_text, decimals) = match text.split_once('.') {
            Some((width, decimals)) => (width, Some(decimals.parse::<usize>().ok()?)),
            None => (text, None),
        };
        let zero_pad = width_text.len() > 1 && width_text.starts_with('0');
        let width = if width_text.is_empty() {
            None
        } else {
            Some(width_text.parse::<usize>().ok()?)
        };
        if width.is_none() && decimals.is_none() {
            return None;
        }
        Some(NumericFormat {
            width,
            decimals,
            zero_pad,
        })
    }
}

/// Numeric codec for one numeric [`FieldKind`].
///
/// Construction fails immediately for a non-numeric kind; that is a
/// configuration mistake, not something to surface per record.
#[derive(Debug, Clone)]
pub struct NumericConverter {
    kind: FieldKind,
    format: Option<NumericFormat>,
}

impl NumericConverter {
    pub fn new(kind: FieldKind) -> Result<Self> {
        if !kind.is_numeric() {
            return Err(SchemaError::unsupported_kind("numeric", kind));
        }
        Ok(NumericConverter { kind, format: None })
    }

    /// Parses the compact format string and attaches it for output.
    pub fn with_format(kind: FieldKind, format: &str) -> Result<Self> {
        let parsed = NumericFormat::parse(format)
            .ok_or_else(|| SchemaError::invalid_numeric_format(format))?;
        let mut converter = NumericConverter::new(kind)?;
        converter.format = Some(parsed);
        Ok(converter)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

impl ValueConverter for NumericConverter {
    fn try_parse(&self, text: &str) -> Option<FieldValue> {
        native::parse_numeric(self.kind, text)
    }

    fn try_format(&self, value: &FieldValue) -> Option<String> {
        if value.kind() != self.kind {
            return None;
        }
        match &self.format {
            Some(format) => native::format_numeric(value, format),
            None => native::format(value),
        }
    }
}
