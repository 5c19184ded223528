//! Per-column binding: the bridge between one raw field and one record field.

use std::sync::{Arc, OnceLock};

use flatbind_model::{
    ColumnDescriptor, FieldKind, FieldValue, Message, RecordContext, WidthOverflow,
};

use crate::convert::{ValueConverter, native};

type Getter<R> = Box<dyn Fn(&R) -> Option<FieldValue> + Send + Sync>;
type Setter<R> = Box<dyn Fn(&mut R, FieldValue) + Send + Sync>;

/// One column of a sealed record schema.
///
/// Carries the descriptor, the converter resolved when the schema was built
/// (`None` selects the native codec), the effective overflow policy, and the
/// accessor closures for the bound record field. Immutable after
/// construction; the display text is materialized once on first use.
pub struct ColumnBinding<R> {
    descriptor: ColumnDescriptor,
    overflow: WidthOverflow,
    converter: Option<Arc<dyn ValueConverter>>,
    get: Getter<R>,
    set: Setter<R>,
    display: OnceLock<String>,
}

impl<R> ColumnBinding<R> {
    pub(crate) fn new(
        descriptor: ColumnDescriptor,
        overflow: WidthOverflow,
        converter: Option<Arc<dyn ValueConverter>>,
        get: Getter<R>,
        set: Setter<R>,
    ) -> Self {
        ColumnBinding {
            descriptor,
            overflow,
            converter,
            get,
            set,
            display: OnceLock::new(),
        }
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    pub fn overflow(&self) -> WidthOverflow {
        self.overflow
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn display_text(&self) -> &str {
        self.display
            .get_or_init(|| self.descriptor.display_name().to_string())
    }

    /// Binds one raw field into the record, appending diagnostics instead of
    /// failing. A diagnostic aborts this column only.
    pub fn set_value(&self, record: &mut R, raw: &str, ctx: &mut RecordContext) {
        let display = self.display_text();
        if self.descriptor.mandatory && raw.trim().is_empty() {
            ctx.push(Message::error(display, format!("{display} is required.")));
            return;
        }
        let Some(text) = self.correct_width(raw, ctx) else {
            return;
        };
        if self.descriptor.nullable && text.trim().is_empty() {
            return;
        }
        let Some(value) = self.parse(&text) else {
            ctx.push(Message::error(
                display,
                format!("{display} is invalid; the value could not be parsed."),
            ));
            return;
        };
        if self.descriptor.line_number
            && let Some(parsed) = value.as_i64()
            && parsed != ctx.line_number()
        {
            ctx.push(Message::error(
                display,
                format!(
                    "{display} does not match the current line number {}.",
                    ctx.line_number()
                ),
            ));
        }
        // A line-number mismatch is reported but the parsed value still wins.
        (self.set)(record, value);
    }

    /// Formats the bound field back to text, the mirror of
    /// [`set_value`](ColumnBinding::set_value). Returns empty text whenever
    /// a diagnostic was appended.
    pub fn get_value(&self, record: &R, ctx: &mut RecordContext) -> String {
        let display = self.display_text();
        let value = if self.descriptor.line_number {
            let Some(value) = self.line_number_value(ctx) else {
                ctx.push(Message::error(
                    display,
                    format!("{display} is invalid; the value could not be formatted."),
                ));
                return String::new();
            };
            Some(value)
        } else {
            (self.get)(record)
        };
        let Some(value) = value else {
            if self.descriptor.mandatory {
                ctx.push(Message::error(display, format!("{display} is required.")));
            }
            return String::new();
        };
        let Some(text) = self.format_value(&value) else {
            ctx.push(Message::error(
                display,
                format!("{display} is invalid; the value could not be formatted."),
            ));
            return String::new();
        };
        self.correct_width(&text, ctx).unwrap_or_default()
    }

    fn parse(&self, text: &str) -> Option<FieldValue> {
        match &self.converter {
            Some(converter) => converter.try_parse(text),
            None => native::parse(self.descriptor.kind, text),
        }
    }

    fn format_value(&self, value: &FieldValue) -> Option<String> {
        // An explicit write format forces the native formatter, converter or
        // not.
        if let Some(write_format) = self.descriptor.write_format.as_deref() {
            return native::format_with(value, write_format);
        }
        match &self.converter {
            Some(converter) => converter.try_format(value),
            None => native::format(value),
        }
    }

    fn correct_width(&self, text: &str, ctx: &mut RecordContext) -> Option<String> {
        let display = self.display_text();
        let Some(width) = self.descriptor.width else {
            return Some(text.to_string());
        };
        if text.chars().count() <= width {
            return Some(text.to_string());
        }
        match self.overflow {
            WidthOverflow::Fail => {
                ctx.push(Message::error(
                    display,
                    format!("{display} exceeds the maximum width of {width}."),
                ));
                None
            }
            WidthOverflow::Truncate => {
                ctx.push(Message::warning(
                    display,
                    format!("{display} exceeds the maximum width of {width}; the value was truncated."),
                ));
                Some(text.chars().take(width).collect())
            }
        }
    }

    /// Line-number payload for the write path. `None` when the current line
    /// does not fit the column's integer kind.
    fn line_number_value(&self, ctx: &RecordContext) -> Option<FieldValue> {
        match self.descriptor.kind {
            FieldKind::Int64 => Some(FieldValue::Int64(ctx.line_number())),
            _ => i32::try_from(ctx.line_number()).ok().map(FieldValue::Int32),
        }
    }
}
