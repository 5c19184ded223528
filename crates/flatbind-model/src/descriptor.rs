use crate::kind::FieldKind;
use serde::{Deserialize, Serialize};

/// What to do when a field's text exceeds the configured width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthOverflow {
    /// Report an error and leave the field untouched.
    Fail,
    /// Truncate to the width and report a warning.
    Truncate,
}

/// Static description of one flat-file column.
///
/// Descriptors are plain data: the host builds them (by hand or from a
/// persisted layout) and hands them to a schema builder together with the
/// accessor closures for the record field they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Display name for diagnostics; falls back to `name`.
    pub label: Option<String>,
    pub kind: FieldKind,
    /// Explicit position. Absent or negative means unspecified; unspecified
    /// columns sort after all explicit ones, in declaration order.
    #[serde(default)]
    pub order: Option<i32>,
    /// Maximum field width in characters.
    #[serde(default)]
    pub width: Option<usize>,
    /// Overrides the schema-wide overflow policy for this column.
    #[serde(default)]
    pub overflow: Option<WidthOverflow>,
    #[serde(default)]
    pub mandatory: bool,
    /// Nullable fields skip conversion on empty input instead of erroring.
    #[serde(default)]
    pub nullable: bool,
    /// Explicit converter key; absent means default-then-native resolution.
    #[serde(default)]
    pub converter: Option<String>,
    /// Column mirrors the physical line number instead of record state.
    #[serde(default)]
    pub line_number: bool,
    /// Output format override; forces the native formatter on writes.
    #[serde(default)]
    pub write_format: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        ColumnDescriptor {
            name: name.into(),
            label: None,
            kind,
            order: None,
            width: None,
            overflow: None,
            mandatory: false,
            nullable: false,
            converter: None,
            line_number: false,
            write_format: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_overflow(mut self, overflow: WidthOverflow) -> Self {
        self.overflow = Some(overflow);
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_converter(mut self, key: impl Into<String>) -> Self {
        self.converter = Some(key.into());
        self
    }

    pub fn as_line_number(mut self) -> Self {
        self.line_number = true;
        self
    }

    pub fn with_write_format(mut self, format: impl Into<String>) -> Self {
        self.write_format = Some(format.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Static description of one nested-record field of a parent record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDescriptor {
    pub name: String,
    pub label: Option<String>,
    /// Record identifier that routes an input line to this nested type.
    /// Unique among the siblings of one parent schema.
    pub identifier: String,
    /// Same ordering rule as columns.
    #[serde(default)]
    pub order: Option<i32>,
    /// Whether the parent field holds a sequence of items or a single one.
    #[serde(default)]
    pub collection: bool,
}

impl HierarchyDescriptor {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        HierarchyDescriptor {
            name: name.into(),
            label: None,
            identifier: identifier.into(),
            order: None,
            collection: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn as_collection(mut self) -> Self {
        self.collection = true;
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Sort rank shared by columns and hierarchies: explicit non-negative orders
/// first (ascending), everything else after them. Ties are broken by the
/// caller using declaration sequence.
pub fn order_rank(order: Option<i32>) -> (u8, i32) {
    match order {
        Some(n) if n >= 0 => (0, n),
        _ => (1, 0),
    }
}
