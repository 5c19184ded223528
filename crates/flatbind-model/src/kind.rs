use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of primitive kinds a column can carry.
///
/// Converters and native codecs dispatch on the kind rather than on runtime
/// type tags; the kind's canonical name (`as_str`) doubles as the implicit
/// default-converter key in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Text,
    Date,
    DateTime,
    Span,
    Reference,
}

impl FieldKind {
    /// Returns true for the kinds the numeric converter may target.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldKind::Int16
                | FieldKind::Int32
                | FieldKind::Int64
                | FieldKind::Float32
                | FieldKind::Float64
                | FieldKind::Decimal
        )
    }

    /// Returns true for the integer kinds a line-number column may use.
    pub fn is_integer(&self) -> bool {
        matches!(self, FieldKind::Int32 | FieldKind::Int64)
    }

    /// Returns true for the temporal kinds the date/time converter may target.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldKind::Date | FieldKind::DateTime)
    }

    /// Whether the engine has a built-in fallback codec for this kind.
    ///
    /// `Reference` values only exist relative to an external reference-data
    /// source, so a reference column without a registered converter cannot
    /// work for any input and is rejected when the schema is built.
    pub fn has_native_codec(&self) -> bool {
        !matches!(self, FieldKind::Reference)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int16 => "int16",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Float32 => "float32",
            FieldKind::Float64 => "float64",
            FieldKind::Decimal => "decimal",
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Span => "span",
            FieldKind::Reference => "reference",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" => Ok(FieldKind::Bool),
            "int16" => Ok(FieldKind::Int16),
            "int32" => Ok(FieldKind::Int32),
            "int64" => Ok(FieldKind::Int64),
            "float32" => Ok(FieldKind::Float32),
            "float64" => Ok(FieldKind::Float64),
            "decimal" => Ok(FieldKind::Decimal),
            "text" => Ok(FieldKind::Text),
            "date" => Ok(FieldKind::Date),
            "datetime" => Ok(FieldKind::DateTime),
            "span" => Ok(FieldKind::Span),
            "reference" => Ok(FieldKind::Reference),
            _ => Err(format!("Unknown field kind: {s}")),
        }
    }
}
