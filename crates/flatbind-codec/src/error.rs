//! Configuration errors raised while assembling converters and schemas.
//!
//! These are hard failures: each one means the schema cannot work for any
//! input. Per-record problems (unparseable text, missing mandatory values)
//! are not errors in this sense; bindings append them to the
//! [`RecordContext`](flatbind_model::RecordContext) as messages and return
//! normally.

use flatbind_model::FieldKind;
use thiserror::Error;

/// Errors that can occur when building a converter registry or record schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A converter is already registered under this key and kind.
    #[error("a converter is already registered under key '{key}' for kind {kind}")]
    DuplicateConverter { key: String, kind: FieldKind },

    /// A column names a converter key with no matching registration.
    #[error("no converter registered under key '{key}' for kind {kind} (field '{field}')")]
    UnknownConverter {
        key: String,
        kind: FieldKind,
        field: String,
    },

    /// The kind has no native codec and nothing is registered for it.
    #[error("field '{field}' has kind {kind}, which requires a registered converter")]
    ConverterRequired { field: String, kind: FieldKind },

    /// A built-in converter was constructed for a kind it cannot handle.
    #[error("the {converter} converter cannot target kind {kind}")]
    UnsupportedKind {
        converter: &'static str,
        kind: FieldKind,
    },

    /// Unparseable numeric mini-format string.
    #[error("invalid numeric format '{format}'")]
    InvalidNumericFormat { format: String },

    /// Date/time pattern chrono cannot render.
    #[error("invalid date/time format '{format}' for kind {kind}")]
    InvalidTemporalFormat { format: String, kind: FieldKind },

    /// Two nested fields of one record share a record identifier.
    #[error("record '{schema}' declares duplicate record identifier '{identifier}'")]
    DuplicateIdentifier { schema: String, identifier: String },

    /// A nested field targets a primitive type instead of a record type.
    #[error("nested field '{field}' must target a record type, not primitive {type_name}")]
    PrimitiveChild {
        field: String,
        type_name: &'static str,
    },

    /// The reference set does not expose the requested mapping.
    #[error("reference set '{set}' does not expose mapping '{mapping}'")]
    MissingMapping { set: String, mapping: String },

    /// Line-number columns must carry a 32- or 64-bit integer.
    #[error("line-number field '{field}' must be a 32- or 64-bit integer, got {kind}")]
    LineNumberKind { field: String, kind: FieldKind },

    /// Write-format string the column kind cannot render.
    #[error("field '{field}' has write format '{format}', which kind {kind} cannot render")]
    BadWriteFormat {
        field: String,
        format: String,
        kind: FieldKind,
    },

    /// A boxed nested item did not downcast to the expected record type.
    #[error("'{field}' was given an item that is not a {expected}")]
    ItemTypeMismatch {
        field: String,
        expected: &'static str,
    },
}

/// Result type alias for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;

impl SchemaError {
    /// Create a DuplicateConverter error.
    pub fn duplicate_converter(key: impl Into<String>, kind: FieldKind) -> Self {
        Self::DuplicateConverter {
            key: key.into(),
            kind,
        }
    }

    /// Create an UnknownConverter error.
    pub fn unknown_converter(
        key: impl Into<String>,
        kind: FieldKind,
        field: impl Into<String>,
    ) -> Self {
        Self::UnknownConverter {
            key: key.into(),
            kind,
            field: field.into(),
        }
    }

    /// Create a ConverterRequired error.
    pub fn converter_required(field: impl Into<String>, kind: FieldKind) -> Self {
        Self::ConverterRequired {
            field: field.into(),
            kind,
        }
    }

    /// Create an UnsupportedKind error.
    pub fn unsupported_kind(converter: &'static str, kind: FieldKind) -> Self {
        Self::UnsupportedKind { converter, kind }
    }

    /// Create an InvalidNumericFormat error.
    pub fn invalid_numeric_format(format: impl Into<String>) -> Self {
        Self::InvalidNumericFormat {
            format: format.into(),
        }
    }

    /// Create an InvalidTemporalFormat error.
    pub fn invalid_temporal_format(format: impl Into<String>, kind: FieldKind) -> Self {
        Self::InvalidTemporalFormat {
            format: format.into(),
            kind,
        }
    }

    /// Create a DuplicateIdentifier error.
    pub fn duplicate_identifier(schema: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            schema: schema.into(),
            identifier: identifier.into(),
        }
    }

    /// Create a PrimitiveChild error.
    pub fn primitive_child(field: impl Into<String>, type_name: &'static str) -> Self {
        Self::PrimitiveChild {
            field: field.into(),
            type_name,
        }
    }

    /// Create a MissingMapping error.
    pub fn missing_mapping(set: impl Into<String>, mapping: impl Into<String>) -> Self {
        Self::MissingMapping {
            set: set.into(),
            mapping: mapping.into(),
        }
    }

    /// Create a LineNumberKind error.
    pub fn line_number_kind(field: impl Into<String>, kind: FieldKind) -> Self {
        Self::LineNumberKind {
            field: field.into(),
            kind,
        }
    }

    /// Create a BadWriteFormat error.
    pub fn bad_write_format(
        field: impl Into<String>,
        format: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self::BadWriteFormat {
            field: field.into(),
            format: format.into(),
            kind,
        }
    }

    /// Create an ItemTypeMismatch error.
    pub fn item_type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self::ItemTypeMismatch {
            field: field.into(),
            expected,
        }
    }
}
