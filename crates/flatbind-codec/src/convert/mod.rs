//! Value conversion between raw field text and typed values.
//!
//! Converters are the pluggable edge of the engine: a column resolves to at
//! most one converter when its schema is built, and falls back to the native
//! codec of its kind when none is registered.

mod boolean;
pub(crate) mod native;
mod numeric;
mod reference;
mod temporal;

pub use boolean::{BooleanConverter, DEFAULT_FALSE, DEFAULT_TRUE};
pub use numeric::{NumericConverter, NumericFormat};
pub use reference::{CodeConverter, MappingConverter};
pub use temporal::{DateTimeConverter, SpanConverter};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use flatbind_model::{FieldKind, FieldValue};
use tracing::trace;

use crate::error::{Result, SchemaError};

/// Bidirectional text codec for one family of field values.
///
/// Malformed input is a normal outcome on both directions: implementations
/// return `None` and never panic. The engine turns `None` into a
/// record-level diagnostic.
pub trait ValueConverter: Send + Sync {
    fn try_parse(&self, text: &str) -> Option<FieldValue>;
    fn try_format(&self, value: &FieldValue) -> Option<String>;
}

impl fmt::Debug for dyn ValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn ValueConverter")
    }
}

/// Converter lookup used while building schemas.
///
/// Holds explicitly keyed entries per (key, kind) and one optional default
/// per kind; the kind's canonical name is the conventional default key.
/// Resolution order for a column: explicit key, then the kind's default,
/// then the native codec. A missing explicit key, or a kind with neither a
/// default nor a native codec, is a configuration error.
#[derive(Default)]
pub struct ConverterRegistry {
    keyed: HashMap<(String, FieldKind), Arc<dyn ValueConverter>>,
    defaults: HashMap<FieldKind, Arc<dyn ValueConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        ConverterRegistry::default()
    }

    /// Registers a converter under an explicit key for one kind.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        kind: FieldKind,
        converter: Arc<dyn ValueConverter>,
    ) -> Result<()> {
        let key = key.into();
        if self.keyed.contains_key(&(key.clone(), kind)) {
            return Err(SchemaError::duplicate_converter(key, kind));
        }
        trace!(key = %key, kind = %kind, "registered converter");
        self.keyed.insert((key, kind), converter);
        Ok(())
    }

    /// Registers the default converter for a kind, replacing the native
    /// codec for columns without an explicit key.
    pub fn register_default(
        &mut self,
        kind: FieldKind,
        converter: Arc<dyn ValueConverter>,
    ) -> Result<()> {
        if self.defaults.contains_key(&kind) {
            return Err(SchemaError::duplicate_converter(kind.as_str(), kind));
        }
        trace!(kind = %kind, "registered default converter");
        self.defaults.insert(kind, converter);
        Ok(())
    }

    /// Resolves the converter for a column. `Ok(None)` selects the native
    /// codec; `field` only feeds the error text.
    pub fn resolve(
        &self,
        field: &str,
        kind: FieldKind,
        key: Option<&str>,
    ) -> Result<Option<Arc<dyn ValueConverter>>> {
        if let Some(key) = key {
            return match self.keyed.get(&(key.to_string(), kind)) {
                Some(converter) => Ok(Some(Arc::clone(converter))),
                None => Err(SchemaError::unknown_converter(key, kind, field)),
            };
        }
        if let Some(converter) = self.defaults.get(&kind) {
            return Ok(Some(Arc::clone(converter)));
        }
        if kind.has_native_codec() {
            return Ok(None);
        }
        Err(SchemaError::converter_required(field, kind))
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("keyed", &self.keyed.len())
            .field("defaults", &self.defaults.len())
            .finish()
    }
}
