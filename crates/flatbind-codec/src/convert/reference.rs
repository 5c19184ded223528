use std::fmt;
use std::sync::Arc;

use flatbind_model::{FieldValue, ReferenceSource};

use crate::convert::ValueConverter;
use crate::error::{Result, SchemaError};

/// Resolves field text as the canonical code of one reference set.
///
/// Parsing requires the code to resolve to an entry the source considers
/// valid; formatting emits the canonical code under the same condition.
#[derive(Clone)]
pub struct CodeConverter {
    source: Arc<dyn ReferenceSource>,
    set: String,
}

impl CodeConverter {
    pub fn new(source: Arc<dyn ReferenceSource>, set: impl Into<String>) -> Self {
        CodeConverter {
            source,
            set: set.into(),
        }
    }

    pub fn set(&self) -> &str {
        &self.set
    }
}

impl ValueConverter for CodeConverter {
    fn try_parse(&self, text: &str) -> Option<FieldValue> {
        self.source
            .by_code(&self.set, text)
            .filter(|entry| self.source.is_valid(entry))
            .map(FieldValue::Reference)
    }

    fn try_format(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Reference(entry)
                if entry.set.eq_ignore_ascii_case(&self.set) && self.source.is_valid(entry) =>
            {
                Some(entry.code.clone())
            }
            _ => None,
        }
    }
}

/// Resolves field text through a named external mapping of a reference set
/// (e.g., an ISO alpha-2 column backed by a country set).
///
/// Construction verifies the set exposes the mapping; a missing mapping is a
/// configuration error, not a per-record parse failure.
#[derive(Clone)]
pub struct MappingConverter {
    source: Arc<dyn ReferenceSource>,
    set: String,
    mapping: String,
}

impl MappingConverter {
    pub fn new(
        source: Arc<dyn ReferenceSource>,
        set: impl Into<String>,
        mapping: impl Into<String>,
    ) -> Result<Self> {
        let set = set.into();
        let mapping = mapping.into();
        if !source.has_mapping(&set, &mapping) {
            return Err(SchemaError::missing_mapping(set, mapping));
        }
        Ok(MappingConverter {
            source,
            set,
            mapping,
        })
    }
}

impl fmt::Debug for MappingConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingConverter")
            .field("set", &self.set)
            .field("mapping", &self.mapping)
            .finish()
    }
}

impl ValueConverter for MappingConverter {
    fn try_parse(&self, text: &str) -> Option<FieldValue> {
        self.source
            .by_mapping(&self.set, &self.mapping, text)
            .filter(|entry| self.source.is_valid(entry))
            .map(FieldValue::Reference)
    }

    fn try_format(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Reference(entry)
                if entry.set.eq_ignore_ascii_case(&self.set) && self.source.is_valid(entry) =>
            {
                entry.mapping(&self.mapping).map(str::to_string)
            }
            _ => None,
        }
    }
}
