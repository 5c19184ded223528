use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of a named reference set (a code table row).
///
/// `mappings` carries the entry's values in external coding systems, keyed
/// by mapping name (e.g., an `"iso2"` mapping of a country set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Name of the reference set this entry belongs to (e.g., "COUNTRY").
    pub set: String,
    /// Canonical code within the set.
    pub code: String,
    pub label: Option<String>,
    /// Inactive entries are kept for historic data but fail validity checks.
    pub active: bool,
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl ReferenceEntry {
    pub fn new(set: impl Into<String>, code: impl Into<String>) -> Self {
        ReferenceEntry {
            set: set.into(),
            code: code.into(),
            label: None,
            active: true,
            mappings: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_mapping(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.mappings.insert(name.into(), value.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn mapping(&self, name: &str) -> Option<&str> {
        self.mappings.get(name).map(String::as_str)
    }
}

/// Reference-data service consumed by the reference converters.
///
/// Lookups are tolerant (`None` for unknown codes); only
/// [`has_mapping`](ReferenceSource::has_mapping) participates in
/// configuration-time validation.
pub trait ReferenceSource: Send + Sync {
    /// Resolves an entry by its canonical code (case-insensitive).
    fn by_code(&self, set: &str, code: &str) -> Option<ReferenceEntry>;

    /// Resolves an entry by the value it carries under a named mapping
    /// (mapping names are exact, mapping values case-insensitive).
    fn by_mapping(&self, set: &str, mapping: &str, value: &str) -> Option<ReferenceEntry>;

    /// Whether any entry of the set exposes the named mapping.
    fn has_mapping(&self, set: &str, mapping: &str) -> bool;

    /// Business validity of a resolved entry.
    fn is_valid(&self, entry: &ReferenceEntry) -> bool {
        entry.active
    }
}

/// In-memory [`ReferenceSource`] backed by per-set lookup tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeRegistry {
    sets: BTreeMap<String, CodeSet>,
}

/// One reference set with its code and mapping-value indexes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeSet {
    by_code: BTreeMap<String, ReferenceEntry>,
    /// mapping name -> uppercased mapping value -> code key
    by_mapping: BTreeMap<String, BTreeMap<String, String>>,
}

impl CodeSet {
    pub fn entries(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.by_code.values()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl CodeRegistry {
    pub fn new() -> Self {
        CodeRegistry::default()
    }

    /// Adds an entry, replacing any previous entry with the same code.
    pub fn insert(&mut self, entry: ReferenceEntry) {
        let set_key = entry.set.trim().to_uppercase();
        let code_key = entry.code.trim().to_uppercase();
        let set = self.sets.entry(set_key).or_default();
        for (name, value) in &entry.mappings {
            set.by_mapping
                .entry(name.clone())
                .or_default()
                .insert(value.trim().to_uppercase(), code_key.clone());
        }
        set.by_code.insert(code_key, entry);
    }

    pub fn set(&self, name: &str) -> Option<&CodeSet> {
        self.sets.get(&name.trim().to_uppercase())
    }
}

impl ReferenceSource for CodeRegistry {
    fn by_code(&self, set: &str, code: &str) -> Option<ReferenceEntry> {
        let code_key = code.trim().to_uppercase();
        if code_key.is_empty() {
            return None;
        }
        self.set(set)?.by_code.get(&code_key).cloned()
    }

    fn by_mapping(&self, set: &str, mapping: &str, value: &str) -> Option<ReferenceEntry> {
        let value_key = value.trim().to_uppercase();
        if value_key.is_empty() {
            return None;
        }
        let set = self.set(set)?;
        let code_key = set.by_mapping.get(mapping)?.get(&value_key)?;
        set.by_code.get(code_key).cloned()
    }

    fn has_mapping(&self, set: &str, mapping: &str) -> bool {
        self.set(set)
            .is_some_and(|s| s.by_mapping.contains_key(mapping))
    }
}
