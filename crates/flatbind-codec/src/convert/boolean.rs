use flatbind_model::FieldValue;

use crate::convert::ValueConverter;

/// Default truthy literals; the first entry is the canonical output.
pub const DEFAULT_TRUE: &[&str] = &["Y", "T", "1", "True", "Yes", "X"];
/// Default falsy literals. Empty text is falsy by default.
pub const DEFAULT_FALSE: &[&str] = &["N", "F", "0", "False", "No", ""];

/// Boolean codec over configurable literal lists.
///
/// Parsing matches the trimmed input against the true list, then the false
/// list (case-insensitively unless configured otherwise); anything else is a
/// parse failure. Formatting emits the first literal of the matching list.
#[derive(Debug, Clone)]
pub struct BooleanConverter {
    true_literals: Vec<String>,
    false_literals: Vec<String>,
    case_sensitive: bool,
}

impl BooleanConverter {
    pub fn new(
        true_literals: impl IntoIterator<Item = impl Into<String>>,
        false_literals: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        BooleanConverter {
            true_literals: true_literals.into_iter().map(Into::into).collect(),
            false_literals: false_literals.into_iter().map(Into::into).collect(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    fn matches(&self, text: &str, literals: &[String]) -> bool {
        literals.iter().any(|literal| {
            if self.case_sensitive {
                literal == text
            } else {
                literal.eq_ignore_ascii_case(text)
            }
        })
    }
}

impl Default for BooleanConverter {
    fn default() -> Self {
        BooleanConverter::new(DEFAULT_TRUE.iter().copied(), DEFAULT_FALSE.iter().copied())
    }
}

impl ValueConverter for BooleanConverter {
    fn try_parse(&self, text: &str) -> Option<FieldValue> {
        let text = text.trim();
        if self.matches(text, &self.true_literals) {
            return Some(FieldValue::Bool(true));
        }
        if self.matches(text, &self.false_literals) {
            return Some(FieldValue::Bool(false));
        }
        None
    }

    fn try_format(&self, value: &FieldValue) -> Option<String> {
        let literals = match value {
            FieldValue::Bool(true) => &self.true_literals,
            FieldValue::Bool(false) => &self.false_literals,
            _ => return None,
        };
        literals.first().cloned()
    }
}

/// Default-literal parse used by the native bool codec.
pub(crate) fn parse_default(text: &str) -> Option<bool> {
    let text = text.trim();
    if DEFAULT_TRUE.iter().any(|l| l.eq_ignore_ascii_case(text)) {
        return Some(true);
    }
    if DEFAULT_FALSE.iter().any(|l| l.eq_ignore_ascii_case(text)) {
        return Some(false);
    }
    None
}

pub(crate) fn format_default(value: bool) -> &'static str {
    if value { DEFAULT_TRUE[0] } else { DEFAULT_FALSE[0] }
}
