use crate::message::{Message, Severity};
use serde::{Deserialize, Serialize};

/// Mutable companion of a single record while it is parsed or written.
///
/// The reader or writer that drives the engine owns one context per record
/// (or reuses one across records, draining the messages in between) and
/// passes it `&mut` into every binding call. Bindings append diagnostics and
/// read the current physical line number; they never abort the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordContext {
    line_number: i64,
    messages: Vec<Message>,
}

impl RecordContext {
    pub fn new() -> Self {
        RecordContext::default()
    }

    pub fn at_line(line_number: i64) -> Self {
        RecordContext {
            line_number,
            messages: Vec::new(),
        }
    }

    pub fn line_number(&self) -> i64 {
        self.line_number
    }

    pub fn set_line_number(&mut self, line_number: i64) {
        self.line_number = line_number;
    }

    /// Moves to the next physical line. Called by the reader, not the engine.
    pub fn advance_line(&mut self) {
        self.line_number += 1;
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Takes all accumulated messages, leaving the context empty for reuse.
    pub fn drain_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut ctx = RecordContext::at_line(3);
        ctx.push(Message::error("A", "A is required."));
        ctx.push(Message::warning("B", "B was truncated."));
        ctx.push(Message::info("C", "C defaulted."));
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.warning_count(), 1);
        assert!(ctx.has_errors());
        assert_eq!(ctx.line_number(), 3);
    }

    #[test]
    fn drain_leaves_context_reusable() {
        let mut ctx = RecordContext::new();
        ctx.push(Message::error("A", "bad"));
        let drained = ctx.drain_messages();
        assert_eq!(drained.len(), 1);
        assert!(ctx.messages().is_empty());
        assert!(!ctx.has_errors());
    }

    #[test]
    fn advance_line_increments() {
        let mut ctx = RecordContext::new();
        ctx.advance_line();
        ctx.advance_line();
        assert_eq!(ctx.line_number(), 2);
        ctx.set_line_number(10);
        assert_eq!(ctx.line_number(), 10);
    }
}
