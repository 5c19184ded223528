//! Shared data model for the flat-record binding engine.
//!
//! Everything in this crate is plain data crossing the engine seam: field
//! kinds and values, column/hierarchy descriptors, per-record diagnostic
//! contexts, and the reference-data abstraction with an in-memory
//! implementation. The engine itself lives in `flatbind-codec`.

pub mod context;
pub mod descriptor;
pub mod kind;
pub mod message;
pub mod reference;
pub mod value;

pub use context::RecordContext;
pub use descriptor::{ColumnDescriptor, HierarchyDescriptor, WidthOverflow, order_rank};
pub use kind::FieldKind;
pub use message::{Message, Severity};
pub use reference::{CodeRegistry, CodeSet, ReferenceEntry, ReferenceSource};
pub use value::FieldValue;
