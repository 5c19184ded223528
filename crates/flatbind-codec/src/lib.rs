//! Schema-driven binding and conversion engine for flat text records.
//!
//! This crate binds structured record types to fixed or delimited column
//! layouts and converts bidirectionally between raw field text and typed
//! values. Configuration problems (bad converters, duplicate identifiers)
//! fail hard when a schema is built; per-record problems never do — they
//! accumulate as messages on a [`RecordContext`](flatbind_model::RecordContext)
//! while the rest of the record keeps binding.
//!
//! # Example
//!
//! ```
//! use flatbind_codec::{ConverterRegistry, RecordSchema};
//! use flatbind_model::{ColumnDescriptor, FieldKind, FieldValue, RecordContext};
//!
//! #[derive(Default)]
//! struct Order {
//!     number: Option<String>,
//!     quantity: Option<i32>,
//! }
//!
//! let registry = ConverterRegistry::new();
//! let schema = RecordSchema::builder("order", Order::default)
//!     .column(
//!         ColumnDescriptor::new("NUMBER", FieldKind::Text).mandatory(),
//!         |order: &Order| order.number.clone().map(FieldValue::Text),
//!         |order: &mut Order, value| {
//!             if let FieldValue::Text(text) = value {
//!                 order.number = Some(text);
//!             }
//!         },
//!     )
//!     .column(
//!         ColumnDescriptor::new("QTY", FieldKind::Int32),
//!         |order: &Order| order.quantity.map(FieldValue::Int32),
//!         |order: &mut Order, value| {
//!             if let FieldValue::Int32(quantity) = value {
//!                 order.quantity = Some(quantity);
//!             }
//!         },
//!     )
//!     .build(&registry)
//!     .expect("valid schema");
//!
//! let mut order = schema.new_record();
//! let mut ctx = RecordContext::at_line(1);
//! schema.bind_columns(&mut order, &["A-1001", "3"], &mut ctx);
//! assert!(ctx.messages().is_empty());
//! assert_eq!(order.quantity, Some(3));
//!
//! let fields = schema.format_columns(&order, &mut ctx);
//! assert_eq!(fields, vec!["A-1001".to_string(), "3".to_string()]);
//! ```

pub mod column;
pub mod convert;
mod error;
pub mod hierarchy;
pub mod schema;

// Re-export error types
pub use error::{Result, SchemaError};

// Re-export the engine surface
pub use column::ColumnBinding;
pub use convert::{
    BooleanConverter, CodeConverter, ConverterRegistry, DateTimeConverter, MappingConverter,
    NumericConverter, NumericFormat, SpanConverter, ValueConverter,
};
pub use hierarchy::{ChildSchema, HierarchyBinding};
pub use schema::{RecordSchema, SchemaBuilder};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
