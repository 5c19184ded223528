//! Record schemas: ordered column and hierarchy bindings for one record type.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use flatbind_model::{
    ColumnDescriptor, FieldValue, HierarchyDescriptor, RecordContext, WidthOverflow, order_rank,
};
use tracing::debug;

use crate::column::ColumnBinding;
use crate::convert::{ConverterRegistry, native};
use crate::error::{Result, SchemaError};
use crate::hierarchy::{AttachFn, ChildSchema, HierarchyBinding, VisitFn, intrinsic_type_name};

type Constructor<R> = Arc<dyn Fn() -> R + Send + Sync>;
type Validator<R> = Arc<dyn Fn(&R, &mut RecordContext) + Send + Sync>;

/// Sealed, immutable binding set for one record type.
///
/// Built once via [`SchemaBuilder`], then safe to share behind an `Arc` and
/// use from any number of threads; there is no way back to the unsealed
/// state. Columns and children are held in resolved order.
pub struct RecordSchema<R> {
    name: String,
    constructor: Constructor<R>,
    columns: Vec<ColumnBinding<R>>,
    children: Vec<HierarchyBinding<R>>,
    child_index: HashMap<String, usize>,
    validator: Option<Validator<R>>,
}

impl<R: 'static> RecordSchema<R> {
    pub fn builder(
        name: impl Into<String>,
        constructor: impl Fn() -> R + Send + Sync + 'static,
    ) -> SchemaBuilder<R> {
        SchemaBuilder::new(name, constructor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blank record instance from the schema's constructor.
    pub fn new_record(&self) -> R {
        (self.constructor)()
    }

    pub fn columns(&self) -> &[ColumnBinding<R>] {
        &self.columns
    }

    pub fn children(&self) -> &[HierarchyBinding<R>] {
        &self.children
    }

    /// Index of the nested field registered for a record identifier.
    pub fn resolve_child(&self, identifier: &str) -> Option<usize> {
        self.child_index.get(identifier).copied()
    }

    /// Binds one line's fields into the record, column by column in resolved
    /// order. Missing trailing fields read as empty text and extra fields
    /// are ignored, so one pass accumulates every independent diagnostic.
    /// Ends with the semantic-validation hook via
    /// [`validate_record`](Self::validate_record).
    pub fn bind_columns(&self, record: &mut R, fields: &[&str], ctx: &mut RecordContext) {
        for (index, column) in self.columns.iter().enumerate() {
            let raw = fields.get(index).copied().unwrap_or("");
            column.set_value(record, raw, ctx);
        }
        self.validate_record(record, ctx);
    }

    /// Formats the record's columns back to field text in resolved order.
    pub fn format_columns(&self, record: &R, ctx: &mut RecordContext) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.get_value(record, ctx))
            .collect()
    }

    /// Runs the semantic validator, but only on a record with no errors so
    /// far; cross-field rules never see half-bound state.
    /// [`bind_columns`](Self::bind_columns) calls this automatically; hosts
    /// that assemble nested records across several lines can invoke it again
    /// after attaching children.
    pub fn validate_record(&self, record: &R, ctx: &mut RecordContext) {
        if ctx.has_errors() {
            return;
        }
        if let Some(validator) = &self.validator {
            validator(record, ctx);
        }
    }
}

impl<R> fmt::Debug for RecordSchema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("columns", &self.columns.len())
            .field("children", &self.children.len())
            .finish()
    }
}

impl<R: 'static> ChildSchema for RecordSchema<R> {
    fn schema_name(&self) -> &str {
        &self.name
    }

    fn item_type(&self) -> TypeId {
        TypeId::of::<R>()
    }

    fn item_type_name(&self) -> &'static str {
        type_name::<R>()
    }

    fn new_boxed(&self) -> Box<dyn Any> {
        Box::new(self.new_record())
    }

    fn bind_boxed(
        &self,
        item: &mut dyn Any,
        fields: &[&str],
        ctx: &mut RecordContext,
    ) -> Result<()> {
        let record = item
            .downcast_mut::<R>()
            .ok_or_else(|| SchemaError::item_type_mismatch(self.name.clone(), type_name::<R>()))?;
        self.bind_columns(record, fields, ctx);
        Ok(())
    }

    fn format_boxed(&self, item: &dyn Any, ctx: &mut RecordContext) -> Result<Vec<String>> {
        let record = item
            .downcast_ref::<R>()
            .ok_or_else(|| SchemaError::item_type_mismatch(self.name.clone(), type_name::<R>()))?;
        Ok(self.format_columns(record, ctx))
    }
}

struct PendingColumn<R> {
    descriptor: ColumnDescriptor,
    get: Box<dyn Fn(&R) -> Option<FieldValue> + Send + Sync>,
    set: Box<dyn Fn(&mut R, FieldValue) + Send + Sync>,
}

struct PendingChild<R> {
    descriptor: HierarchyDescriptor,
    schema: Arc<dyn ChildSchema>,
    attach: AttachFn<R>,
    visit: VisitFn<R>,
}

/// Unsealed collector for one record type's bindings.
///
/// Registration order is the declaration sequence; explicit orders override
/// it when the schema is built. All configuration validation happens in
/// [`build`](Self::build).
pub struct SchemaBuilder<R> {
    name: String,
    constructor: Constructor<R>,
    default_overflow: WidthOverflow,
    columns: Vec<PendingColumn<R>>,
    children: Vec<PendingChild<R>>,
    validator: Option<Validator<R>>,
}

impl<R: 'static> SchemaBuilder<R> {
    pub fn new(
        name: impl Into<String>,
        constructor: impl Fn() -> R + Send + Sync + 'static,
    ) -> Self {
        SchemaBuilder {
            name: name.into(),
            constructor: Arc::new(constructor),
            default_overflow: WidthOverflow::Fail,
            columns: Vec::new(),
            children: Vec::new(),
            validator: None,
        }
    }

    /// Schema-wide overflow policy for columns without their own. Starts as
    /// [`WidthOverflow::Fail`].
    pub fn default_overflow(mut self, overflow: WidthOverflow) -> Self {
        self.default_overflow = overflow;
        self
    }

    /// Registers a column with its accessor closures.
    pub fn column(
        mut self,
        descriptor: ColumnDescriptor,
        get: impl Fn(&R) -> Option<FieldValue> + Send + Sync + 'static,
        set: impl Fn(&mut R, FieldValue) + Send + Sync + 'static,
    ) -> Self {
        self.columns.push(PendingColumn {
            descriptor,
            get: Box::new(get),
            set: Box::new(set),
        });
        self
    }

    /// Registers a nested-record field bound to a sealed child schema.
    ///
    /// `attach` stores a batch of parsed items on the parent (a singular
    /// field takes the first); `items` yields the parent's current items for
    /// the write side.
    pub fn child<C: 'static>(
        mut self,
        descriptor: HierarchyDescriptor,
        schema: Arc<RecordSchema<C>>,
        attach: impl Fn(&mut R, Vec<C>) + Send + Sync + 'static,
        items: impl for<'a> Fn(&'a R) -> Vec<&'a C> + Send + Sync + 'static,
    ) -> Self {
        let field = descriptor.name.clone();
        let attach: AttachFn<R> = Box::new(move |parent, boxed| {
            let mut typed = Vec::with_capacity(boxed.len());
            for item in boxed {
                match item.downcast::<C>() {
                    Ok(item) => typed.push(*item),
                    Err(_) => {
                        return Err(SchemaError::item_type_mismatch(
                            field.clone(),
                            type_name::<C>(),
                        ));
                    }
                }
            }
            attach(parent, typed);
            Ok(())
        });
        let visit: VisitFn<R> = Box::new(move |parent, visitor| {
            for item in items(parent) {
                visitor(item);
            }
        });
        self.children.push(PendingChild {
            descriptor,
            schema,
            attach,
            visit,
        });
        self
    }

    /// Attaches the optional semantic-validation hook.
    pub fn validate_with(
        mut self,
        validator: impl Fn(&R, &mut RecordContext) + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Validates the configuration, resolves converters, orders the
    /// bindings, and seals the schema.
    pub fn build(self, registry: &ConverterRegistry) -> Result<RecordSchema<R>> {
        let SchemaBuilder {
            name,
            constructor,
            default_overflow,
            columns,
            children,
            validator,
        } = self;

        let mut ranked_columns = Vec::with_capacity(columns.len());
        for (sequence, pending) in columns.into_iter().enumerate() {
            let descriptor = pending.descriptor;
            if descriptor.line_number && !descriptor.kind.is_integer() {
                return Err(SchemaError::line_number_kind(
                    descriptor.name,
                    descriptor.kind,
                ));
            }
            if let Some(write_format) = descriptor.write_format.as_deref()
                && !native::write_format_ok(descriptor.kind, write_format)
            {
                return Err(SchemaError::bad_write_format(
                    descriptor.name.clone(),
                    write_format,
                    descriptor.kind,
                ));
            }
            let converter = registry.resolve(
                &descriptor.name,
                descriptor.kind,
                descriptor.converter.as_deref(),
            )?;
            let overflow = descriptor.overflow.unwrap_or(default_overflow);
            let rank = order_rank(descriptor.order);
            ranked_columns.push((
                rank,
                sequence,
                ColumnBinding::new(descriptor, overflow, converter, pending.get, pending.set),
            ));
        }
        ranked_columns.sort_by_key(|(rank, sequence, _)| (*rank, *sequence));
        let columns: Vec<ColumnBinding<R>> = ranked_columns
            .into_iter()
            .map(|(_, _, binding)| binding)
            .collect();

        let mut ranked_children = Vec::with_capacity(children.len());
        for (sequence, pending) in children.into_iter().enumerate() {
            if let Some(type_name) = intrinsic_type_name(pending.schema.item_type()) {
                return Err(SchemaError::primitive_child(
                    pending.descriptor.name,
                    type_name,
                ));
            }
            let rank = order_rank(pending.descriptor.order);
            ranked_children.push((
                rank,
                sequence,
                HierarchyBinding::new(
                    pending.descriptor,
                    name.clone(),
                    pending.schema,
                    pending.attach,
                    pending.visit,
                ),
            ));
        }
        ranked_children.sort_by_key(|(rank, sequence, _)| (*rank, *sequence));
        let children: Vec<HierarchyBinding<R>> = ranked_children
            .into_iter()
            .map(|(_, _, binding)| binding)
            .collect();

        let mut child_index = HashMap::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            if child_index
                .insert(child.identifier().to_string(), index)
                .is_some()
            {
                return Err(SchemaError::duplicate_identifier(name, child.identifier()));
            }
        }

        debug!(
            schema = %name,
            columns = columns.len(),
            children = children.len(),
            "sealed record schema"
        );
        Ok(RecordSchema {
            name,
            constructor,
            columns,
            children,
            child_index,
            validator,
        })
    }
}
