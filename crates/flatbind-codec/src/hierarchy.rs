//! Nested-record bindings: routing identified lines into child record types.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use flatbind_model::{HierarchyDescriptor, Message, RecordContext};

use crate::error::Result;

/// Type-erased view of a sealed nested-record schema.
///
/// The parent schema stores children behind this trait so one parent can mix
/// nested record types. Items travel as `Box<dyn Any>` between the reader
/// loop and the typed attach closure.
pub trait ChildSchema: Send + Sync {
    fn schema_name(&self) -> &str;
    fn item_type(&self) -> TypeId;
    fn item_type_name(&self) -> &'static str;
    fn new_boxed(&self) -> Box<dyn Any>;
    fn bind_boxed(
        &self,
        item: &mut dyn Any,
        fields: &[&str],
        ctx: &mut RecordContext,
    ) -> Result<()>;
    fn format_boxed(&self, item: &dyn Any, ctx: &mut RecordContext) -> Result<Vec<String>>;
}

pub(crate) type AttachFn<R> = Box<dyn Fn(&mut R, Vec<Box<dyn Any>>) -> Result<()> + Send + Sync>;
pub(crate) type VisitFn<R> = Box<dyn for<'a> Fn(&'a R, &mut dyn FnMut(&dyn Any)) + Send + Sync>;

/// One nested-record field of a sealed parent schema.
///
/// Identified input lines are bound through [`new_item`](Self::new_item) and
/// [`bind_item`](Self::bind_item), then handed back as a batch via
/// [`set_value`](Self::set_value); the typed attach closure decides how the
/// parent stores them (single field or collection). The write side walks the
/// parent's items with [`for_each_item`](Self::for_each_item).
pub struct HierarchyBinding<R> {
    descriptor: HierarchyDescriptor,
    parent: String,
    schema: Arc<dyn ChildSchema>,
    attach: AttachFn<R>,
    visit: VisitFn<R>,
    display: OnceLock<String>,
}

impl<R> HierarchyBinding<R> {
    pub(crate) fn new(
        descriptor: HierarchyDescriptor,
        parent: String,
        schema: Arc<dyn ChildSchema>,
        attach: AttachFn<R>,
        visit: VisitFn<R>,
    ) -> Self {
        HierarchyBinding {
            descriptor,
            parent,
            schema,
            attach,
            visit,
            display: OnceLock::new(),
        }
    }

    pub fn descriptor(&self) -> &HierarchyDescriptor {
        &self.descriptor
    }

    pub fn identifier(&self) -> &str {
        &self.descriptor.identifier
    }

    pub fn is_collection(&self) -> bool {
        self.descriptor.collection
    }

    pub fn schema(&self) -> &dyn ChildSchema {
        self.schema.as_ref()
    }

    pub fn display_text(&self) -> &str {
        self.display.get_or_init(|| {
            format!(
                "{}.{} [{}]",
                self.parent,
                self.descriptor.display_name(),
                self.descriptor.identifier
            )
        })
    }

    /// Blank nested item, ready for [`bind_item`](Self::bind_item).
    pub fn new_item(&self) -> Box<dyn Any> {
        self.schema.new_boxed()
    }

    pub fn bind_item(
        &self,
        item: &mut dyn Any,
        fields: &[&str],
        ctx: &mut RecordContext,
    ) -> Result<()> {
        self.schema.bind_boxed(item, fields, ctx)
    }

    pub fn format_item(&self, item: &dyn Any, ctx: &mut RecordContext) -> Result<Vec<String>> {
        self.schema.format_boxed(item, ctx)
    }

    /// Attaches the accumulated items to the parent. Singular fields take
    /// the first item; the typed closure owns that decision.
    pub fn set_value(&self, parent: &mut R, items: Vec<Box<dyn Any>>) -> Result<()> {
        (self.attach)(parent, items)
    }

    pub fn for_each_item(&self, parent: &R, visitor: &mut dyn FnMut(&dyn Any)) {
        (self.visit)(parent, visitor);
    }

    pub fn report_error(&self, ctx: &mut RecordContext, text: impl Into<String>) {
        ctx.push(Message::error(self.display_text(), text));
    }

    pub fn report_warning(&self, ctx: &mut RecordContext, text: impl Into<String>) {
        ctx.push(Message::warning(self.display_text(), text));
    }
}

/// Names the type when it is one of the intrinsic kinds a nested field must
/// not target.
pub(crate) fn intrinsic_type_name(id: TypeId) -> Option<&'static str> {
    macro_rules! check {
        ($($ty:ty),* $(,)?) => {
            $(
                if id == TypeId::of::<$ty>() {
                    return Some(std::any::type_name::<$ty>());
                }
            )*
        };
    }
    check!(
        bool,
        i8,
        i16,
        i32,
        i64,
        i128,
        isize,
        u8,
        u16,
        u32,
        u64,
        u128,
        usize,
        f32,
        f64,
        char,
        String,
        &'static str,
        chrono::NaiveDate,
        chrono::NaiveDateTime,
        chrono::Duration,
        rust_decimal::Decimal,
    );
    None
}
