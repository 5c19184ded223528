//! Hierarchical routing tests: identified lines dispatched into nested
//! record types, plus the semantic-validator gate.

use std::any::Any;
use std::sync::Arc;

use flatbind_codec::{ConverterRegistry, RecordSchema, SchemaError};
use flatbind_model::{
    ColumnDescriptor, FieldKind, FieldValue, HierarchyDescriptor, Message, RecordContext,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Order {
    number: Option<String>,
    items: Vec<OrderItem>,
    delivery: Option<Delivery>,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderItem {
    sku: Option<String>,
    quantity: Option<i32>,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Delivery {
    carrier: Option<String>,
}

fn item_schema(registry: &ConverterRegistry) -> Arc<RecordSchema<OrderItem>> {
    Arc::new(
        RecordSchema::builder("item", OrderItem::default)
            .column(
                ColumnDescriptor::new("SKU", FieldKind::Text).mandatory(),
                |item: &OrderItem| item.sku.clone().map(FieldValue::Text),
                |item: &mut OrderItem, value| {
                    if let FieldValue::Text(sku) = value {
                        item.sku = Some(sku);
                    }
                },
            )
            .column(
                ColumnDescriptor::new("QTY", FieldKind::Int32),
                |item: &OrderItem| item.quantity.map(FieldValue::Int32),
                |item: &mut OrderItem, value| {
                    if let FieldValue::Int32(quantity) = value {
                        item.quantity = Some(quantity);
                    }
                },
            )
            .build(registry)
            .expect("item schema"),
    )
}

fn delivery_schema(registry: &ConverterRegistry) -> Arc<RecordSchema<Delivery>> {
    Arc::new(
        RecordSchema::builder("delivery", Delivery::default)
            .column(
                ColumnDescriptor::new("CARRIER", FieldKind::Text),
                |delivery: &Delivery| delivery.carrier.clone().map(FieldValue::Text),
                |delivery: &mut Delivery, value| {
                    if let FieldValue::Text(carrier) = value {
                        delivery.carrier = Some(carrier);
                    }
                },
            )
            .build(registry)
            .expect("delivery schema"),
    )
}

/// Order header with an "I" item collection and a singular "D" delivery.
fn order_schema(registry: &ConverterRegistry) -> RecordSchema<Order> {
    RecordSchema::builder("order", Order::default)
        .column(
            ColumnDescriptor::new("NUMBER", FieldKind::Text).mandatory(),
            |order: &Order| order.number.clone().map(FieldValue::Text),
            |order: &mut Order, value| {
                if let FieldValue::Text(number) = value {
                    order.number = Some(number);
                }
            },
        )
        .child(
            HierarchyDescriptor::new("Items", "I").as_collection(),
            item_schema(registry),
            |order: &mut Order, items| order.items = items,
            |order: &Order| order.items.iter().collect(),
        )
        .child(
            HierarchyDescriptor::new("Delivery", "D"),
            delivery_schema(registry),
            |order: &mut Order, deliveries: Vec<Delivery>| {
                order.delivery = deliveries.into_iter().next();
            },
            |order: &Order| order.delivery.iter().collect(),
        )
        .build(registry)
        .expect("order schema")
}

#[test]
fn resolve_child_maps_each_identifier_to_its_own_slot() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);

    let items = schema.resolve_child("I").expect("item slot");
    let delivery = schema.resolve_child("D").expect("delivery slot");
    assert_ne!(items, delivery);
    assert_eq!(schema.resolve_child("X"), None);

    assert_eq!(schema.children()[items].identifier(), "I");
    assert!(schema.children()[items].is_collection());
    assert_eq!(schema.children()[delivery].identifier(), "D");
    assert!(!schema.children()[delivery].is_collection());
}

#[test]
fn routes_identified_lines_into_child_records() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);
    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(1);

    schema.bind_columns(&mut order, &["A-7"], &mut ctx);

    // the reader loop: route each identified line, accumulate, attach
    let item_lines: [&[&str]; 2] = [&["SKU-1", "2"], &["SKU-2", "5"]];
    let slot = schema.resolve_child("I").expect("item slot");
    let items_child = &schema.children()[slot];
    let mut items: Vec<Box<dyn Any>> = Vec::new();
    for fields in item_lines {
        ctx.advance_line();
        let mut item = items_child.new_item();
        items_child
            .bind_item(item.as_mut(), fields, &mut ctx)
            .expect("bind item");
        items.push(item);
    }
    items_child.set_value(&mut order, items).expect("attach items");

    let slot = schema.resolve_child("D").expect("delivery slot");
    let delivery_child = &schema.children()[slot];
    ctx.advance_line();
    let mut delivery = delivery_child.new_item();
    delivery_child
        .bind_item(delivery.as_mut(), &["PostNL"], &mut ctx)
        .expect("bind delivery");
    delivery_child
        .set_value(&mut order, vec![delivery])
        .expect("attach delivery");

    assert!(ctx.messages().is_empty(), "diagnostics: {:?}", ctx.messages());
    assert_eq!(order.number.as_deref(), Some("A-7"));
    assert_eq!(
        order.items,
        vec![
            OrderItem {
                sku: Some("SKU-1".to_string()),
                quantity: Some(2),
            },
            OrderItem {
                sku: Some("SKU-2".to_string()),
                quantity: Some(5),
            },
        ]
    );
    assert_eq!(
        order.delivery,
        Some(Delivery {
            carrier: Some("PostNL".to_string()),
        })
    );
}

#[test]
fn singular_child_keeps_the_first_item() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);
    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(1);

    let slot = schema.resolve_child("D").expect("delivery slot");
    let child = &schema.children()[slot];
    let mut batch: Vec<Box<dyn Any>> = Vec::new();
    for carrier in ["PostNL", "DHL"] {
        let mut delivery = child.new_item();
        child
            .bind_item(delivery.as_mut(), &[carrier], &mut ctx)
            .expect("bind delivery");
        batch.push(delivery);
    }
    child.set_value(&mut order, batch).expect("attach batch");

    assert_eq!(
        order.delivery.and_then(|delivery| delivery.carrier).as_deref(),
        Some("PostNL")
    );
}

#[test]
fn write_path_walks_items_in_sequence() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);
    let order = Order {
        number: Some("A-7".to_string()),
        items: vec![
            OrderItem {
                sku: Some("SKU-1".to_string()),
                quantity: Some(2),
            },
            OrderItem {
                sku: Some("SKU-2".to_string()),
                quantity: Some(5),
            },
        ],
        delivery: Some(Delivery {
            carrier: Some("PostNL".to_string()),
        }),
    };
    let mut ctx = RecordContext::at_line(1);

    let slot = schema.resolve_child("I").expect("item slot");
    let child = &schema.children()[slot];
    let mut lines: Vec<Vec<String>> = Vec::new();
    child.for_each_item(&order, &mut |item| {
        let fields = child.format_item(item, &mut ctx).expect("format item");
        lines.push(fields);
    });

    assert!(ctx.messages().is_empty());
    assert_eq!(
        lines,
        vec![
            vec!["SKU-1".to_string(), "2".to_string()],
            vec!["SKU-2".to_string(), "5".to_string()],
        ]
    );

    // singular children walk the same way: zero or one item
    let slot = schema.resolve_child("D").expect("delivery slot");
    let child = &schema.children()[slot];
    let mut carriers = 0;
    child.for_each_item(&order, &mut |_| carriers += 1);
    assert_eq!(carriers, 1);
}

#[test]
fn child_diagnostics_accumulate_without_stopping_the_line() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);
    let mut ctx = RecordContext::at_line(2);

    let slot = schema.resolve_child("I").expect("item slot");
    let child = &schema.children()[slot];
    let mut item = child.new_item();
    child
        .bind_item(item.as_mut(), &["SKU-9", "many"], &mut ctx)
        .expect("bind item");

    assert_eq!(ctx.error_count(), 1);
    assert!(ctx.messages()[0].text.contains("could not be parsed"));
    // the parseable column before the failure still bound
    let item = item.downcast_ref::<OrderItem>().expect("order item");
    assert_eq!(item.sku.as_deref(), Some("SKU-9"));
    assert_eq!(item.quantity, None);
}

#[test]
fn hierarchy_diagnostics_carry_the_qualified_display_text() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);
    let mut ctx = RecordContext::at_line(4);

    let slot = schema.resolve_child("I").expect("item slot");
    let child = &schema.children()[slot];
    child.report_error(&mut ctx, "Item lines must follow their order header.");
    child.report_warning(&mut ctx, "Trailing item line ignored.");

    assert_eq!(ctx.messages()[0].field, "order.Items [I]");
    assert_eq!(ctx.messages()[1].field, "order.Items [I]");
    assert_eq!(ctx.error_count(), 1);
    assert_eq!(ctx.warning_count(), 1);
}

#[test]
fn attach_rejects_items_of_the_wrong_type() {
    let registry = ConverterRegistry::new();
    let schema = order_schema(&registry);
    let mut order = schema.new_record();

    let slot = schema.resolve_child("I").expect("item slot");
    let child = &schema.children()[slot];
    let wrong: Vec<Box<dyn Any>> = vec![Box::new(Delivery::default())];
    let err = child.set_value(&mut order, wrong).expect_err("must fail");
    assert!(matches!(err, SchemaError::ItemTypeMismatch { .. }));

    let mut ctx = RecordContext::at_line(1);
    let mut wrong: Box<dyn Any> = Box::new(Delivery::default());
    let err = child
        .bind_item(wrong.as_mut(), &["SKU-1", "1"], &mut ctx)
        .expect_err("must fail");
    assert!(matches!(err, SchemaError::ItemTypeMismatch { .. }));
}

#[test]
fn sibling_children_cannot_share_an_identifier() {
    let registry = ConverterRegistry::new();
    let err = RecordSchema::builder("order", Order::default)
        .child(
            HierarchyDescriptor::new("Items", "I").as_collection(),
            item_schema(&registry),
            |order: &mut Order, items| order.items = items,
            |order: &Order| order.items.iter().collect(),
        )
        .child(
            HierarchyDescriptor::new("Extras", "I").as_collection(),
            item_schema(&registry),
            |_: &mut Order, _: Vec<OrderItem>| {},
            |_: &Order| Vec::new(),
        )
        .build(&registry)
        .expect_err("must fail");
    assert!(matches!(err, SchemaError::DuplicateIdentifier { .. }));
}

// --- semantic-validator gate ---

fn validated_order_schema(registry: &ConverterRegistry) -> RecordSchema<Order> {
    RecordSchema::builder("order", Order::default)
        .column(
            ColumnDescriptor::new("NUMBER", FieldKind::Text).mandatory(),
            |order: &Order| order.number.clone().map(FieldValue::Text),
            |order: &mut Order, value| {
                if let FieldValue::Text(number) = value {
                    order.number = Some(number);
                }
            },
        )
        .validate_with(|_: &Order, ctx| {
            ctx.push(Message::info("order", "cross-field rules ran"));
        })
        .build(registry)
        .expect("order schema")
}

#[test]
fn validator_runs_only_when_the_record_is_clean() {
    let registry = ConverterRegistry::new();
    let schema = validated_order_schema(&registry);

    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(1);
    schema.bind_columns(&mut order, &["A-7"], &mut ctx);
    assert_eq!(ctx.messages().len(), 1);
    assert_eq!(ctx.messages()[0].text, "cross-field rules ran");

    // a column error suppresses the hook entirely
    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(1);
    schema.bind_columns(&mut order, &[""], &mut ctx);
    assert_eq!(ctx.error_count(), 1);
    assert!(
        ctx.messages().iter().all(Message::is_error),
        "validator must not run on a record with errors: {:?}",
        ctx.messages()
    );
}

#[test]
fn warnings_do_not_suppress_the_validator() {
    let registry = ConverterRegistry::new();
    let schema = validated_order_schema(&registry);
    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(1);
    ctx.push(Message::warning("NUMBER", "NUMBER was truncated upstream."));

    schema.bind_columns(&mut order, &["A-7"], &mut ctx);

    assert_eq!(ctx.warning_count(), 1);
    assert!(
        ctx.messages()
            .iter()
            .any(|message| message.text == "cross-field rules ran")
    );
}

#[test]
fn line_number_mismatch_suppresses_the_validator() {
    let registry = ConverterRegistry::new();
    let schema = RecordSchema::builder("order", Order::default)
        .column(
            ColumnDescriptor::new("ROW", FieldKind::Int32).as_line_number(),
            |_: &Order| None,
            |order: &mut Order, value| {
                if let FieldValue::Int32(row) = value {
                    order.number = Some(row.to_string());
                }
            },
        )
        .validate_with(|_: &Order, ctx| {
            ctx.push(Message::info("order", "cross-field rules ran"));
        })
        .build(&registry)
        .expect("order schema");

    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(7);
    schema.bind_columns(&mut order, &["7"], &mut ctx);
    assert_eq!(ctx.messages().len(), 1);
    assert_eq!(ctx.messages()[0].text, "cross-field rules ran");

    // the mismatch still assigns the parsed value but counts as an error
    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(7);
    schema.bind_columns(&mut order, &["8"], &mut ctx);
    assert_eq!(order.number.as_deref(), Some("8"));
    assert_eq!(ctx.error_count(), 1);
    assert!(
        ctx.messages().iter().all(Message::is_error),
        "validator must not run after a line-number mismatch: {:?}",
        ctx.messages()
    );
}

#[test]
fn validate_record_reruns_cross_line_rules_after_children_attach() {
    let registry = ConverterRegistry::new();
    let items = item_schema(&registry);
    let schema = RecordSchema::builder("order", Order::default)
        .column(
            ColumnDescriptor::new("NUMBER", FieldKind::Text).mandatory(),
            |order: &Order| order.number.clone().map(FieldValue::Text),
            |order: &mut Order, value| {
                if let FieldValue::Text(number) = value {
                    order.number = Some(number);
                }
            },
        )
        .child(
            HierarchyDescriptor::new("Items", "I").as_collection(),
            Arc::clone(&items),
            |order: &mut Order, items| order.items = items,
            |order: &Order| order.items.iter().collect(),
        )
        .validate_with(|order: &Order, ctx| {
            if order.items.is_empty() {
                ctx.push(Message::error("order", "order has no item lines"));
            }
        })
        .build(&registry)
        .expect("order schema");

    let mut order = schema.new_record();
    let mut ctx = RecordContext::at_line(1);
    schema.bind_columns(&mut order, &["A-7"], &mut ctx);
    // the header-only pass sees no items yet
    assert_eq!(ctx.error_count(), 1);
    assert_eq!(ctx.messages()[0].text, "order has no item lines");

    let slot = schema.resolve_child("I").expect("item slot");
    let child = &schema.children()[slot];
    let mut line_ctx = RecordContext::at_line(2);
    let mut item = child.new_item();
    child
        .bind_item(item.as_mut(), &["SKU-1", "1"], &mut line_ctx)
        .expect("bind item");
    child.set_value(&mut order, vec![item]).expect("attach item");

    // the host re-validates once the record is assembled
    let mut final_ctx = RecordContext::at_line(2);
    schema.validate_record(&order, &mut final_ctx);
    assert!(final_ctx.messages().is_empty());
}
