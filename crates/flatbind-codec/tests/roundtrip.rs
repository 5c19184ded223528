//! Canonical round-trip properties: text the engine formats for a value
//! parses back and formats to the same text, for every kind with a native
//! codec and absent width truncation.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use flatbind_codec::{ConverterRegistry, RecordSchema};
use flatbind_model::{ColumnDescriptor, FieldKind, FieldValue, RecordContext};

/// One-field record that stores the conversion currency directly.
#[derive(Debug, Default, Clone)]
struct Holder(Option<FieldValue>);

fn holder_schema(kind: FieldKind) -> RecordSchema<Holder> {
    RecordSchema::builder("holder", Holder::default)
        .column(
            ColumnDescriptor::new("VALUE", kind),
            |holder: &Holder| holder.0.clone(),
            |holder: &mut Holder, value| holder.0 = Some(value),
        )
        .build(&ConverterRegistry::new())
        .expect("holder schema")
}

/// Formats the value, parses the text back, formats again; both passes must
/// stay diagnostic-free.
fn round_trip(kind: FieldKind, value: FieldValue) -> (String, String) {
    let schema = holder_schema(kind);
    let mut ctx = RecordContext::at_line(1);

    let first = schema.format_columns(&Holder(Some(value)), &mut ctx);
    assert!(ctx.messages().is_empty(), "format: {:?}", ctx.messages());

    let mut reparsed = schema.new_record();
    let fields: Vec<&str> = first.iter().map(String::as_str).collect();
    schema.bind_columns(&mut reparsed, &fields, &mut ctx);
    assert!(ctx.messages().is_empty(), "parse: {:?}", ctx.messages());

    let second = schema.format_columns(&reparsed, &mut ctx);
    assert!(ctx.messages().is_empty(), "reformat: {:?}", ctx.messages());
    (first.join("|"), second.join("|"))
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

fn datetime_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (date_strategy(), 0u32..24, 0u32..60, 0u32..60, 0u32..1000).prop_map(
        |(date, hour, minute, second, milli)| {
            date.and_hms_milli_opt(hour, minute, second, milli)
                .expect("valid time")
        },
    )
}

fn span_strategy() -> impl Strategy<Value = Duration> {
    (0i64..=30, 0i64..24, 0i64..60, 0i64..60, 0i64..1000, any::<bool>()).prop_map(
        |(days, hours, minutes, seconds, millis, negative)| {
            let span = Duration::seconds(days * 86_400 + hours * 3_600 + minutes * 60 + seconds)
                + Duration::milliseconds(millis);
            if negative { -span } else { span }
        },
    )
}

proptest! {
    #[test]
    fn int16_text_round_trips(value in any::<i16>()) {
        let (first, second) = round_trip(FieldKind::Int16, FieldValue::Int16(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn int32_text_round_trips(value in any::<i32>()) {
        let (first, second) = round_trip(FieldKind::Int32, FieldValue::Int32(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn int64_text_round_trips(value in any::<i64>()) {
        let (first, second) = round_trip(FieldKind::Int64, FieldValue::Int64(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn float32_text_round_trips(value in -1.0e6f32..1.0e6f32) {
        let (first, second) = round_trip(FieldKind::Float32, FieldValue::Float32(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn float64_text_round_trips(value in -1.0e12f64..1.0e12f64) {
        let (first, second) = round_trip(FieldKind::Float64, FieldValue::Float64(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn decimal_text_round_trips(mantissa in any::<i64>(), scale in 0u32..=9) {
        let value = Decimal::new(mantissa, scale);
        let (first, second) = round_trip(FieldKind::Decimal, FieldValue::Decimal(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn text_round_trips_verbatim(value in "[ -~]{0,32}") {
        let (first, second) = round_trip(FieldKind::Text, FieldValue::Text(value.clone()));
        prop_assert_eq!(&first, &value);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn date_text_round_trips(value in date_strategy()) {
        let (first, second) = round_trip(FieldKind::Date, FieldValue::Date(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn datetime_text_round_trips(value in datetime_strategy()) {
        let (first, second) = round_trip(FieldKind::DateTime, FieldValue::DateTime(value));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn span_text_round_trips(value in span_strategy()) {
        let (first, second) = round_trip(FieldKind::Span, FieldValue::Span(value));
        prop_assert_eq!(first, second);
    }
}

#[test]
fn bool_round_trips_through_canonical_literals() {
    let (first, second) = round_trip(FieldKind::Bool, FieldValue::Bool(true));
    assert_eq!(first, "Y");
    assert_eq!(second, "Y");
    let (first, second) = round_trip(FieldKind::Bool, FieldValue::Bool(false));
    assert_eq!(first, "N");
    assert_eq!(second, "N");
}

#[test]
fn fractional_seconds_survive_the_round_trip() {
    let value = NaiveDate::from_ymd_opt(2024, 1, 31)
        .expect("date")
        .and_hms_milli_opt(8, 30, 0, 250)
        .expect("time");
    let (first, second) = round_trip(FieldKind::DateTime, FieldValue::DateTime(value));
    assert_eq!(first, "2024-01-31T08:30:00.250");
    assert_eq!(first, second);
}
