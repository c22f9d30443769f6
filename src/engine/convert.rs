//! `duckdb::types::ValueRef` -> `serde_json::Value` bridge.
//!
//! Adapted from the teacher's `DuckDBBackend::value_ref_to_json`. Blob and
//! base64 handling is dropped (no source in this pipeline produces blobs);
//! decimal values are surfaced as JSON strings so the search writer can
//! explicitly coerce them to IEEE-754 doubles at its boundary (§9 Decimal
//! coercion), while the graph writer path reads the underlying numeric
//! engine value directly rather than going through this JSON bridge.

use duckdb::types::ValueRef;
use serde_json::Value;

pub fn row_to_json(row: &duckdb::Row, columns: &[String]) -> Value {
    let mut map = serde_json::Map::new();
    for (i, col_name) in columns.iter().enumerate() {
        let value = match row.get_ref(i) {
            Ok(value_ref) => value_ref_to_json(value_ref),
            Err(_) => Value::Null,
        };
        map.insert(col_name.clone(), value);
    }
    Value::Object(map)
}

fn value_ref_to_json(value: ValueRef) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(i) => Value::Number(i.into()),
        ValueRef::SmallInt(i) => Value::Number(i.into()),
        ValueRef::Int(i) => Value::Number(i.into()),
        ValueRef::BigInt(i) => Value::Number(i.into()),
        ValueRef::HugeInt(i) => Value::String(i.to_string()),
        ValueRef::UTinyInt(i) => Value::Number(i.into()),
        ValueRef::USmallInt(i) => Value::Number(i.into()),
        ValueRef::UInt(i) => Value::Number(i.into()),
        ValueRef::UBigInt(i) => Value::Number(i.into()),
        ValueRef::Float(f) => Value::Number(
            serde_json::Number::from_f64(f as f64).unwrap_or(serde_json::Number::from(0)),
        ),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned().into(),
        ValueRef::Decimal(d) => Value::String(d.to_string()),
        ValueRef::Timestamp(_, _) => Value::String(format!("{value:?}")),
        ValueRef::Date32(_) => Value::String(format!("{value:?}")),
        ValueRef::Time64(_, _) => Value::String(format!("{value:?}")),
        other => Value::String(format!("{other:?}")),
    }
}
