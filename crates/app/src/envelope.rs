//! Response envelopes
//!
//! The backend wraps most payloads as `{Data: ...}` or `{data: ...}` and
//! spells field names in either camelCase or PascalCase. Every response is
//! read through this module so callers only ever see typed values.

use std::str::FromStr;

use jiff::{
    Timestamp,
    civil::{Date, DateTime, Time},
    tz::TimeZone,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

const ENVELOPE_KEYS: [&str; 2] = ["Data", "data"];
const MESSAGE_KEYS: [&str; 4] = ["message", "error", "title", "detail"];

/// The payload inside an envelope, or `value` itself when it is not wrapped.
pub fn unwrap_envelope(value: &Value) -> &Value {
    let Value::Object(fields) = value else {
        return value;
    };

    ENVELOPE_KEYS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|payload| !payload.is_null())
        .unwrap_or(value)
}

/// Objects in an enveloped array; anything else yields no records.
pub fn records(value: &Value) -> Vec<Record<'_>> {
    match unwrap_envelope(value) {
        Value::Array(items) => items.iter().filter_map(Record::new).collect(),
        _ => Vec::new(),
    }
}

/// Id of a newly created order.
///
/// Probed in order: a bare number or string body, `id` on the unwrapped
/// object, `orderId`, then `order.id`.
pub fn created_order_id(value: &Value) -> Option<String> {
    let payload = unwrap_envelope(value);

    if let Some(id) = scalar_string(payload) {
        return Some(id);
    }

    let record = Record::new(payload)?;

    record
        .string(&["id"])
        .or_else(|| record.string(&["orderId"]))
        .or_else(|| record.record(&["order"]).and_then(|order| order.string(&["id"])))
}

/// Human-readable message from an error body, if it carries one.
pub fn error_message(value: &Value) -> Option<String> {
    if let Value::String(text) = value {
        return non_empty(text);
    }

    [value, unwrap_envelope(value)]
        .into_iter()
        .filter_map(Record::new)
        .find_map(|record| record.string(&MESSAGE_KEYS))
}

/// Dates come back as RFC 3339 instants, offset-less local date-times, or
/// bare dates. The latter two are read in `time_zone`.
pub fn parse_instant(text: &str, time_zone: &TimeZone) -> Option<Timestamp> {
    if let Ok(instant) = text.parse::<Timestamp>() {
        return Some(instant);
    }

    let civil = text
        .parse::<DateTime>()
        .ok()
        .or_else(|| {
            text.parse::<Date>()
                .ok()
                .map(|date| date.to_datetime(Time::midnight()))
        })?;

    civil
        .to_zoned(time_zone.clone())
        .ok()
        .map(|zoned| zoned.timestamp())
}

/// A JSON object read with case-tolerant field names.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// View `value` as a record if it is an object.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    /// First non-null value among `names`. Each name is tried as given,
    /// then with its first letter upper-cased.
    pub fn get(&self, names: &[&str]) -> Option<&'a Value> {
        names.iter().find_map(|name| {
            self.fields
                .get(*name)
                .filter(|value| !value.is_null())
                .or_else(|| {
                    self.fields
                        .get(&pascal_case(name))
                        .filter(|value| !value.is_null())
                })
        })
    }

    /// Non-empty string field; numbers are rendered as strings.
    pub fn string(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .find_map(|name| self.get(&[*name]).and_then(scalar_string))
    }

    /// Integer field; numeric strings are accepted.
    pub fn i64(&self, names: &[&str]) -> Option<i64> {
        names.iter().find_map(|name| match self.get(&[*name])? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
    }

    /// Non-negative integer field.
    pub fn u64(&self, names: &[&str]) -> Option<u64> {
        self.i64(names).and_then(|value| u64::try_from(value).ok())
    }

    /// Decimal field; numeric strings are accepted.
    pub fn decimal(&self, names: &[&str]) -> Option<Decimal> {
        names.iter().find_map(|name| match self.get(&[*name])? {
            Value::Number(number) => Decimal::from_str(&number.to_string())
                .ok()
                .or_else(|| number.as_f64().and_then(|f| Decimal::try_from(f).ok())),
            Value::String(text) => Decimal::from_str(text.trim()).ok(),
            _ => None,
        })
    }

    /// Boolean field; `1`/`0` are accepted.
    pub fn bool(&self, names: &[&str]) -> Option<bool> {
        names.iter().find_map(|name| match self.get(&[*name])? {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => number.as_i64().map(|n| n != 0),
            _ => None,
        })
    }

    /// Array field.
    pub fn array(&self, names: &[&str]) -> Option<&'a Vec<Value>> {
        names
            .iter()
            .find_map(|name| self.get(&[*name]).and_then(Value::as_array))
    }

    /// Nested object field.
    pub fn record(&self, names: &[&str]) -> Option<Record<'a>> {
        names
            .iter()
            .find_map(|name| self.get(&[*name]).and_then(Record::new))
    }

    /// Strings in an array field, skipping anything else.
    pub fn strings(&self, names: &[&str]) -> Vec<String> {
        self.array(names)
            .map(|items| items.iter().filter_map(scalar_string).collect())
            .unwrap_or_default()
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_empty(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
