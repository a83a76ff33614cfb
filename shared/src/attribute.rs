//! Conversion between JSON records and DynamoDB attribute maps.

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::{Error, Record, Result};

/// A DynamoDB item as returned by the SDK.
pub type Item = HashMap<String, AttributeValue>;

/// Marshal a record into a DynamoDB item.
pub fn to_item(record: &Record) -> Item {
    record
        .fields()
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

/// Unmarshal a DynamoDB item into a record.
pub fn from_item(item: Item) -> Result<Record> {
    let mut fields = Map::with_capacity(item.len());
    for (name, attribute) in item {
        fields.insert(name, from_attribute(attribute)?);
    }
    Record::try_from(fields)
}

pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), to_attribute(value)))
                .collect(),
        ),
    }
}

pub fn from_attribute(attribute: AttributeValue) -> Result<Value> {
    Ok(match attribute {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::N(n) => Value::Number(parse_number(&n)?),
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::Ss(set) => Value::Array(set.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(
            set.iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_>>()?,
        ),
        AttributeValue::L(items) => Value::Array(
            items
                .into_iter()
                .map(from_attribute)
                .collect::<Result<_>>()?,
        ),
        AttributeValue::M(fields) => {
            let mut map = Map::with_capacity(fields.len());
            for (name, attribute) in fields {
                map.insert(name, from_attribute(attribute)?);
            }
            Value::Object(map)
        }
        AttributeValue::B(_) | AttributeValue::Bs(_) => {
            return Err(Error::UnsupportedAttribute(
                "binary attributes cannot be returned as JSON".to_string(),
            ))
        }
        other => {
            return Err(Error::UnsupportedAttribute(format!("{:?}", other)));
        }
    })
}

fn parse_number(raw: &str) -> Result<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| Error::UnsupportedAttribute(format!("invalid number: {}", raw)))
}
