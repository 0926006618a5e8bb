//! Group-by aggregation: records sharing a key collapse into one
//! `{ key, total, count }` record, and the search runs over the totals.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};

use crate::load::{value_at, weight_at};

#[derive(Debug, PartialEq)]
pub enum AggregateError {
    /// No value at the key path for the record at `position`.
    MissingKey { position: usize },
    /// No numeric value at the weight path for the record at `position`.
    MissingWeight { position: usize },
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey { position } => {
                write!(f, "record at position {position}: no value at key path")
            }
            Self::MissingWeight { position } => {
                write!(f, "record at position {position}: no numeric value at weight path")
            }
        }
    }
}

impl std::error::Error for AggregateError {}

fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Group records by `key_path`, summing the weight at `field_path` per group.
/// Output records carry `key`, `total`, and `count`, in ascending key order.
pub fn totals_by_key(
    records: &[Value],
    key_path: &str,
    field_path: &str,
) -> Result<Vec<Value>, AggregateError> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for (position, record) in records.iter().enumerate() {
        let key = value_at(record, key_path)
            .map(key_string)
            .ok_or(AggregateError::MissingKey { position })?;
        let weight =
            weight_at(record, field_path).ok_or(AggregateError::MissingWeight { position })?;
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += weight;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(key, (total, count))| json!({ "key": key, "total": total, "count": count }))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_and_sums() {
        let records = vec![
            json!({"customer": "acme", "value": 100}),
            json!({"customer": "acme", "value": 250}),
            json!({"customer": "zenith", "value": 40}),
        ];
        let totals = totals_by_key(&records, "customer", "value").unwrap();
        assert_eq!(totals.len(), 2);
        // BTreeMap ordering: acme before zenith.
        assert_eq!(totals[0]["key"], "acme");
        assert_eq!(totals[0]["total"], 350.0);
        assert_eq!(totals[0]["count"], 2);
        assert_eq!(totals[1]["key"], "zenith");
        assert_eq!(totals[1]["total"], 40.0);
    }

    #[test]
    fn nested_key_and_numeric_string_weights() {
        let records = vec![
            json!({"customer": {"id": "c_1"}, "value": "10.5"}),
            json!({"customer": {"id": "c_1"}, "value": "4.5"}),
        ];
        let totals = totals_by_key(&records, "customer.id", "value").unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0]["total"], 15.0);
    }

    #[test]
    fn non_string_keys_stringify() {
        let records = vec![
            json!({"batch": 7, "value": 1}),
            json!({"batch": 7, "value": 2}),
        ];
        let totals = totals_by_key(&records, "batch", "value").unwrap();
        assert_eq!(totals[0]["key"], "7");
        assert_eq!(totals[0]["total"], 3.0);
    }

    #[test]
    fn missing_key_reports_position() {
        let records = vec![
            json!({"customer": "acme", "value": 100}),
            json!({"value": 250}),
        ];
        let err = totals_by_key(&records, "customer", "value").unwrap_err();
        assert_eq!(err, AggregateError::MissingKey { position: 1 });
    }

    #[test]
    fn missing_weight_reports_position() {
        let records = vec![json!({"customer": "acme"})];
        let err = totals_by_key(&records, "customer", "value").unwrap_err();
        assert_eq!(err, AggregateError::MissingWeight { position: 0 });
    }
}
