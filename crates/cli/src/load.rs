//! Record loading: JSON arrays and CSV tables into uniform JSON objects,
//! plus dotted-path field access.

use std::fmt;

use serde_json::Value;

#[derive(Debug)]
pub enum LoadError {
    /// JSON parse error.
    Json(String),
    /// The JSON document parsed but is not an array of records.
    NotAnArray,
    /// CSV read error.
    Csv(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::NotAnArray => write!(f, "input must be a JSON array of records"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Parse a JSON document that must hold an array of records.
pub fn parse_json_items(data: &str) -> Result<Vec<Value>, LoadError> {
    let document: Value = serde_json::from_str(data).map_err(|e| LoadError::Json(e.to_string()))?;
    match document {
        Value::Array(items) => Ok(items),
        _ => Err(LoadError::NotAnArray),
    }
}

/// Parse CSV text into one JSON object per row, keyed by header. Cell values
/// stay strings; numeric parsing happens at field access.
pub fn parse_csv_items(data: &str) -> Result<Vec<Value>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Csv(e.to_string()))?;
        let mut object = serde_json::Map::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = record.get(i).unwrap_or("");
            object.insert(header.clone(), Value::String(cell.to_string()));
        }
        items.push(Value::Object(object));
    }

    Ok(items)
}

/// Walk a dotted path (`a.b.c`) into a record.
pub fn value_at<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cursor = record;
    for part in path.split('.') {
        cursor = cursor.get(part)?;
    }
    Some(cursor)
}

/// Read a numeric weight at a dotted path. Numbers are taken as-is; strings
/// are parsed (CSV inputs carry strings).
pub fn weight_at(record: &Value, path: &str) -> Option<f64> {
    match value_at(record, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_array_of_objects() {
        let items = parse_json_items(r#"[{"value": 20000}, {"value": 80000}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["value"], 20000);
    }

    #[test]
    fn json_non_array_rejected() {
        let err = parse_json_items(r#"{"value": 20000}"#).unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray));
    }

    #[test]
    fn json_garbage_rejected() {
        let err = parse_json_items("not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn csv_rows_become_objects() {
        let csv = "\
invoice_id,InvoiceValue,currency
inv_1,20000,USD
inv_2,80000,USD
";
        let items = parse_csv_items(csv).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["invoice_id"], "inv_1");
        assert_eq!(items[1]["InvoiceValue"], "80000");
    }

    #[test]
    fn dotted_path_lookup() {
        let record = json!({"customer": {"id": "c_9", "balance": {"due": 125.5}}});
        assert_eq!(
            value_at(&record, "customer.id"),
            Some(&Value::String("c_9".into()))
        );
        assert_eq!(weight_at(&record, "customer.balance.due"), Some(125.5));
        assert_eq!(value_at(&record, "customer.missing"), None);
        assert_eq!(value_at(&record, "missing.id"), None);
    }

    #[test]
    fn weight_parses_numeric_strings() {
        let record = json!({"InvoiceValue": "  20000.5 "});
        assert_eq!(weight_at(&record, "InvoiceValue"), Some(20000.5));
        let bad = json!({"InvoiceValue": "twenty"});
        assert_eq!(weight_at(&bad, "InvoiceValue"), None);
        let wrong_type = json!({"InvoiceValue": [1, 2]});
        assert_eq!(weight_at(&wrong_type, "InvoiceValue"), None);
    }
}
