use serde_json::{Map, Value};
use thiserror::Error;

use super::types::Millis;

/// Why a log line did not yield a transaction row. Both kinds are skipped by
/// the extractor.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum RecordError {
    #[error("line is not a JSON object")]
    Malformed,
    #[error("record lacks a numeric `ts` or `latency`")]
    Incomplete,
}

/// Operation kind carried in the optional `type` field.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RecordKind {
    /// No `type` field at all. Older logs did not carry one.
    Untyped,
    Create,
    Update,
    Other,
}

impl RecordKind {
    fn from_field(field: Option<&Value>) -> Self {
        match field {
            None => Self::Untyped,
            Some(Value::String(s)) if s == "CREATE" => Self::Create,
            Some(Value::String(s)) if s == "UPDATE" => Self::Update,
            Some(_) => Self::Other,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct LogRecord {
    pub ts: Millis,
    pub latency: Millis,
    pub kind: RecordKind,
}

fn numeric_field(obj: &Map<String, Value>, key: &str) -> Result<Millis, RecordError> {
    match obj.get(key) {
        Some(Value::Number(n)) => Ok(Millis::new(n.clone())),
        _ => Err(RecordError::Incomplete),
    }
}

pub fn classify_line(line: &str) -> Result<LogRecord, RecordError> {
    classify_bytes(line.as_bytes())
}

/// Same as [`classify_line`] for raw input; bytes that are not UTF-8 are
/// malformed.
pub fn classify_bytes(line: &[u8]) -> Result<LogRecord, RecordError> {
    let obj = match serde_json::from_slice::<Value>(line) {
        Ok(Value::Object(obj)) => obj,
        _ => return Err(RecordError::Malformed),
    };

    Ok(LogRecord {
        ts: numeric_field(&obj, "ts")?,
        latency: numeric_field(&obj, "latency")?,
        kind: RecordKind::from_field(obj.get("type")),
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_bytes, classify_line, RecordError, RecordKind};
    use crate::types::Millis;

    #[test]
    fn untyped_record() {
        let record = classify_line(r#"{"ts": 100, "latency": 5}"#).unwrap();
        assert_eq!(record.ts, Millis::from(100i64));
        assert_eq!(record.latency, Millis::from(5i64));
        assert_eq!(record.kind, RecordKind::Untyped);
    }

    #[test]
    fn typed_records() {
        let kind = |line: &str| classify_line(line).unwrap().kind;
        assert_eq!(kind(r#"{"ts": 1, "latency": 2, "type": "CREATE"}"#), RecordKind::Create);
        assert_eq!(kind(r#"{"ts": 1, "latency": 2, "type": "UPDATE"}"#), RecordKind::Update);
        assert_eq!(kind(r#"{"ts": 1, "latency": 2, "type": "PURGE"}"#), RecordKind::Other);
        assert_eq!(kind(r#"{"ts": 1, "latency": 2, "type": "create"}"#), RecordKind::Other);
        assert_eq!(kind(r#"{"ts": 1, "latency": 2, "type": null}"#), RecordKind::Other);
        assert_eq!(kind(r#"{"ts": 1, "latency": 2, "type": 3}"#), RecordKind::Other);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let record = classify_line(r#"{"ts": 1, "latency": 2.5, "id": "abc", "ok": true}"#);
        assert!(record.is_ok());
    }

    #[test]
    fn malformed_lines() {
        for line in ["not json at all", "", "{\"ts\": 1", "[1, 2]", "42", "\"ts\""] {
            assert_eq!(classify_line(line), Err(RecordError::Malformed), "{line:?}");
        }
    }

    #[test]
    fn incomplete_records() {
        for line in [
            r#"{"ts": 10}"#,
            r#"{"latency": 10}"#,
            r#"{}"#,
            r#"{"ts": "10", "latency": 1}"#,
            r#"{"ts": 10, "latency": null}"#,
        ] {
            assert_eq!(classify_line(line), Err(RecordError::Incomplete), "{line:?}");
        }
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        assert_eq!(classify_bytes(b"\xff\xfe garbage\n"), Err(RecordError::Malformed));
        assert_eq!(
            classify_bytes(b"{\"ts\": 1, \"latency\": 2, \"type\": \"\xff\"}"),
            Err(RecordError::Malformed)
        );
        assert!(classify_bytes(b"{\"ts\": 1, \"latency\": 2}\r\n").is_ok());
    }

    #[test]
    fn trailing_newline_is_accepted() {
        assert!(classify_line("{\"ts\": 1, \"latency\": 2}\n").is_ok());
    }
}
