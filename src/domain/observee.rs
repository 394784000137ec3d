// Observee domain model - the account being monitored
use crate::domain::errors::{CanvasError, CanvasResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observee {
    pub id: String,
    pub display_name: String,
}

impl Observee {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Build from a raw observee record; numeric ids are stringified
    pub fn from_record(record: &Value) -> CanvasResult<Self> {
        let id = match record.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => {
                return Err(CanvasError::Client(format!(
                    "observee record without an id: {}",
                    record
                )));
            }
        };

        let display_name = record
            .get("name")
            .and_then(|n| n.as_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| id.clone());

        Ok(Self::new(id, display_name))
    }
}

pub fn map_observees(records: &[Value]) -> CanvasResult<Vec<Observee>> {
    records.iter().map(Observee::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_record() {
        let observee = Observee::from_record(&json!({"id": 42, "name": "Jamie Doe"})).unwrap();
        assert_eq!(observee, Observee::new("42", "Jamie Doe"));

        let observee = Observee::from_record(&json!({"id": "17"})).unwrap();
        assert_eq!(observee.display_name, "17");
    }

    #[test]
    fn test_record_without_id() {
        let result = map_observees(&[json!({"id": 1, "name": "A"}), json!({"name": "B"})]);
        assert!(matches!(result, Err(CanvasError::Client(_))));
    }
}
