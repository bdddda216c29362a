//! Legacy shareholder records kept in a flat JSON file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Keys owned by the store; callers cannot overwrite them.
const RESERVED_KEYS: &[&str] = &["id", "createdAt", "updatedAt"];

/// A shareholder with arbitrary extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shareholder {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shareholder {
    /// Build a record from a JSON object body.
    pub fn from_payload(payload: Value, now: DateTime<Utc>) -> AppResult<Self> {
        let mut record = Self {
            id: Uuid::new_v4(),
            name: None,
            pan: None,
            extra: Map::new(),
            created_at: now,
            updated_at: now,
        };
        record.merge(payload, now)?;
        record.created_at = now;
        Ok(record)
    }

    /// Shallow merge of a JSON object into this record.
    pub fn merge(&mut self, payload: Value, now: DateTime<Utc>) -> AppResult<()> {
        let Value::Object(fields) = payload else {
            return Err(AppError::validation("Shareholder body must be a JSON object"));
        };

        for (key, value) in fields {
            match key.as_str() {
                k if RESERVED_KEYS.contains(&k) => continue,
                "name" => self.name = as_text(value)?,
                "pan" => self.pan = as_text(value)?,
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
        self.updated_at = now;
        Ok(())
    }
}

fn as_text(value: Value) -> AppResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(AppError::validation(format!("Expected text, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_keeps_extra_fields() {
        let now = Utc::now();
        let s = Shareholder::from_payload(
            json!({"name": "Asha", "pan": "ABCDE1234F", "city": "Pune", "id": "ignored"}),
            now,
        )
        .unwrap();

        assert_eq!(s.name.as_deref(), Some("Asha"));
        assert_eq!(s.extra.get("city"), Some(&json!("Pune")));
        assert!(!s.extra.contains_key("id"));

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["city"], "Pune");
        assert_eq!(json["id"], json!(s.id));
    }

    #[test]
    fn test_merge_is_shallow() {
        let now = Utc::now();
        let mut s =
            Shareholder::from_payload(json!({"name": "Asha", "meta": {"a": 1}}), now).unwrap();
        s.merge(json!({"meta": {"b": 2}}), now).unwrap();

        assert_eq!(s.name.as_deref(), Some("Asha"));
        assert_eq!(s.extra["meta"], json!({"b": 2}));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Shareholder::from_payload(json!([1, 2]), Utc::now()).is_err());
    }
}
