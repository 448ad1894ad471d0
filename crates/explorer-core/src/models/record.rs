//! Metadata record types.
//!
//! The table store is schemaless, so a [`Record`] keeps a handful of typed
//! required fields plus a map of whatever else the entity carried.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One raw key-value entity as returned by a record store.
pub type Entity = serde_json::Map<String, Value>;

/// Identifier of a record within the table store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    pub partition_key: String,
    pub row_key: String,
}

impl RecordId {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.row_key)
    }
}

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON value. Arrays and objects are kept as their JSON text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(nested.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Fields a record needs before downstream components can use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredField {
    ImageUrl,
    ImageCategory,
    FileName,
}

impl RequiredField {
    pub const ALL: [RequiredField; 3] = [
        RequiredField::ImageUrl,
        RequiredField::ImageCategory,
        RequiredField::FileName,
    ];

    /// Property name in the table store.
    pub fn column(&self) -> &'static str {
        match self {
            RequiredField::ImageUrl => IMAGE_URL,
            RequiredField::ImageCategory => IMAGE_CATEGORY,
            RequiredField::FileName => FILE_NAME,
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

const PARTITION_KEY: &str = "PartitionKey";
const ROW_KEY: &str = "RowKey";
const TIMESTAMP: &str = "Timestamp";
const IMAGE_URL: &str = "ImageURL";
const IMAGE_CATEGORY: &str = "ImageCategory";
const FILE_NAME: &str = "FileName";

/// One row of image metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub category: Option<String>,
    pub file_name: Option<String>,
    pub image_url: Option<String>,
    /// Store-assigned modification time, as sent by the store.
    pub timestamp: Option<String>,
    /// Every other scalar property of the entity.
    pub extra: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Convert a store entity into a record.
    ///
    /// Never fails: required fields that are absent, empty or not strings
    /// become `None` and are reported by [`Record::missing_fields`].
    pub fn from_entity(entity: Entity) -> Self {
        let mut partition_key = String::new();
        let mut row_key = String::new();
        let mut timestamp = None;
        let mut category = None;
        let mut file_name = None;
        let mut image_url = None;
        let mut extra = BTreeMap::new();

        for (key, value) in entity {
            if is_odata_annotation(&key) {
                continue;
            }
            match key.as_str() {
                PARTITION_KEY => partition_key = scalar_text(&value).unwrap_or_default(),
                ROW_KEY => row_key = scalar_text(&value).unwrap_or_default(),
                TIMESTAMP => timestamp = non_empty_string(value),
                IMAGE_CATEGORY => category = non_empty_string(value),
                FILE_NAME => file_name = non_empty_string(value),
                IMAGE_URL => image_url = non_empty_string(value),
                _ => {
                    extra.insert(key, FieldValue::from_json(value));
                }
            }
        }

        Self {
            id: RecordId::new(partition_key, row_key),
            category,
            file_name,
            image_url,
            timestamp,
            extra,
        }
    }

    /// Required fields this record lacks, in [`RequiredField::ALL`] order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_none())
            .collect()
    }

    pub fn is_usable(&self) -> bool {
        RequiredField::ALL
            .iter()
            .all(|field| self.field(*field).is_some())
    }

    pub fn field(&self, field: RequiredField) -> Option<&str> {
        match field {
            RequiredField::ImageUrl => self.image_url.as_deref(),
            RequiredField::ImageCategory => self.category.as_deref(),
            RequiredField::FileName => self.file_name.as_deref(),
        }
    }

    /// Look up an extra property by its store name.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.extra.get(key)
    }
}

fn is_odata_annotation(key: &str) -> bool {
    key.starts_with("odata.") || key.contains("@odata.")
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> Entity {
        match value {
            Value::Object(map) => map,
            _ => panic!("entity fixtures must be objects"),
        }
    }

    #[test]
    fn test_from_entity_full() {
        let record = Record::from_entity(entity(json!({
            "PartitionKey": "2024",
            "RowKey": "a",
            "Timestamp": "2024-03-01T10:00:00Z",
            "ImageCategory": "cats",
            "FileName": "a.jpg",
            "ImageURL": "https://acct.blob.core.windows.net/image-metadata/2024/a.jpg",
            "Width": 640,
            "Ratio": 1.5,
            "Tagged": true,
            "odata.etag": "W/\"x\"",
            "Width@odata.type": "Edm.Int32"
        })));

        assert_eq!(record.id, RecordId::new("2024", "a"));
        assert_eq!(record.category.as_deref(), Some("cats"));
        assert_eq!(record.file_name.as_deref(), Some("a.jpg"));
        assert!(record.is_usable());
        assert!(record.missing_fields().is_empty());
        assert_eq!(record.get("Width"), Some(&FieldValue::Int(640)));
        assert_eq!(record.get("Ratio"), Some(&FieldValue::Float(1.5)));
        assert_eq!(record.get("Tagged"), Some(&FieldValue::Bool(true)));
        assert!(record.get("odata.etag").is_none());
        assert!(record.get("Width@odata.type").is_none());
        assert_eq!(record.timestamp.as_deref(), Some("2024-03-01T10:00:00Z"));
    }

    #[test]
    fn test_missing_fields_are_flagged_not_dropped() {
        let record = Record::from_entity(entity(json!({
            "PartitionKey": "p",
            "RowKey": "r",
            "FileName": "",
            "ImageCategory": 7
        })));

        assert!(!record.is_usable());
        assert_eq!(
            record.missing_fields(),
            vec![
                RequiredField::ImageUrl,
                RequiredField::ImageCategory,
                RequiredField::FileName
            ]
        );
    }

    #[test]
    fn test_nested_values_kept_as_json_text() {
        let record = Record::from_entity(entity(json!({
            "Tags": ["a", "b"]
        })));
        assert_eq!(
            record.get("Tags").and_then(FieldValue::as_text),
            Some("[\"a\",\"b\"]")
        );
        assert_eq!(record.id, RecordId::new("", ""));
    }

    #[test]
    fn test_display() {
        assert_eq!(RecordId::new("p", "r").to_string(), "p/r");
        assert_eq!(RequiredField::ImageUrl.to_string(), "ImageURL");
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::Int(3).to_string(), "3");
    }
}
