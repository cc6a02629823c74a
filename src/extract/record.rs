//! Extracted record types
//!
//! A [`Record`] keeps its fields in the order the extraction rules declare them,
//! so that serializing the same record always yields the same bytes.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Value of one extracted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Every match of a multi-valued rule, in document order (may be empty)
    List(Vec<String>),

    /// First match of a single-valued rule, or `None` when the rule found nothing
    Single(Option<String>),
}

impl FieldValue {
    /// Returns the text of a present single value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Single(value) => value.as_deref(),
            Self::List(_) => None,
        }
    }

    /// Returns the items of a list value
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Single(_) => None,
        }
    }

    /// Returns true when a single value is null
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Single(None))
    }
}

/// The structured result of applying all extraction rules to one detail page
///
/// Every rule contributes exactly one entry; a rule that did not match is kept as
/// an explicit null (or an empty list) rather than being left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, keeping its original position if it already exists
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Gets a field value by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Gets the text of a present single-valued field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Gets the items of a list field
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    /// Iterates over fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to strings, nulls or string lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut record = Record::new();
        record.insert("name", FieldValue::Single(Some("Widget".to_string())));
        record.insert("score", FieldValue::Single(None));
        record.insert(
            "categories",
            FieldValue::List(vec!["Drama".to_string(), "Crime".to_string()]),
        );
        record
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut record = sample();
        record.insert("name", FieldValue::Single(Some("Gadget".to_string())));

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["name", "score", "categories"]);
        assert_eq!(record.text("name"), Some("Gadget"));
    }

    #[test]
    fn test_accessors() {
        let record = sample();
        assert_eq!(record.text("name"), Some("Widget"));
        assert_eq!(record.text("score"), None);
        assert!(record.get("score").unwrap().is_absent());
        assert_eq!(record.list("categories").unwrap().len(), 2);
        assert!(record.get("missing").is_none());
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_serializes_nulls_in_field_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Widget","score":null,"categories":["Drama","Crime"]}"#
        );
    }

    #[test]
    fn test_deserializes_back_to_equal_record() {
        let json = serde_json::to_string(&sample()).unwrap();
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_empty_list_stays_a_list() {
        let parsed: Record = serde_json::from_str(r#"{"categories":[]}"#).unwrap();
        assert_eq!(parsed.list("categories"), Some(&[][..]));
    }
}
