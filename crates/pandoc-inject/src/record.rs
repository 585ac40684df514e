/*
 * record.rs
 * Copyright (c) 2025 Posit, PBC
 */

use indexmap::IndexMap;
use std::fmt;

/// A field value as loaded from a source file. Scalars keep the type the
/// source gave them.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// Textual form of a scalar. Lists, maps and nulls have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(n) => Some(n.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null | FieldValue::List(_) | FieldValue::Map(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value; numeric text (e.g. a BibTeX `year`) is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn from_json(value: serde_json::Value) -> FieldValue {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from_json).collect())
            }
            serde_json::Value::Object(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn from_yaml(value: serde_yaml::Value) -> FieldValue {
        match value {
            serde_yaml::Value::Null => FieldValue::Null,
            serde_yaml::Value::Bool(b) => FieldValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => FieldValue::Text(s),
            serde_yaml::Value::Sequence(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), FieldValue::from_yaml(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => FieldValue::from_yaml(tagged.value),
        }
    }
}

/// Mapping keys are used as field names, so non-string scalars are
/// rendered to text.
pub(crate) fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => FieldValue::from_yaml(other).to_string(),
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            FieldValue::Map(entries) => write_entries(f, entries),
        }
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &IndexMap<String, FieldValue>) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", key, value)?;
    }
    write!(f, "}}")
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

/// One loaded item: an ordered mapping from field name to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Textual form of a scalar field.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn uuid(&self) -> Option<String> {
        self.get_text("uuid")
    }

    pub fn slug(&self) -> Option<String> {
        self.get_text("slug")
    }

    /// `record.get(field) == value`, compared on the textual form so that
    /// `uuid=42` matches both `uuid: 42` and `uuid: "42"`.
    pub fn matches_field(&self, field: &str, value: &str) -> bool {
        self.get_text(field).is_some_and(|text| text == value)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entries(f, &self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_field_compares_text() {
        let record = Record::new().with("uuid", 42i64).with("slug", "rust-2015");
        assert!(record.matches_field("uuid", "42"));
        assert!(record.matches_field("slug", "rust-2015"));
        assert!(!record.matches_field("slug", "rust"));
        assert!(!record.matches_field("title", "anything"));
    }

    #[test]
    fn test_as_i64_parses_text() {
        assert_eq!(FieldValue::from("2015").as_i64(), Some(2015));
        assert_eq!(FieldValue::from(" 2010 ").as_i64(), Some(2010));
        assert_eq!(FieldValue::Float(2012.0).as_i64(), Some(2012));
        assert_eq!(FieldValue::from("n.d.").as_i64(), None);
    }

    #[test]
    fn test_from_yaml_keeps_order_and_types() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("uuid: b\nyear: 2015\ntags: [rust, talk]\n").unwrap();
        let FieldValue::Map(entries) = FieldValue::from_yaml(value) else {
            panic!("expected a map");
        };
        let record: Record = entries.into_iter().collect();

        assert_eq!(record.uuid().as_deref(), Some("b"));
        assert_eq!(record.get("year"), Some(&FieldValue::Integer(2015)));
        insta::assert_snapshot!(record.to_string(), @"{uuid: b, year: 2015, tags: [rust, talk]}");
    }

    #[test]
    fn test_from_json_numbers() {
        let value: serde_json::Value = serde_json::json!({"year": 2015, "score": 1.5});
        let FieldValue::Map(entries) = FieldValue::from_json(value) else {
            panic!("expected a map");
        };
        assert_eq!(entries.get("year"), Some(&FieldValue::Integer(2015)));
        assert_eq!(entries.get("score"), Some(&FieldValue::Float(1.5)));
    }
}
