/*
 * yaml.rs
 * Copyright (c) 2025 Posit, PBC
 */

use std::path::Path;

use serde_yaml::Value;

use crate::error::SourceError;
use crate::record::{FieldValue, Record, yaml_key};
use crate::source::SourceReader;

/// A YAML file holding a sequence of mappings, one per record.
///
/// A top-level mapping with a single sequence value (`talks: [...]`) is
/// accepted too. Empty files and `null` documents have no records.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlReader;

impl SourceReader for YamlReader {
    fn read(&self, path: &Path) -> Result<Vec<Record>, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_yaml_records(&contents).map_err(|err| match err {
            YamlRecordsError::Syntax(source) => SourceError::Yaml {
                path: path.to_path_buf(),
                source,
            },
            YamlRecordsError::Shape(message) => SourceError::Shape {
                path: path.to_path_buf(),
                message,
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum YamlRecordsError {
    #[error("{0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error("{0}")]
    Shape(String),
}

pub fn parse_yaml_records(contents: &str) -> Result<Vec<Record>, YamlRecordsError> {
    if contents.trim().is_empty() {
        return Ok(vec![]);
    }
    let value: Value = serde_yaml::from_str(contents)?;

    let items = match value {
        Value::Null => return Ok(vec![]),
        Value::Sequence(items) => items,
        Value::Mapping(mapping) if mapping.len() == 1 => match mapping.into_iter().next() {
            Some((_, Value::Sequence(items))) => items,
            _ => {
                return Err(YamlRecordsError::Shape(
                    "expected a sequence of records".to_string(),
                ));
            }
        },
        _ => {
            return Err(YamlRecordsError::Shape(
                "expected a sequence of records".to_string(),
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Mapping(entries) => Ok(entries
                .into_iter()
                .map(|(k, v)| (yaml_key(k), FieldValue::from_yaml(v)))
                .collect()),
            _ => Err(YamlRecordsError::Shape(format!(
                "record {} is not a mapping",
                i + 1
            ))),
        })
        .collect()
}
