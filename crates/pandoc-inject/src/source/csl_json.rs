/*
 * csl_json.rs
 * Copyright (c) 2025 Posit, PBC
 */

use std::path::Path;

use serde_json::Value;

use crate::error::SourceError;
use crate::record::{FieldValue, Record};
use crate::source::SourceReader;

/// A JSON array of objects, as produced by CSL-JSON exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct CslJsonReader;

impl SourceReader for CslJsonReader {
    fn read(&self, path: &Path) -> Result<Vec<Record>, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let shape = |message: String| SourceError::Shape {
            path: path.to_path_buf(),
            message,
        };
        let Value::Array(items) = value else {
            return Err(shape("expected an array of records".to_string()));
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(entries) => Ok(entries
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from_json(v)))
                    .collect()),
                _ => Err(shape(format!("record {} is not an object", i + 1))),
            })
            .collect()
    }
}
