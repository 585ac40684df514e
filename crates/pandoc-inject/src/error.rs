/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for pandoc-inject

use std::path::PathBuf;
use thiserror::Error;

use crate::readers::json::JsonReadError;

/// Reasons a selection expression cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown selector: {0}")]
    UnknownSelector(String),

    #[error("Too many distinct selector tokens: {count} (at most {max} are supported)")]
    TooManyTokens { count: usize, max: usize },

    #[error("Malformed selection expression {expression:?}: {message}")]
    Malformed { expression: String, message: String },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("BibTeX syntax error in {path} at line {line}: {message}")]
    Bibtex {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Unexpected structure in {path}: {message}")]
    Shape { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to converter: {0}")]
    Io(#[from] std::io::Error),

    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Converter output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Converter output is not a Pandoc document: {0}")]
    Document(#[from] JsonReadError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum InjectError {
    #[error("Cannot read document: {0}")]
    Read(#[from] JsonReadError),

    #[error("Cannot write document: {0}")]
    Write(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

pub type Result<T> = std::result::Result<T, InjectError>;
