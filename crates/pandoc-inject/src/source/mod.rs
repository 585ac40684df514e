/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading record files.
//!
//! A [`SourceReader`] turns one file into records. Readers are looked up by
//! file extension in a [`ReaderRegistry`]; files with no registered reader
//! contribute nothing. Loaded files are kept in a [`SourceCache`] for the
//! rest of the pass, so every file is read at most once.

pub mod bibtex;
pub mod csl_json;
pub mod yaml;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use crate::diagnostics::DiagnosticCollector;
use crate::error::SourceError;
use crate::record::Record;

pub use bibtex::BibtexReader;
pub use csl_json::CslJsonReader;
pub use yaml::YamlReader;

/// The records of one source file, shared between the cache and callers.
pub type Records = Rc<[Rc<Record>]>;

pub trait SourceReader {
    fn read(&self, path: &Path) -> Result<Vec<Record>, SourceError>;
}

/// Lower-cased extension including the leading dot (`.yaml`).
pub fn extension_key(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

#[derive(Default)]
pub struct ReaderRegistry {
    readers: HashMap<String, Rc<dyn SourceReader>>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `.yaml`/`.yml`, `.json` (CSL-JSON style) and `.bib`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let yaml: Rc<dyn SourceReader> = Rc::new(YamlReader);
        registry.register_shared(".yaml", Rc::clone(&yaml));
        registry.register_shared(".yml", yaml);
        registry.register(".json", CslJsonReader);
        registry.register(".bib", BibtexReader);
        registry
    }

    /// Register a reader for an extension. A missing leading dot is added and
    /// the extension is matched case-insensitively.
    pub fn register<R: SourceReader + 'static>(&mut self, extension: &str, reader: R) -> &mut Self {
        self.register_shared(extension, Rc::new(reader))
    }

    fn register_shared(&mut self, extension: &str, reader: Rc<dyn SourceReader>) -> &mut Self {
        let key = if extension.starts_with('.') {
            extension.to_lowercase()
        } else {
            format!(".{}", extension.to_lowercase())
        };
        self.readers.insert(key, reader);
        self
    }

    pub fn reader_for(&self, path: &Path) -> Option<&dyn SourceReader> {
        extension_key(path)
            .and_then(|key| self.readers.get(&key))
            .map(|reader| reader.as_ref())
    }
}

/// Loaded files, keyed by the filename as written in the document.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<String, Records>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<Records> {
        self.entries.get(filename).cloned()
    }

    pub fn insert(&mut self, filename: impl Into<String>, records: Records) {
        self.entries.insert(filename.into(), records);
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records of a single file, from the cache when it has been loaded before.
///
/// Reader failures are reported and cached as an empty file.
pub fn load_file(
    filename: &str,
    readers: &ReaderRegistry,
    cache: &mut SourceCache,
    diagnostics: &mut DiagnosticCollector,
) -> Records {
    if let Some(records) = cache.get(filename) {
        tracing::debug!("source cache hit: {}", filename);
        return records;
    }

    let path = Path::new(filename);
    let records: Vec<Rc<Record>> = match readers.reader_for(path) {
        None => {
            tracing::debug!("no reader for {}; skipping", filename);
            vec![]
        }
        Some(reader) => match reader.read(path) {
            Ok(records) => {
                check_identities(filename, &records, diagnostics);
                records.into_iter().map(Rc::new).collect()
            }
            Err(err) => {
                diagnostics.error(err.to_string());
                vec![]
            }
        },
    };

    let records: Records = records.into();
    cache.insert(filename, Rc::clone(&records));
    records
}

/// Records of every file in a whitespace-separated list, in list order.
pub fn load_source(
    file_list: &str,
    readers: &ReaderRegistry,
    cache: &mut SourceCache,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<Rc<Record>> {
    let mut result = Vec::new();
    for filename in file_list.split_whitespace() {
        let records = load_file(filename, readers, cache, diagnostics);
        result.extend(records.iter().cloned());
    }
    result
}

fn check_identities(filename: &str, records: &[Record], diagnostics: &mut DiagnosticCollector) {
    for (field, get) in [
        ("uuid", Record::uuid as fn(&Record) -> Option<String>),
        ("slug", Record::slug),
    ] {
        let mut seen = HashSet::new();
        for value in records.iter().filter_map(get) {
            if !seen.insert(value.clone()) {
                diagnostics.warn(format!(
                    "duplicate {} {:?} in {}",
                    field, value, filename
                ));
            }
        }
    }
}
