/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A Pandoc JSON filter that replaces marker Divs and Spans with formatted
//! record listings.
//!
//! A marker looks like
//!
//! ```markdown
//! ::: {.FILTER-inject source="talks.yaml" select="Since2012 and not slug=old" format="Homepage" kind="talk"}
//! :::
//! ```
//!
//! Records are loaded from YAML, CSL-JSON or BibTeX files, narrowed with a
//! boolean selection expression over named selectors and `field=value`
//! tokens, rendered by a named formatter and converted back into document
//! nodes. Selectors and formatters are supplied by the host program through
//! [`SelectorRegistry`] and [`FormatterRegistry`].

pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod filters;
pub mod formatter;
pub mod injector;
pub mod pandoc;
pub mod readers;
pub mod record;
pub mod selector;
pub mod source;
pub mod star;
pub mod writers;

pub use crate::config::InjectConfig;
pub use crate::convert::{PandocConverter, TextToNodes};
pub use crate::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind};
pub use crate::error::{InjectError, Result};
pub use crate::formatter::{Formatter, FormatterRegistry};
pub use crate::injector::{InjectArgs, Injector};
pub use crate::record::{FieldValue, Record};
pub use crate::selector::{Selector, SelectorRegistry};
pub use crate::source::{ReaderRegistry, SourceCache, SourceReader};
pub use crate::star::StarredSet;
