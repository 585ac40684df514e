/*
 * injector.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The injection pass.
//!
//! Every Div or Span carrying the configured class is a marker. For each
//! marker the injector parses its `source`, `select`, `format` and `kind`
//! attributes, loads the sources (through the cache), selects and stars
//! records, renders them with the named formatter, converts the text back
//! into nodes and splices the result in place of the marker. A Span keeps
//! only the inline content of the first converted block.
//!
//! Failures stay local to their marker: they are reported through the
//! injector's [`DiagnosticCollector`] and the marker renders as nothing.

use std::io::{Read, Write};

use crate::config::InjectConfig;
use crate::convert::{PandocConverter, TextToNodes};
use crate::diagnostics::DiagnosticCollector;
use crate::error::Result;
use crate::filters::{Filter, FilterReturn, topdown_traverse};
use crate::formatter::{FormatterRegistry, format_entries};
use crate::pandoc::{Attr, Block, Blocks, Div, Inlines, Pandoc, Span, attr_value, has_class};
use crate::readers;
use crate::selector::{SelectorRegistry, select_entries};
use crate::source::{ReaderRegistry, SourceCache, load_source};
use crate::star::{get_starred, star_ids};
use crate::writers;

pub const DEFAULT_KIND: &str = "default";

/// Arguments read from a marker's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InjectArgs {
    /// Whitespace-separated source files.
    pub source: String,
    pub select: String,
    pub format: Option<String>,
    pub kind: String,
}

impl InjectArgs {
    pub fn from_attr(attr: &Attr, diagnostics: &mut DiagnosticCollector) -> Self {
        let values = |key: &str| -> Vec<String> {
            attr_value(attr, key)
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };

        let kinds = values("kind");
        let formats = values("format");
        if kinds.is_empty() {
            diagnostics.warn("no \"kind\" specified, reverting to default");
        } else if kinds.len() > 1 {
            diagnostics.warn("only one kind allowed, ignoring all except first");
        }
        if formats.len() > 1 {
            diagnostics.warn("only one formatter allowed, ignoring all except first");
        }

        InjectArgs {
            source: values("source").join(" "),
            select: values("select").join(" "),
            format: formats.into_iter().next(),
            kind: kinds
                .into_iter()
                .next()
                .unwrap_or_else(|| DEFAULT_KIND.to_string()),
        }
    }

    pub fn format_name(&self) -> &str {
        self.format.as_deref().unwrap_or("")
    }
}

pub struct Injector {
    config: InjectConfig,
    readers: ReaderRegistry,
    selectors: SelectorRegistry,
    formatters: FormatterRegistry,
    converter: Box<dyn TextToNodes>,
    cache: SourceCache,
    diagnostics: DiagnosticCollector,
}

impl Injector {
    pub fn new(
        config: InjectConfig,
        readers: ReaderRegistry,
        selectors: SelectorRegistry,
        formatters: FormatterRegistry,
        converter: impl TextToNodes + 'static,
    ) -> Self {
        Injector {
            config,
            readers,
            selectors,
            formatters,
            converter: Box::new(converter),
            cache: SourceCache::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// An injector with the default readers that converts through pandoc.
    pub fn with_pandoc(
        config: InjectConfig,
        selectors: SelectorRegistry,
        formatters: FormatterRegistry,
    ) -> Self {
        let converter = PandocConverter::from_config(&config);
        Self::new(
            config,
            ReaderRegistry::with_defaults(),
            selectors,
            formatters,
            converter,
        )
    }

    pub fn config(&self) -> &InjectConfig {
        &self.config
    }

    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }

    pub fn is_marker(&self, attr: &Attr) -> bool {
        has_class(attr, &self.config.match_class)
    }

    /// Load, select, star and render; returns the text and its format.
    pub fn render(&mut self, args: &InjectArgs, star_ids: &[String]) -> (String, String) {
        let records = load_source(
            &args.source,
            &self.readers,
            &mut self.cache,
            &mut self.diagnostics,
        );

        let selected = match select_entries(&records, &self.selectors, &args.select) {
            Ok(selected) => selected,
            Err(err) => {
                self.diagnostics
                    .error(format!("selection {:?} failed: {}", args.select, err));
                vec![]
            }
        };

        self.diagnostics.info(format!(
            "{} [{}]: loaded {} records from {:?}, selected {}",
            self.config.kind_label(),
            args.kind,
            records.len(),
            args.source,
            selected.len()
        ));

        let starred = get_starred(&selected, star_ids);
        format_entries(
            selected,
            &self.formatters,
            args.format_name(),
            &starred,
            &mut self.diagnostics,
        )
    }

    /// The blocks that replace the marker with attributes `attr`.
    pub fn inject(&mut self, attr: &Attr, star_ids: &[String]) -> Blocks {
        let args = InjectArgs::from_attr(attr, &mut self.diagnostics);
        let (text, format) = self.render(&args, star_ids);
        if text.trim().is_empty() {
            return vec![];
        }
        match self.converter.convert(&text, &format) {
            Ok(blocks) => blocks,
            Err(err) => {
                self.diagnostics
                    .error(format!("cannot convert {} output: {}", format, err));
                vec![]
            }
        }
    }

    /// Replace every marker in `doc`. Injected content is not scanned again.
    pub fn transform(&mut self, doc: &mut Pandoc) {
        let star_ids = star_ids(&doc.meta);
        let mut pass = InjectPass {
            injector: self,
            star_ids,
        };
        *doc = topdown_traverse(std::mem::take(doc), &mut pass);
    }

    /// Read a Pandoc JSON document, transform it and write it back.
    pub fn filter_json<R: Read, W: Write>(&mut self, reader: &mut R, writer: &mut W) -> Result<()> {
        let mut doc = readers::json::read(reader)?;
        self.transform(&mut doc);
        writers::json::write(&doc, writer)?;
        writer.flush()?;
        Ok(())
    }
}

struct InjectPass<'a> {
    injector: &'a mut Injector,
    star_ids: Vec<String>,
}

impl Filter for InjectPass<'_> {
    fn div(&mut self, div: Div) -> FilterReturn<Div, Blocks> {
        if !self.injector.is_marker(&div.attr) {
            return FilterReturn::Unchanged(div);
        }
        FilterReturn::FilterResult(self.injector.inject(&div.attr, &self.star_ids), false)
    }

    fn span(&mut self, span: Span) -> FilterReturn<Span, Inlines> {
        if !self.injector.is_marker(&span.attr) {
            return FilterReturn::Unchanged(span);
        }
        let inlines = self
            .injector
            .inject(&span.attr, &self.star_ids)
            .into_iter()
            .next()
            .map(Block::into_inline_content)
            .unwrap_or_default();
        FilterReturn::FilterResult(inlines, false)
    }
}
