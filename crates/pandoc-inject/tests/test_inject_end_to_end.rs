/*
 * test_inject_end_to_end.rs
 * Copyright (c) 2025 Posit, PBC
 */

use pandoc_inject::error::ConvertError;
use pandoc_inject::pandoc::{Block, Blocks, Inline, Paragraph, Plain, text_to_inlines};
use pandoc_inject::source::load_file;
use pandoc_inject::{
    DiagnosticCollector, DiagnosticKind, Formatter, FormatterRegistry, InjectConfig, Injector,
    ReaderRegistry, Record, Selector, SelectorRegistry, SourceCache, TextToNodes,
};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tempfile::NamedTempFile;

#[derive(Default)]
struct Since2012;

impl Selector for Since2012 {
    fn select(&self, record: &Record) -> bool {
        record
            .get("year")
            .and_then(|year| year.as_i64())
            .is_some_and(|year| year > 2012)
    }
}

#[derive(Default)]
struct Homepage;

impl Formatter for Homepage {
    fn format_entry(&self, record: &Record) -> String {
        format!(
            "*{}*, {}, {}",
            record.get_text("title").unwrap_or_default(),
            record.get_text("venue").unwrap_or_default(),
            record.get_text("year").unwrap_or_default()
        )
    }
}

/// Records what it was asked to convert and answers with one paragraph per
/// non-empty line.
#[derive(Clone, Default)]
struct RecordingConverter {
    calls: Rc<RefCell<Vec<(String, String)>>>,
}

impl TextToNodes for RecordingConverter {
    fn convert(&mut self, text: &str, format: &str) -> Result<Blocks, ConvertError> {
        self.calls
            .borrow_mut()
            .push((text.to_string(), format.to_string()));
        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                Block::Paragraph(Paragraph {
                    content: text_to_inlines(line),
                })
            })
            .collect())
    }
}

fn talks_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
- uuid: a
  year: 2010
  title: Old Talk
  venue: Somewhere
- uuid: b
  year: 2015
  title: Rust Talk
  venue: RustConf
"#
    )
    .unwrap();
    file
}

fn injector(converter: RecordingConverter) -> Injector {
    let mut selectors = SelectorRegistry::new();
    selectors.register::<Since2012>("Since2012");
    let mut formatters = FormatterRegistry::new();
    formatters.register::<Homepage>("Homepage");
    Injector::new(
        InjectConfig::default(),
        ReaderRegistry::with_defaults(),
        selectors,
        formatters,
        converter,
    )
}

fn marker(source: &str, select: &str, format: &str) -> Value {
    json!(["", ["FILTER-inject"], [
        ["source", source],
        ["select", select],
        ["format", format],
        ["kind", "talk"]
    ]])
}

fn document(meta: Value, blocks: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": meta,
        "blocks": blocks
    }))
    .unwrap()
}

#[test]
fn test_div_marker_through_json_filter() {
    let talks = talks_file();
    let source = talks.path().to_string_lossy().into_owned();
    let converter = RecordingConverter::default();
    let calls = Rc::clone(&converter.calls);
    let mut injector = injector(converter);

    let input = document(
        json!({}),
        json!([
            {"t": "Header", "c": [2, ["talks", [], []], [{"t": "Str", "c": "Talks"}]]},
            {"t": "Div", "c": [marker(&source, "Since2012", "Homepage"), []]}
        ]),
    );
    let mut output = Vec::new();
    injector
        .filter_json(&mut input.as_slice(), &mut output)
        .unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![(
            "1.  *Rust Talk*, RustConf, 2015\n\n".to_string(),
            "markdown".to_string()
        )]
    );

    let written: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        written["blocks"],
        json!([
            {"t": "Header", "c": [2, ["talks", [], []], [{"t": "Str", "c": "Talks"}]]},
            {"t": "Para", "c": [
                {"t": "Str", "c": "1."},
                {"t": "Space"},
                {"t": "Str", "c": "*Rust"},
                {"t": "Space"},
                {"t": "Str", "c": "Talk*,"},
                {"t": "Space"},
                {"t": "Str", "c": "RustConf,"},
                {"t": "Space"},
                {"t": "Str", "c": "2015"}
            ]}
        ])
    );
    assert!(!injector.diagnostics().has_errors());
}

#[test]
fn test_star_metadata_marks_entries() {
    let talks = talks_file();
    let source = talks.path().to_string_lossy().into_owned();
    let converter = RecordingConverter::default();
    let calls = Rc::clone(&converter.calls);
    let mut injector = injector(converter);

    let input = document(
        json!({"star": {"t": "MetaList", "c": [
            {"t": "MetaInlines", "c": [{"t": "Str", "c": "b"}]}
        ]}}),
        json!([{"t": "Div", "c": [marker(&source, "", "Homepage"), []]}]),
    );
    let mut output = Vec::new();
    injector
        .filter_json(&mut input.as_slice(), &mut output)
        .unwrap();

    assert_eq!(
        calls.borrow()[0].0,
        "1.  *Old Talk*, Somewhere, 2010\n\n1.  \\* *Rust Talk*, RustConf, 2015\n\n"
    );
}

#[test]
fn test_span_marker_splices_inlines() {
    let talks = talks_file();
    let source = talks.path().to_string_lossy().into_owned();
    let mut injector = injector(RecordingConverter::default());

    let input = document(
        json!({}),
        json!([{"t": "Para", "c": [
            {"t": "Str", "c": "Latest:"},
            {"t": "Space"},
            {"t": "Span", "c": [marker(&source, "uuid=b", "Homepage"), []]}
        ]}]),
    );
    let mut doc = pandoc_inject::readers::json::read(&mut input.as_slice()).unwrap();
    injector.transform(&mut doc);

    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected a paragraph, got {:?}", doc.blocks[0]);
    };
    assert_eq!(paragraph.content.len(), 2 + 9);
    assert!(matches!(&paragraph.content[2], Inline::Str(s) if s.text == "1."));
    assert!(
        !paragraph
            .content
            .iter()
            .any(|inline| matches!(inline, Inline::Span(_)))
    );
}

#[test]
fn test_unknown_formatter_removes_marker() {
    let talks = talks_file();
    let source = talks.path().to_string_lossy().into_owned();
    let converter = RecordingConverter::default();
    let calls = Rc::clone(&converter.calls);
    let mut injector = injector(converter);

    let input = document(
        json!({}),
        json!([
            {"t": "Div", "c": [marker(&source, "", "Nope"), []]},
            {"t": "Plain", "c": [{"t": "Str", "c": "after"}]}
        ]),
    );
    let mut doc = pandoc_inject::readers::json::read(&mut input.as_slice()).unwrap();
    injector.transform(&mut doc);

    assert_eq!(
        doc.blocks,
        vec![Block::Plain(Plain {
            content: text_to_inlines("after")
        })]
    );
    assert!(calls.borrow().is_empty());
    assert_eq!(
        injector.diagnostics().messages(DiagnosticKind::Error),
        vec!["Unknown formatter: \"Nope\""]
    );
}

#[test]
fn test_missing_source_file_is_reported_and_cached() {
    let mut injector = injector(RecordingConverter::default());
    let input = document(
        json!({}),
        json!([
            {"t": "Div", "c": [marker("/nonexistent/talks.yaml", "", "Homepage"), []]},
            {"t": "Div", "c": [marker("/nonexistent/talks.yaml", "", "Homepage"), []]}
        ]),
    );
    let mut doc = pandoc_inject::readers::json::read(&mut input.as_slice()).unwrap();
    injector.transform(&mut doc);

    assert!(doc.blocks.is_empty());
    // the failed read is cached, so it is reported once
    assert_eq!(
        injector.diagnostics().messages(DiagnosticKind::Error).len(),
        1
    );
    assert!(injector.cache().contains("/nonexistent/talks.yaml"));
}

#[test]
fn test_cache_returns_identical_records() {
    let talks = talks_file();
    let source = talks.path().to_string_lossy().into_owned();
    let readers = ReaderRegistry::with_defaults();
    let mut cache = SourceCache::new();
    let mut diagnostics = DiagnosticCollector::new();

    let first = load_file(&source, &readers, &mut cache, &mut diagnostics);
    let second = load_file(&source, &readers, &mut cache, &mut diagnostics);

    assert_eq!(first.len(), 2);
    assert!(Rc::ptr_eq(&first, &second));
    assert!(
        first
            .iter()
            .zip(second.iter())
            .all(|(a, b)| Rc::ptr_eq(a, b))
    );
}
