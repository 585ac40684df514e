/*
 * formatter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering selected records to text.

use std::collections::HashMap;
use std::rc::Rc;

use crate::diagnostics::DiagnosticCollector;
use crate::record::Record;
use crate::star::StarredSet;

/// Format used when no formatter could be found.
pub const DEFAULT_OUTPUT_FORMAT: &str = "markdown";

/// Renders a block of records.
///
/// Only [`Formatter::format_entry`] usually needs overriding. The default
/// block is a loose numbered Markdown list with starred items prefixed by
/// an escaped `*`.
pub trait Formatter {
    /// Pandoc input format of the rendered text, e.g. `markdown` or `html`.
    fn output_format(&self) -> &str {
        DEFAULT_OUTPUT_FORMAT
    }

    /// Order in which records are rendered.
    fn sort_entries(&self, records: Vec<Rc<Record>>) -> Vec<Rc<Record>> {
        records
    }

    fn format_block(&self, records: &[Rc<Record>], starred: &StarredSet) -> String {
        let mut out = String::new();
        for record in records {
            out.push_str("1.  ");
            if starred.contains(record) {
                out.push_str("\\* ");
            }
            out.push_str(&self.format_entry(record));
            out.push_str("\n\n");
        }
        out
    }

    fn format_entry(&self, record: &Record) -> String {
        record.to_string()
    }
}

pub type FormatterFactory = fn() -> Box<dyn Formatter>;

fn make_formatter<F: Formatter + Default + 'static>() -> Box<dyn Formatter> {
    Box::new(F::default())
}

#[derive(Default, Clone)]
pub struct FormatterRegistry {
    factories: HashMap<String, FormatterFactory>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: Formatter + Default + 'static>(&mut self, name: &str) -> &mut Self {
        self.register_factory(name, make_formatter::<F>)
    }

    pub fn register_factory(&mut self, name: &str, factory: FormatterFactory) -> &mut Self {
        self.factories.insert(name.to_string(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Formatter>> {
        self.factories.get(name).map(|factory| factory())
    }
}

/// Render `records` with the named formatter, returning the text and its
/// format. An unknown name is reported and renders as `("", "markdown")`.
pub fn format_entries(
    records: Vec<Rc<Record>>,
    formatters: &FormatterRegistry,
    name: &str,
    starred: &StarredSet,
    diagnostics: &mut DiagnosticCollector,
) -> (String, String) {
    let Some(formatter) = formatters.create(name) else {
        diagnostics.error(format!("Unknown formatter: {:?}", name));
        return (String::new(), DEFAULT_OUTPUT_FORMAT.to_string());
    };
    let sorted = formatter.sort_entries(records);
    let text = formatter.format_block(&sorted, starred);
    (text, formatter.output_format().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::star::get_starred;

    #[derive(Default)]
    struct Plain;

    impl Formatter for Plain {}

    #[derive(Default)]
    struct TitlesByYear;

    impl Formatter for TitlesByYear {
        fn output_format(&self) -> &str {
            "html"
        }

        fn sort_entries(&self, mut records: Vec<Rc<Record>>) -> Vec<Rc<Record>> {
            records.sort_by_key(|r| r.get("year").and_then(|y| y.as_i64()));
            records
        }

        fn format_entry(&self, record: &Record) -> String {
            record.get_text("title").unwrap_or_default()
        }
    }

    fn registry() -> FormatterRegistry {
        let mut registry = FormatterRegistry::new();
        registry.register::<Plain>("Plain");
        registry.register::<TitlesByYear>("TitlesByYear");
        registry
    }

    fn talks() -> Vec<Rc<Record>> {
        vec![
            Rc::new(
                Record::new()
                    .with("uuid", "b")
                    .with("title", "Later")
                    .with("year", 2015i64),
            ),
            Rc::new(
                Record::new()
                    .with("uuid", "a")
                    .with("title", "Earlier")
                    .with("year", 2010i64),
            ),
        ]
    }

    #[test]
    fn test_default_block_marks_starred_entries() {
        let records = talks();
        let starred = get_starred(&records, &["a".to_string()]);
        let mut diagnostics = DiagnosticCollector::new();

        let (text, format) =
            format_entries(records, &registry(), "Plain", &starred, &mut diagnostics);

        assert_eq!(format, "markdown");
        assert_eq!(
            text,
            "1.  {uuid: b, title: Later, year: 2015}\n\n1.  \\* {uuid: a, title: Earlier, year: 2010}\n\n"
        );
    }

    #[test]
    fn test_sort_and_output_format() {
        let mut diagnostics = DiagnosticCollector::new();
        let (text, format) = format_entries(
            talks(),
            &registry(),
            "TitlesByYear",
            &StarredSet::new(),
            &mut diagnostics,
        );
        assert_eq!(format, "html");
        insta::assert_snapshot!(text.replace('\n', "|"), @"1.  Earlier||1.  Later||");
    }

    #[test]
    fn test_unknown_formatter_falls_back() {
        let mut diagnostics = DiagnosticCollector::new();
        let result = format_entries(
            talks(),
            &registry(),
            "Nope",
            &StarredSet::new(),
            &mut diagnostics,
        );
        assert_eq!(result, (String::new(), "markdown".to_string()));
        assert_eq!(
            diagnostics.messages(DiagnosticKind::Error),
            vec!["Unknown formatter: \"Nope\""]
        );
    }
}
