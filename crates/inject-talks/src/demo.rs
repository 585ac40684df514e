/*
 * demo.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Selectors and formatters for a talks listing.

use pandoc_inject::{Formatter, FormatterRegistry, Record, Selector, SelectorRegistry};

/// Talks given after 2012.
#[derive(Default)]
pub struct Since2012;

impl Selector for Since2012 {
    fn select(&self, record: &Record) -> bool {
        record
            .get("year")
            .and_then(|year| year.as_i64())
            .is_some_and(|year| year > 2012)
    }
}

/// `*title*, venue, year`
#[derive(Default)]
pub struct Homepage;

impl Formatter for Homepage {
    fn format_entry(&self, record: &Record) -> String {
        let field = |key: &str| record.get_text(key).unwrap_or_default();
        format!("*{}*, {}, {}", field("title"), field("venue"), field("year"))
    }
}

pub fn selectors() -> SelectorRegistry {
    let mut registry = SelectorRegistry::new();
    registry.register::<Since2012>("Since2012");
    registry
}

pub fn formatters() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    registry.register::<Homepage>("Homepage");
    registry
}
