/*
 * select.rs
 * Copyright (c) 2025 Posit, PBC
 */

use std::rc::Rc;

use crate::error::SelectionError;
use crate::record::Record;
use crate::selector::SelectorRegistry;
use crate::selector::expression::CompiledExpression;

/// The records for which `expression` holds, in their original order.
///
/// A blank expression selects every record. A compile error selects
/// nothing; the caller decides how to report it.
pub fn select_entries(
    records: &[Rc<Record>],
    registry: &SelectorRegistry,
    expression: &str,
) -> Result<Vec<Rc<Record>>, SelectionError> {
    if records.is_empty() {
        return Ok(vec![]);
    }
    if expression.trim().is_empty() {
        return Ok(records.to_vec());
    }

    let compiled = CompiledExpression::compile(expression, registry)?;
    Ok(records
        .iter()
        .filter(|record| compiled.evaluate(record))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;

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

    fn talks() -> Vec<Rc<Record>> {
        vec![
            Rc::new(Record::new().with("uuid", "a").with("year", 2010i64)),
            Rc::new(Record::new().with("uuid", "b").with("year", 2015i64)),
            Rc::new(
                Record::new()
                    .with("uuid", "c")
                    .with("slug", "late")
                    .with("year", 2019i64),
            ),
        ]
    }

    fn uuids(records: &[Rc<Record>]) -> Vec<String> {
        records.iter().filter_map(|r| r.uuid()).collect()
    }

    #[test]
    fn test_blank_expression_passes_through() {
        let records = talks();
        for expression in ["", "   "] {
            let selected = select_entries(&records, &SelectorRegistry::new(), expression).unwrap();
            assert_eq!(selected.len(), records.len());
            assert!(selected.iter().zip(&records).all(|(a, b)| Rc::ptr_eq(a, b)));
        }
    }

    #[test]
    fn test_empty_records_short_circuit() {
        // even a malformed expression is not compiled when there is nothing to select
        let selected = select_entries(&[], &SelectorRegistry::new(), "(((").unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_named_selector() {
        let mut registry = SelectorRegistry::new();
        registry.register::<Since2012>("Since2012");

        let selected = select_entries(&talks(), &registry, "Since2012").unwrap();
        assert_eq!(uuids(&selected), vec!["b", "c"]);
    }

    #[test]
    fn test_field_and_named_tokens_combine() {
        let mut registry = SelectorRegistry::new();
        registry.register::<Since2012>("Since2012");

        let selected =
            select_entries(&talks(), &registry, "Since2012 and not slug=late or uuid=a").unwrap();
        assert_eq!(uuids(&selected), vec!["a", "b"]);
    }

    #[test]
    fn test_compile_error_propagates() {
        let err = select_entries(&talks(), &SelectorRegistry::new(), "Since2012").unwrap_err();
        assert_eq!(err, SelectionError::UnknownSelector("Since2012".to_string()));
    }
}
