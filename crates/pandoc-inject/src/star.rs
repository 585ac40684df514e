/*
 * star.rs
 * Copyright (c) 2025 Posit, PBC
 */

use std::rc::Rc;

use crate::pandoc::{Meta, MetaValue};
use crate::record::Record;

/// Metadata field listing starred identifiers.
pub const STAR_META_KEY: &str = "star";

/// Records flagged for distinguished formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarredSet {
    records: Vec<Rc<Record>>,
}

impl StarredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.records.iter().any(|r| r.as_ref() == record)
    }

    pub fn records(&self) -> &[Rc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Identifiers from the document's `star` list. Each item is stringified;
/// a missing or non-list value means nothing is starred.
pub fn star_ids(meta: &Meta) -> Vec<String> {
    meta.get(STAR_META_KEY)
        .and_then(MetaValue::as_list)
        .map(|items| items.iter().map(MetaValue::stringify).collect())
        .unwrap_or_default()
}

/// The records whose `uuid`, or failing that `slug`, is listed in
/// `star_ids`. Order follows `records`.
pub fn get_starred(records: &[Rc<Record>], star_ids: &[String]) -> StarredSet {
    let listed = |id: Option<String>| id.is_some_and(|id| star_ids.contains(&id));
    StarredSet {
        records: records
            .iter()
            .filter(|record| listed(record.uuid()) || listed(record.slug()))
            .cloned()
            .collect(),
    }
}
