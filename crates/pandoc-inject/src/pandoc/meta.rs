/*
 * meta.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::pandoc::block::Blocks;
use crate::pandoc::inline::Inlines;
use crate::pandoc::stringify::{stringify_blocks, stringify_inlines};
use hashlink::LinkedHashMap;

// Pandoc's MetaValue notably does not support numbers or nulls, so we don't either
// https://pandoc.org/lua-filters.html#type-metavalue
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    MetaString(String),
    MetaBool(bool),
    MetaInlines(Inlines),
    MetaBlocks(Blocks),
    MetaList(Vec<MetaValue>),
    MetaMap(LinkedHashMap<String, MetaValue>),
}

pub type Meta = LinkedHashMap<String, MetaValue>;

impl MetaValue {
    /// Plain-text rendering of this value, like Pandoc's `stringify`.
    pub fn stringify(&self) -> String {
        match self {
            MetaValue::MetaString(s) => s.clone(),
            MetaValue::MetaBool(b) => b.to_string(),
            MetaValue::MetaInlines(inlines) => stringify_inlines(inlines),
            MetaValue::MetaBlocks(blocks) => stringify_blocks(blocks),
            MetaValue::MetaList(items) => items.iter().map(MetaValue::stringify).collect(),
            MetaValue::MetaMap(entries) => entries.values().map(MetaValue::stringify).collect(),
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::MetaList(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pandoc::inline::text_to_inlines;

    #[test]
    fn test_stringify_meta_inlines() {
        let value = MetaValue::MetaInlines(text_to_inlines("talk 2015"));
        assert_eq!(value.stringify(), "talk 2015");
    }

    #[test]
    fn test_as_list() {
        let list = MetaValue::MetaList(vec![MetaValue::MetaString("y2".to_string())]);
        assert_eq!(list.as_list().map(<[MetaValue]>::len), Some(1));
        assert!(MetaValue::MetaBool(true).as_list().is_none());
    }
}
