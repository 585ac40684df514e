/*
 * pandoc.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::pandoc::block::Blocks;
use crate::pandoc::meta::Meta;

/// The pandoc-types API version this crate reads and writes.
pub const PANDOC_API_VERSION: [u32; 2] = [1, 23];

/*
 * A data structure that mimics Pandoc's `data Pandoc` type.
 */

#[derive(Debug, Clone, PartialEq)]
pub struct Pandoc {
    pub api_version: Vec<u32>,
    pub meta: Meta,
    pub blocks: Blocks,
}

impl Default for Pandoc {
    fn default() -> Self {
        Pandoc {
            api_version: PANDOC_API_VERSION.to_vec(),
            meta: Meta::new(),
            blocks: vec![],
        }
    }
}
