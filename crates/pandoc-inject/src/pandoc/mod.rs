/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Pandoc AST types.
//!
//! A source-location-free mirror of pandoc-types, sufficient to read a
//! document from Pandoc's JSON filter protocol, rewrite it, and write it back.

pub mod attr;
pub mod block;
pub mod inline;
pub mod list;
pub mod meta;
pub mod pandoc;
pub mod stringify;
pub mod table;

pub use crate::pandoc::attr::{Attr, attr_value, empty_attr, has_class, is_empty_attr};
pub use crate::pandoc::block::{
    Block, BlockQuote, Blocks, BulletList, CodeBlock, DefinitionList, Div, Figure, Header,
    HorizontalRule, LineBlock, OrderedList, Paragraph, Plain, RawBlock,
};
pub use crate::pandoc::inline::{
    Citation, CitationMode, Cite, Code, Emph, Image, Inline, Inlines, LineBreak, Link, Math,
    MathType, Note, QuoteType, Quoted, RawInline, SmallCaps, SoftBreak, Space, Span, Str,
    Strikeout, Strong, Subscript, Superscript, Target, Underline, str_inline, text_to_inlines,
};
pub use crate::pandoc::list::{ListAttributes, ListNumberDelim, ListNumberStyle};
pub use crate::pandoc::meta::{Meta, MetaValue};
pub use crate::pandoc::pandoc::{PANDOC_API_VERSION, Pandoc};
pub use crate::pandoc::stringify::{stringify_blocks, stringify_inlines};
pub use crate::pandoc::table::{
    Alignment, Caption, Cell, ColSpec, ColWidth, Row, Table, TableBody, TableFoot, TableHead,
};
