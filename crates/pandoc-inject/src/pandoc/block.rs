/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::pandoc::attr::Attr;
use crate::pandoc::inline::{Inline, Inlines, LineBreak};
use crate::pandoc::list::ListAttributes;
use crate::pandoc::table::{Caption, Table};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Plain(Plain),
    Paragraph(Paragraph),
    LineBlock(LineBlock),
    CodeBlock(CodeBlock),
    RawBlock(RawBlock),
    BlockQuote(BlockQuote),
    OrderedList(OrderedList),
    BulletList(BulletList),
    DefinitionList(DefinitionList),
    Header(Header),
    HorizontalRule(HorizontalRule),
    Table(Table),
    Figure(Figure),
    Div(Div),
}

pub type Blocks = Vec<Block>;

#[derive(Debug, Clone, PartialEq)]
pub struct Plain {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineBlock {
    pub content: Vec<Inlines>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub attr: Attr,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub format: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockQuote {
    pub content: Blocks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList {
    pub attr: ListAttributes,
    pub content: Vec<Blocks>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletList {
    pub content: Vec<Blocks>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionList {
    pub content: Vec<(Inlines, Vec<Blocks>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub level: usize,
    pub attr: Attr,
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalRule {}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub attr: Attr,
    pub caption: Caption,
    pub content: Blocks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Div {
    pub attr: Attr,
    pub content: Blocks,
}

impl Block {
    /// The inline content that stands in for this block when it has to be
    /// spliced into an inline context.
    ///
    /// Leaf blocks give their own inlines; containers give the inline
    /// content of their first nested block.
    pub fn into_inline_content(self) -> Inlines {
        match self {
            Block::Plain(Plain { content })
            | Block::Paragraph(Paragraph { content })
            | Block::Header(Header { content, .. }) => content,
            Block::LineBlock(lb) => {
                let mut result = Vec::new();
                for (i, line) in lb.content.into_iter().enumerate() {
                    if i > 0 {
                        result.push(Inline::LineBreak(LineBreak {}));
                    }
                    result.extend(line);
                }
                result
            }
            Block::OrderedList(OrderedList { content, .. })
            | Block::BulletList(BulletList { content }) => content
                .into_iter()
                .next()
                .map(first_block_inlines)
                .unwrap_or_default(),
            Block::BlockQuote(BlockQuote { content })
            | Block::Div(Div { content, .. })
            | Block::Figure(Figure { content, .. }) => first_block_inlines(content),
            Block::CodeBlock(_)
            | Block::RawBlock(_)
            | Block::DefinitionList(_)
            | Block::HorizontalRule(_)
            | Block::Table(_) => vec![],
        }
    }
}

fn first_block_inlines(blocks: Blocks) -> Inlines {
    blocks
        .into_iter()
        .next()
        .map(Block::into_inline_content)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pandoc::inline::{str_inline, text_to_inlines};
    use crate::pandoc::list::{ListNumberDelim, ListNumberStyle};

    #[test]
    fn test_paragraph_inline_content() {
        let block = Block::Paragraph(Paragraph {
            content: text_to_inlines("hello world"),
        });
        assert_eq!(block.into_inline_content(), text_to_inlines("hello world"));
    }

    #[test]
    fn test_ordered_list_uses_first_item() {
        let block = Block::OrderedList(OrderedList {
            attr: (1, ListNumberStyle::Decimal, ListNumberDelim::Period),
            content: vec![
                vec![Block::Plain(Plain {
                    content: vec![str_inline("first")],
                })],
                vec![Block::Plain(Plain {
                    content: vec![str_inline("second")],
                })],
            ],
        });
        assert_eq!(block.into_inline_content(), vec![str_inline("first")]);
    }

    #[test]
    fn test_line_block_joins_with_line_breaks() {
        let block = Block::LineBlock(LineBlock {
            content: vec![vec![str_inline("a")], vec![str_inline("b")]],
        });
        assert_eq!(
            block.into_inline_content(),
            vec![
                str_inline("a"),
                Inline::LineBreak(LineBreak {}),
                str_inline("b")
            ]
        );
    }

    #[test]
    fn test_code_block_has_no_inline_content() {
        let block = Block::CodeBlock(CodeBlock {
            attr: crate::pandoc::attr::empty_attr(),
            text: "x = 1".to_string(),
        });
        assert!(block.into_inline_content().is_empty());
    }
}
