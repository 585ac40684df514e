/*
 * filters.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::pandoc::{self, Block, Blocks, Caption, Inline, Inlines, Pandoc, Row};

// filters are destructive and take ownership of the input

pub enum FilterReturn<T, U> {
    Unchanged(T),
    FilterResult(U, bool), // (new content, should recurse)
}

/// Hooks called during a top-down walk of the document.
///
/// Returning `Unchanged` keeps the node and descends into its children.
/// Returning `FilterResult` splices the new content in place of the node;
/// the bool asks the walk to descend into the new content as well.
pub trait Filter {
    fn div(&mut self, div: pandoc::Div) -> FilterReturn<pandoc::Div, Blocks> {
        FilterReturn::Unchanged(div)
    }

    fn span(&mut self, span: pandoc::Span) -> FilterReturn<pandoc::Span, Inlines> {
        FilterReturn::Unchanged(span)
    }
}

trait InlineFilterableStructure {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Inline;
}

macro_rules! impl_inline_filterable_terminal {
    ($($variant:ident),*) => {
        $(
            impl InlineFilterableStructure for pandoc::$variant {
                fn filter_structure<F: Filter + ?Sized>(self, _: &mut F) -> Inline {
                    Inline::$variant(self)
                }
            }
        )*
    };
}
impl_inline_filterable_terminal!(Str, Code, Space, SoftBreak, LineBreak, Math, RawInline);

macro_rules! impl_inline_filterable_simple {
    ($($variant:ident),*) => {
        $(
            impl InlineFilterableStructure for pandoc::$variant {
                fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Inline {
                    Inline::$variant(pandoc::$variant {
                        content: topdown_traverse_inlines(self.content, filter),
                        ..self
                    })
                }
            }
        )*
    };
}
impl_inline_filterable_simple!(
    Emph,
    Underline,
    Strong,
    Strikeout,
    Superscript,
    Subscript,
    SmallCaps,
    Quoted,
    Link,
    Image,
    Span
);

impl InlineFilterableStructure for pandoc::Note {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Inline {
        Inline::Note(pandoc::Note {
            content: topdown_traverse_blocks(self.content, filter),
        })
    }
}

impl InlineFilterableStructure for pandoc::Cite {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Inline {
        Inline::Cite(pandoc::Cite {
            citations: self
                .citations
                .into_iter()
                .map(|cit| pandoc::Citation {
                    prefix: topdown_traverse_inlines(cit.prefix, filter),
                    suffix: topdown_traverse_inlines(cit.suffix, filter),
                    ..cit
                })
                .collect(),
            content: topdown_traverse_inlines(self.content, filter),
        })
    }
}

trait BlockFilterableStructure {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block;
}

macro_rules! impl_block_filterable_terminal {
    ($($variant:ident),*) => {
        $(
            impl BlockFilterableStructure for pandoc::$variant {
                fn filter_structure<F: Filter + ?Sized>(self, _: &mut F) -> Block {
                    Block::$variant(self)
                }
            }
        )*
    };
}
impl_block_filterable_terminal!(CodeBlock, RawBlock, HorizontalRule);

macro_rules! impl_block_filterable_simple {
    ($($variant:ident),*) => {
        $(
            impl BlockFilterableStructure for pandoc::$variant {
                fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
                    Block::$variant(pandoc::$variant {
                        content: topdown_traverse_blocks(self.content, filter),
                        ..self
                    })
                }
            }
        )*
    };
}
impl_block_filterable_simple!(BlockQuote, Div);

macro_rules! impl_block_filterable_inlines {
    ($($variant:ident),*) => {
        $(
            impl BlockFilterableStructure for pandoc::$variant {
                fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
                    Block::$variant(pandoc::$variant {
                        content: topdown_traverse_inlines(self.content, filter),
                        ..self
                    })
                }
            }
        )*
    };
}
impl_block_filterable_inlines!(Plain, Paragraph, Header);

macro_rules! impl_block_filterable_items {
    ($($variant:ident),*) => {
        $(
            impl BlockFilterableStructure for pandoc::$variant {
                fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
                    Block::$variant(pandoc::$variant {
                        content: self
                            .content
                            .into_iter()
                            .map(|blocks| topdown_traverse_blocks(blocks, filter))
                            .collect(),
                        ..self
                    })
                }
            }
        )*
    };
}
impl_block_filterable_items!(OrderedList, BulletList);

impl BlockFilterableStructure for pandoc::LineBlock {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
        Block::LineBlock(pandoc::LineBlock {
            content: self
                .content
                .into_iter()
                .map(|inlines| topdown_traverse_inlines(inlines, filter))
                .collect(),
        })
    }
}

impl BlockFilterableStructure for pandoc::DefinitionList {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
        Block::DefinitionList(pandoc::DefinitionList {
            content: self
                .content
                .into_iter()
                .map(|(term, def)| {
                    (
                        topdown_traverse_inlines(term, filter),
                        def.into_iter()
                            .map(|blocks| topdown_traverse_blocks(blocks, filter))
                            .collect(),
                    )
                })
                .collect(),
        })
    }
}

fn traverse_caption<F: Filter + ?Sized>(caption: Caption, filter: &mut F) -> Caption {
    Caption {
        short: caption
            .short
            .map(|short| topdown_traverse_inlines(short, filter)),
        long: topdown_traverse_blocks(caption.long, filter),
    }
}

fn traverse_rows<F: Filter + ?Sized>(rows: Vec<Row>, filter: &mut F) -> Vec<Row> {
    rows.into_iter()
        .map(|row| Row {
            cells: row
                .cells
                .into_iter()
                .map(|cell| pandoc::Cell {
                    content: topdown_traverse_blocks(cell.content, filter),
                    ..cell
                })
                .collect(),
            ..row
        })
        .collect()
}

impl BlockFilterableStructure for pandoc::Table {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
        Block::Table(pandoc::Table {
            caption: traverse_caption(self.caption, filter),
            head: pandoc::TableHead {
                rows: traverse_rows(self.head.rows, filter),
                ..self.head
            },
            bodies: self
                .bodies
                .into_iter()
                .map(|body| pandoc::TableBody {
                    head: traverse_rows(body.head, filter),
                    body: traverse_rows(body.body, filter),
                    ..body
                })
                .collect(),
            foot: pandoc::TableFoot {
                rows: traverse_rows(self.foot.rows, filter),
                ..self.foot
            },
            ..self
        })
    }
}

impl BlockFilterableStructure for pandoc::Figure {
    fn filter_structure<F: Filter + ?Sized>(self, filter: &mut F) -> Block {
        Block::Figure(pandoc::Figure {
            caption: traverse_caption(self.caption, filter),
            content: topdown_traverse_blocks(self.content, filter),
            ..self
        })
    }
}

pub fn topdown_traverse_inline<F: Filter + ?Sized>(inline: Inline, filter: &mut F) -> Inlines {
    match inline {
        Inline::Span(span) => match filter.span(span) {
            FilterReturn::Unchanged(span) => vec![span.filter_structure(filter)],
            FilterReturn::FilterResult(new_content, recurse) => {
                if !recurse {
                    new_content
                } else {
                    topdown_traverse_inlines(new_content, filter)
                }
            }
        },
        Inline::Str(s) => vec![s.filter_structure(filter)],
        Inline::Emph(e) => vec![e.filter_structure(filter)],
        Inline::Underline(u) => vec![u.filter_structure(filter)],
        Inline::Strong(s) => vec![s.filter_structure(filter)],
        Inline::Strikeout(s) => vec![s.filter_structure(filter)],
        Inline::Superscript(s) => vec![s.filter_structure(filter)],
        Inline::Subscript(s) => vec![s.filter_structure(filter)],
        Inline::SmallCaps(s) => vec![s.filter_structure(filter)],
        Inline::Quoted(q) => vec![q.filter_structure(filter)],
        Inline::Cite(c) => vec![c.filter_structure(filter)],
        Inline::Code(c) => vec![c.filter_structure(filter)],
        Inline::Space(s) => vec![s.filter_structure(filter)],
        Inline::SoftBreak(s) => vec![s.filter_structure(filter)],
        Inline::LineBreak(l) => vec![l.filter_structure(filter)],
        Inline::Math(m) => vec![m.filter_structure(filter)],
        Inline::RawInline(r) => vec![r.filter_structure(filter)],
        Inline::Link(l) => vec![l.filter_structure(filter)],
        Inline::Image(i) => vec![i.filter_structure(filter)],
        Inline::Note(n) => vec![n.filter_structure(filter)],
    }
}

pub fn topdown_traverse_block<F: Filter + ?Sized>(block: Block, filter: &mut F) -> Blocks {
    match block {
        Block::Div(div) => match filter.div(div) {
            FilterReturn::Unchanged(div) => vec![div.filter_structure(filter)],
            FilterReturn::FilterResult(new_content, recurse) => {
                if !recurse {
                    new_content
                } else {
                    topdown_traverse_blocks(new_content, filter)
                }
            }
        },
        Block::Plain(p) => vec![p.filter_structure(filter)],
        Block::Paragraph(p) => vec![p.filter_structure(filter)],
        Block::LineBlock(l) => vec![l.filter_structure(filter)],
        Block::CodeBlock(c) => vec![c.filter_structure(filter)],
        Block::RawBlock(r) => vec![r.filter_structure(filter)],
        Block::BlockQuote(b) => vec![b.filter_structure(filter)],
        Block::OrderedList(o) => vec![o.filter_structure(filter)],
        Block::BulletList(b) => vec![b.filter_structure(filter)],
        Block::DefinitionList(d) => vec![d.filter_structure(filter)],
        Block::Header(h) => vec![h.filter_structure(filter)],
        Block::HorizontalRule(h) => vec![h.filter_structure(filter)],
        Block::Table(t) => vec![t.filter_structure(filter)],
        Block::Figure(f) => vec![f.filter_structure(filter)],
    }
}

pub fn topdown_traverse_inlines<F: Filter + ?Sized>(vec: Inlines, filter: &mut F) -> Inlines {
    let mut result = vec![];
    for inline in vec {
        result.extend(topdown_traverse_inline(inline, filter));
    }
    result
}

pub fn topdown_traverse_blocks<F: Filter + ?Sized>(vec: Blocks, filter: &mut F) -> Blocks {
    let mut result = vec![];
    for block in vec {
        result.extend(topdown_traverse_block(block, filter));
    }
    result
}

/// Walk the body of the document. Metadata is left untouched.
pub fn topdown_traverse<F: Filter + ?Sized>(doc: Pandoc, filter: &mut F) -> Pandoc {
    Pandoc {
        blocks: topdown_traverse_blocks(doc.blocks, filter),
        ..doc
    }
}
