/*
 * stringify.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Plain-text flattening of document nodes, used to read identifiers out of
//! metadata such as `star: [x1, y2]`.

use crate::pandoc::block::Block;
use crate::pandoc::inline::{
    Emph, Inline, QuoteType, SmallCaps, Strikeout, Strong, Subscript, Superscript, Underline,
};

pub fn stringify_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_inlines(&mut out, inlines);
    out
}

/// Blocks are separated by newlines.
pub fn stringify_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    push_blocks(&mut out, blocks);
    out
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        push_inline(out, inline);
    }
}

fn push_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Str(s) => out.push_str(&s.text),
        Inline::Code(c) => out.push_str(&c.text),
        Inline::Math(m) => out.push_str(&m.text),
        Inline::Space(_) | Inline::SoftBreak(_) | Inline::LineBreak(_) => out.push(' '),
        Inline::Quoted(q) => {
            let mark = match q.quote_type {
                QuoteType::SingleQuote => '\'',
                QuoteType::DoubleQuote => '"',
            };
            out.push(mark);
            push_inlines(out, &q.content);
            out.push(mark);
        }
        Inline::Emph(Emph { content })
        | Inline::Underline(Underline { content })
        | Inline::Strong(Strong { content })
        | Inline::Strikeout(Strikeout { content })
        | Inline::Superscript(Superscript { content })
        | Inline::Subscript(Subscript { content })
        | Inline::SmallCaps(SmallCaps { content }) => push_inlines(out, content),
        Inline::Link(l) => push_inlines(out, &l.content),
        Inline::Image(i) => push_inlines(out, &i.content),
        Inline::Span(s) => push_inlines(out, &s.content),
        Inline::Cite(c) => push_inlines(out, &c.content),
        Inline::RawInline(_) | Inline::Note(_) => {}
    }
}

fn push_blocks(out: &mut String, blocks: &[Block]) {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_block(out, block);
    }
}

fn push_items(out: &mut String, items: &[Vec<Block>]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_blocks(out, item);
    }
}

fn push_block(out: &mut String, block: &Block) {
    match block {
        Block::Plain(p) => push_inlines(out, &p.content),
        Block::Paragraph(p) => push_inlines(out, &p.content),
        Block::Header(h) => push_inlines(out, &h.content),
        Block::CodeBlock(c) => out.push_str(&c.text),
        Block::LineBlock(l) => {
            for (i, line) in l.content.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                push_inlines(out, line);
            }
        }
        Block::BlockQuote(b) => push_blocks(out, &b.content),
        Block::Div(d) => push_blocks(out, &d.content),
        Block::BulletList(l) => push_items(out, &l.content),
        Block::OrderedList(l) => push_items(out, &l.content),
        Block::DefinitionList(d) => {
            for (i, (term, definitions)) in d.content.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                push_inlines(out, term);
                out.push_str(": ");
                push_items(out, definitions);
            }
        }
        Block::Table(t) => push_blocks(out, &t.caption.long),
        Block::Figure(f) => {
            push_blocks(out, &f.content);
            push_blocks(out, &f.caption.long);
        }
        Block::RawBlock(_) | Block::HorizontalRule(_) => {}
    }
}
