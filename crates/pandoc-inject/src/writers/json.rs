/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::pandoc::{
    Alignment, Attr, Block, Caption, Cell, Citation, CitationMode, ColSpec, ColWidth, Inline,
    ListAttributes, ListNumberDelim, ListNumberStyle, MathType, Meta, MetaValue, Pandoc,
    QuoteType, Row, Table,
};
use serde_json::{Value, json};

fn write_attr(attr: &Attr) -> Value {
    json!([
        attr.0,
        attr.1,
        attr.2
            .iter()
            .map(|(k, v)| json!([k, v]))
            .collect::<Vec<_>>()
    ])
}

fn write_citation_mode(mode: &CitationMode) -> Value {
    match mode {
        CitationMode::NormalCitation => json!({"t": "NormalCitation"}),
        CitationMode::AuthorInText => json!({"t": "AuthorInText"}),
        CitationMode::SuppressAuthor => json!({"t": "SuppressAuthor"}),
    }
}

fn write_citation(citation: &Citation) -> Value {
    json!({
        "citationId": citation.id,
        "citationPrefix": write_inlines(&citation.prefix),
        "citationSuffix": write_inlines(&citation.suffix),
        "citationMode": write_citation_mode(&citation.mode),
        "citationNoteNum": citation.note_num,
        "citationHash": citation.hash,
    })
}

fn write_inline(inline: &Inline) -> Value {
    match inline {
        Inline::Str(s) => json!({"t": "Str", "c": s.text}),
        Inline::Space(_) => json!({"t": "Space"}),
        Inline::SoftBreak(_) => json!({"t": "SoftBreak"}),
        Inline::LineBreak(_) => json!({"t": "LineBreak"}),
        Inline::Emph(e) => json!({"t": "Emph", "c": write_inlines(&e.content)}),
        Inline::Underline(u) => json!({"t": "Underline", "c": write_inlines(&u.content)}),
        Inline::Strong(s) => json!({"t": "Strong", "c": write_inlines(&s.content)}),
        Inline::Strikeout(s) => json!({"t": "Strikeout", "c": write_inlines(&s.content)}),
        Inline::Superscript(s) => json!({"t": "Superscript", "c": write_inlines(&s.content)}),
        Inline::Subscript(s) => json!({"t": "Subscript", "c": write_inlines(&s.content)}),
        Inline::SmallCaps(s) => json!({"t": "SmallCaps", "c": write_inlines(&s.content)}),
        Inline::Quoted(q) => {
            let quote_type = match q.quote_type {
                QuoteType::SingleQuote => json!({"t": "SingleQuote"}),
                QuoteType::DoubleQuote => json!({"t": "DoubleQuote"}),
            };
            json!({"t": "Quoted", "c": [quote_type, write_inlines(&q.content)]})
        }
        Inline::Cite(c) => json!({
            "t": "Cite",
            "c": [
                c.citations.iter().map(write_citation).collect::<Vec<_>>(),
                write_inlines(&c.content)
            ]
        }),
        Inline::Code(c) => json!({"t": "Code", "c": [write_attr(&c.attr), c.text]}),
        Inline::Math(m) => {
            let math_type = match m.math_type {
                MathType::InlineMath => json!({"t": "InlineMath"}),
                MathType::DisplayMath => json!({"t": "DisplayMath"}),
            };
            json!({"t": "Math", "c": [math_type, m.text]})
        }
        Inline::RawInline(r) => json!({"t": "RawInline", "c": [r.format, r.text]}),
        Inline::Link(l) => json!({
            "t": "Link",
            "c": [write_attr(&l.attr), write_inlines(&l.content), [l.target.0, l.target.1]]
        }),
        Inline::Image(i) => json!({
            "t": "Image",
            "c": [write_attr(&i.attr), write_inlines(&i.content), [i.target.0, i.target.1]]
        }),
        Inline::Note(n) => json!({"t": "Note", "c": blocks_to_json(&n.content)}),
        Inline::Span(s) => json!({
            "t": "Span",
            "c": [write_attr(&s.attr), write_inlines(&s.content)]
        }),
    }
}

pub fn write_inlines(inlines: &[Inline]) -> Value {
    json!(inlines.iter().map(write_inline).collect::<Vec<_>>())
}

fn write_list_attributes(attr: &ListAttributes) -> Value {
    let style = match attr.1 {
        ListNumberStyle::Default => "DefaultStyle",
        ListNumberStyle::Example => "Example",
        ListNumberStyle::Decimal => "Decimal",
        ListNumberStyle::LowerRoman => "LowerRoman",
        ListNumberStyle::UpperRoman => "UpperRoman",
        ListNumberStyle::LowerAlpha => "LowerAlpha",
        ListNumberStyle::UpperAlpha => "UpperAlpha",
    };
    let delim = match attr.2 {
        ListNumberDelim::Default => "DefaultDelim",
        ListNumberDelim::Period => "Period",
        ListNumberDelim::OneParen => "OneParen",
        ListNumberDelim::TwoParens => "TwoParens",
    };
    json!([attr.0, {"t": style}, {"t": delim}])
}

fn write_block_lists(items: &[Vec<Block>]) -> Value {
    json!(items.iter().map(|item| blocks_to_json(item)).collect::<Vec<_>>())
}

fn write_caption(caption: &Caption) -> Value {
    json!([
        caption.short.as_ref().map(|s| write_inlines(s)),
        blocks_to_json(&caption.long)
    ])
}

fn write_alignment(alignment: &Alignment) -> Value {
    match alignment {
        Alignment::Left => json!({"t": "AlignLeft"}),
        Alignment::Center => json!({"t": "AlignCenter"}),
        Alignment::Right => json!({"t": "AlignRight"}),
        Alignment::Default => json!({"t": "AlignDefault"}),
    }
}

fn write_colspec(colspec: &ColSpec) -> Value {
    let width = match colspec.1 {
        ColWidth::Default => json!({"t": "ColWidthDefault"}),
        ColWidth::Percentage(p) => json!({"t": "ColWidth", "c": p}),
    };
    json!([write_alignment(&colspec.0), width])
}

fn write_cell(cell: &Cell) -> Value {
    json!([
        write_attr(&cell.attr),
        write_alignment(&cell.alignment),
        cell.row_span,
        cell.col_span,
        blocks_to_json(&cell.content)
    ])
}

fn write_row(row: &Row) -> Value {
    json!([
        write_attr(&row.attr),
        row.cells.iter().map(write_cell).collect::<Vec<_>>()
    ])
}

fn write_rows(rows: &[Row]) -> Value {
    json!(rows.iter().map(write_row).collect::<Vec<_>>())
}

fn write_table(table: &Table) -> Value {
    json!([
        write_attr(&table.attr),
        write_caption(&table.caption),
        table.colspec.iter().map(write_colspec).collect::<Vec<_>>(),
        [write_attr(&table.head.attr), write_rows(&table.head.rows)],
        table
            .bodies
            .iter()
            .map(|body| json!([
                write_attr(&body.attr),
                body.rowhead_columns,
                write_rows(&body.head),
                write_rows(&body.body)
            ]))
            .collect::<Vec<_>>(),
        [write_attr(&table.foot.attr), write_rows(&table.foot.rows)]
    ])
}

fn write_block(block: &Block) -> Value {
    match block {
        Block::Plain(p) => json!({"t": "Plain", "c": write_inlines(&p.content)}),
        Block::Paragraph(p) => json!({"t": "Para", "c": write_inlines(&p.content)}),
        Block::LineBlock(l) => json!({
            "t": "LineBlock",
            "c": l.content.iter().map(|line| write_inlines(line)).collect::<Vec<_>>()
        }),
        Block::CodeBlock(c) => json!({"t": "CodeBlock", "c": [write_attr(&c.attr), c.text]}),
        Block::RawBlock(r) => json!({"t": "RawBlock", "c": [r.format, r.text]}),
        Block::BlockQuote(b) => json!({"t": "BlockQuote", "c": blocks_to_json(&b.content)}),
        Block::OrderedList(o) => json!({
            "t": "OrderedList",
            "c": [write_list_attributes(&o.attr), write_block_lists(&o.content)]
        }),
        Block::BulletList(b) => json!({"t": "BulletList", "c": write_block_lists(&b.content)}),
        Block::DefinitionList(d) => json!({
            "t": "DefinitionList",
            "c": d
                .content
                .iter()
                .map(|(term, defs)| json!([write_inlines(term), write_block_lists(defs)]))
                .collect::<Vec<_>>()
        }),
        Block::Header(h) => json!({
            "t": "Header",
            "c": [h.level, write_attr(&h.attr), write_inlines(&h.content)]
        }),
        Block::HorizontalRule(_) => json!({"t": "HorizontalRule"}),
        Block::Table(t) => json!({"t": "Table", "c": write_table(t)}),
        Block::Figure(f) => json!({
            "t": "Figure",
            "c": [write_attr(&f.attr), write_caption(&f.caption), blocks_to_json(&f.content)]
        }),
        Block::Div(d) => json!({
            "t": "Div",
            "c": [write_attr(&d.attr), blocks_to_json(&d.content)]
        }),
    }
}

pub fn blocks_to_json(blocks: &[Block]) -> Value {
    json!(blocks.iter().map(write_block).collect::<Vec<_>>())
}

fn write_meta_value(value: &MetaValue) -> Value {
    match value {
        MetaValue::MetaString(s) => json!({"t": "MetaString", "c": s}),
        MetaValue::MetaBool(b) => json!({"t": "MetaBool", "c": b}),
        MetaValue::MetaInlines(inlines) => json!({"t": "MetaInlines", "c": write_inlines(inlines)}),
        MetaValue::MetaBlocks(blocks) => json!({"t": "MetaBlocks", "c": blocks_to_json(blocks)}),
        MetaValue::MetaList(items) => json!({
            "t": "MetaList",
            "c": items.iter().map(write_meta_value).collect::<Vec<_>>()
        }),
        MetaValue::MetaMap(entries) => json!({"t": "MetaMap", "c": write_meta(entries)}),
    }
}

fn write_meta(meta: &Meta) -> Value {
    let mut map = serde_json::Map::new();
    for (key, value) in meta {
        map.insert(key.clone(), write_meta_value(value));
    }
    Value::Object(map)
}

pub fn write_pandoc(pandoc: &Pandoc) -> Value {
    json!({
        "pandoc-api-version": pandoc.api_version,
        "meta": write_meta(&pandoc.meta),
        "blocks": blocks_to_json(&pandoc.blocks),
    })
}

pub fn write<W: std::io::Write>(pandoc: &Pandoc, writer: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *writer, &write_pandoc(pandoc))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pandoc::{Div, Paragraph, empty_attr, text_to_inlines};

    #[test]
    fn test_write_div_with_paragraph() {
        let mut attr = empty_attr();
        attr.1.push("wrapper".to_string());
        attr.2.insert("k".to_string(), "v".to_string());
        let blocks = vec![Block::Div(Div {
            attr,
            content: vec![Block::Paragraph(Paragraph {
                content: text_to_inlines("a b"),
            })],
        })];

        assert_eq!(
            blocks_to_json(&blocks),
            json!([{"t": "Div", "c": [
                ["", ["wrapper"], [["k", "v"]]],
                [{"t": "Para", "c": [
                    {"t": "Str", "c": "a"},
                    {"t": "Space"},
                    {"t": "Str", "c": "b"}
                ]}]
            ]}])
        );
    }

    #[test]
    fn test_write_document_envelope() {
        let mut meta = Meta::new();
        meta.insert("zeta".to_string(), MetaValue::MetaBool(true));
        meta.insert("alpha".to_string(), MetaValue::MetaString("x".to_string()));
        let pandoc = Pandoc {
            meta,
            ..Pandoc::default()
        };

        let mut out = Vec::new();
        write(&pandoc, &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["pandoc-api-version"], json!([1, 23]));
        assert_eq!(value["meta"]["zeta"], json!({"t": "MetaBool", "c": true}));
        assert_eq!(value["blocks"], json!([]));
    }
}
