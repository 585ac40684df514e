/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reader for Pandoc's JSON AST encoding (`pandoc -t json`).

use crate::pandoc::{
    Alignment, Attr, Block, BlockQuote, Blocks, BulletList, Caption, Cell, Citation,
    CitationMode, Cite, Code, CodeBlock, ColSpec, ColWidth, DefinitionList, Div, Emph, Figure,
    Header, HorizontalRule, Image, Inline, Inlines, LineBlock, LineBreak, Link, ListAttributes,
    ListNumberDelim, ListNumberStyle, Math, MathType, Meta, MetaValue, Note, OrderedList, Pandoc,
    Paragraph, Plain, QuoteType, Quoted, RawBlock, RawInline, Row, SmallCaps, SoftBreak, Space,
    Span, Str, Strikeout, Strong, Subscript, Superscript, Table, TableBody, TableFoot, TableHead,
    Target, Underline,
};
use hashlink::LinkedHashMap;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum JsonReadError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid type: {0}")]
    InvalidType(String),
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),
}

type Result<T> = std::result::Result<T, JsonReadError>;

/// Read a whole Pandoc document.
pub fn read<R: std::io::Read>(reader: &mut R) -> Result<Pandoc> {
    let value: Value = serde_json::from_reader(reader)?;
    read_pandoc(&value)
}

pub fn read_pandoc(value: &Value) -> Result<Pandoc> {
    let obj = as_object(value, "Pandoc document")?;

    let api_version = obj
        .get("pandoc-api-version")
        .ok_or_else(|| JsonReadError::MissingField("pandoc-api-version".to_string()))?;
    let api_version = as_array(api_version, "pandoc-api-version")?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as u32)
                .ok_or_else(|| invalid("pandoc-api-version entries must be integers"))
        })
        .collect::<Result<Vec<_>>>()?;

    let meta = match obj.get("meta") {
        Some(meta) => read_meta(meta)?,
        None => Meta::new(),
    };
    let blocks = obj
        .get("blocks")
        .ok_or_else(|| JsonReadError::MissingField("blocks".to_string()))?;

    Ok(Pandoc {
        api_version,
        meta,
        blocks: read_blocks(blocks)?,
    })
}

fn invalid(msg: &str) -> JsonReadError {
    JsonReadError::InvalidType(msg.to_string())
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| JsonReadError::InvalidType(format!("Expected object for {}", what)))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| JsonReadError::InvalidType(format!("Expected array for {}", what)))
}

/// An array of exactly `n` elements.
fn as_tuple<'a>(value: &'a Value, n: usize, what: &str) -> Result<&'a [Value]> {
    let arr = as_array(value, what)?;
    if arr.len() != n {
        return Err(JsonReadError::InvalidType(format!(
            "{} array must have {} elements",
            what, n
        )));
    }
    Ok(arr)
}

fn as_string(value: &Value, what: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| JsonReadError::InvalidType(format!("{} must be string", what)))
}

fn as_usize(value: &Value, what: &str) -> Result<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| JsonReadError::InvalidType(format!("{} must be a non-negative integer", what)))
}

/// Split a tagged node into its `t` and (optional) `c` parts.
fn tagged<'a>(value: &'a Value, what: &str) -> Result<(&'a str, Option<&'a Value>)> {
    let obj = as_object(value, what)?;
    let t = obj
        .get("t")
        .and_then(Value::as_str)
        .ok_or_else(|| JsonReadError::MissingField(format!("t in {}", what)))?;
    Ok((t, obj.get("c")))
}

fn content<'a>(c: Option<&'a Value>, t: &str) -> Result<&'a Value> {
    c.ok_or_else(|| JsonReadError::MissingField(format!("c in {}", t)))
}

/// A tag-only node such as `{"t": "AlignLeft"}`.
fn tag_name<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    tagged(value, what).map(|(t, _)| t)
}

fn read_attr(value: &Value) -> Result<Attr> {
    let arr = as_tuple(value, 3, "Attr")?;
    let id = as_string(&arr[0], "Attr id")?;
    let classes = as_array(&arr[1], "Attr classes")?
        .iter()
        .map(|v| as_string(v, "Class"))
        .collect::<Result<Vec<_>>>()?;
    // a repeated key keeps its first value
    let mut kvs = LinkedHashMap::new();
    for kv in as_array(&arr[2], "Attr key-values")? {
        let pair = as_tuple(kv, 2, "Key-value pair")?;
        kvs.entry(as_string(&pair[0], "Key")?)
            .or_insert(as_string(&pair[1], "Value")?);
    }
    Ok((id, classes, kvs))
}

fn read_target(value: &Value) -> Result<Target> {
    let arr = as_tuple(value, 2, "Target")?;
    Ok((as_string(&arr[0], "Target url")?, as_string(&arr[1], "Target title")?))
}

pub fn read_inlines(value: &Value) -> Result<Inlines> {
    as_array(value, "Inlines")?.iter().map(read_inline).collect()
}

pub fn read_blocks(value: &Value) -> Result<Blocks> {
    as_array(value, "Blocks")?.iter().map(read_block).collect()
}

fn read_block_lists(value: &Value) -> Result<Vec<Blocks>> {
    as_array(value, "list items")?.iter().map(read_blocks).collect()
}

fn read_citation(value: &Value) -> Result<Citation> {
    let obj = as_object(value, "Citation")?;
    let field = |name: &str| {
        obj.get(name)
            .ok_or_else(|| JsonReadError::MissingField(name.to_string()))
    };
    let mode = match tag_name(field("citationMode")?, "CitationMode")? {
        "NormalCitation" => CitationMode::NormalCitation,
        "AuthorInText" => CitationMode::AuthorInText,
        "SuppressAuthor" => CitationMode::SuppressAuthor,
        other => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "CitationMode: {}",
                other
            )));
        }
    };
    Ok(Citation {
        id: as_string(field("citationId")?, "citationId")?,
        prefix: read_inlines(field("citationPrefix")?)?,
        suffix: read_inlines(field("citationSuffix")?)?,
        mode,
        note_num: as_usize(field("citationNoteNum")?, "citationNoteNum")?,
        hash: as_usize(field("citationHash")?, "citationHash")?,
    })
}

fn read_inline(value: &Value) -> Result<Inline> {
    let (t, c) = tagged(value, "Inline")?;

    let inline = match t {
        "Str" => Inline::Str(Str {
            text: as_string(content(c, t)?, "Str content")?,
        }),
        "Space" => Inline::Space(Space {}),
        "SoftBreak" => Inline::SoftBreak(SoftBreak {}),
        "LineBreak" => Inline::LineBreak(LineBreak {}),
        "Emph" => Inline::Emph(Emph {
            content: read_inlines(content(c, t)?)?,
        }),
        "Underline" => Inline::Underline(Underline {
            content: read_inlines(content(c, t)?)?,
        }),
        "Strong" => Inline::Strong(Strong {
            content: read_inlines(content(c, t)?)?,
        }),
        "Strikeout" => Inline::Strikeout(Strikeout {
            content: read_inlines(content(c, t)?)?,
        }),
        "Superscript" => Inline::Superscript(Superscript {
            content: read_inlines(content(c, t)?)?,
        }),
        "Subscript" => Inline::Subscript(Subscript {
            content: read_inlines(content(c, t)?)?,
        }),
        "SmallCaps" => Inline::SmallCaps(SmallCaps {
            content: read_inlines(content(c, t)?)?,
        }),
        "Quoted" => {
            let arr = as_tuple(content(c, t)?, 2, "Quoted")?;
            let quote_type = match tag_name(&arr[0], "QuoteType")? {
                "SingleQuote" => QuoteType::SingleQuote,
                "DoubleQuote" => QuoteType::DoubleQuote,
                other => {
                    return Err(JsonReadError::UnsupportedVariant(format!(
                        "QuoteType: {}",
                        other
                    )));
                }
            };
            Inline::Quoted(Quoted {
                quote_type,
                content: read_inlines(&arr[1])?,
            })
        }
        "Cite" => {
            let arr = as_tuple(content(c, t)?, 2, "Cite")?;
            Inline::Cite(Cite {
                citations: as_array(&arr[0], "Citations")?
                    .iter()
                    .map(read_citation)
                    .collect::<Result<Vec<_>>>()?,
                content: read_inlines(&arr[1])?,
            })
        }
        "Code" => {
            let arr = as_tuple(content(c, t)?, 2, "Code")?;
            Inline::Code(Code {
                attr: read_attr(&arr[0])?,
                text: as_string(&arr[1], "Code text")?,
            })
        }
        "Math" => {
            let arr = as_tuple(content(c, t)?, 2, "Math")?;
            let math_type = match tag_name(&arr[0], "MathType")? {
                "InlineMath" => MathType::InlineMath,
                "DisplayMath" => MathType::DisplayMath,
                other => {
                    return Err(JsonReadError::UnsupportedVariant(format!(
                        "MathType: {}",
                        other
                    )));
                }
            };
            Inline::Math(Math {
                math_type,
                text: as_string(&arr[1], "Math text")?,
            })
        }
        "RawInline" => {
            let arr = as_tuple(content(c, t)?, 2, "RawInline")?;
            Inline::RawInline(RawInline {
                format: as_string(&arr[0], "RawInline format")?,
                text: as_string(&arr[1], "RawInline text")?,
            })
        }
        "Link" => {
            let arr = as_tuple(content(c, t)?, 3, "Link")?;
            Inline::Link(Link {
                attr: read_attr(&arr[0])?,
                content: read_inlines(&arr[1])?,
                target: read_target(&arr[2])?,
            })
        }
        "Image" => {
            let arr = as_tuple(content(c, t)?, 3, "Image")?;
            Inline::Image(Image {
                attr: read_attr(&arr[0])?,
                content: read_inlines(&arr[1])?,
                target: read_target(&arr[2])?,
            })
        }
        "Note" => Inline::Note(Note {
            content: read_blocks(content(c, t)?)?,
        }),
        "Span" => {
            let arr = as_tuple(content(c, t)?, 2, "Span")?;
            Inline::Span(Span {
                attr: read_attr(&arr[0])?,
                content: read_inlines(&arr[1])?,
            })
        }
        _ => return Err(JsonReadError::UnsupportedVariant(format!("Inline: {}", t))),
    };
    Ok(inline)
}

fn read_list_attributes(value: &Value) -> Result<ListAttributes> {
    let arr = as_tuple(value, 3, "ListAttributes")?;
    let start = arr[0]
        .as_i64()
        .ok_or_else(|| invalid("List start must be an integer"))?;
    let style = match tag_name(&arr[1], "ListNumberStyle")? {
        "DefaultStyle" => ListNumberStyle::Default,
        "Example" => ListNumberStyle::Example,
        "Decimal" => ListNumberStyle::Decimal,
        "LowerRoman" => ListNumberStyle::LowerRoman,
        "UpperRoman" => ListNumberStyle::UpperRoman,
        "LowerAlpha" => ListNumberStyle::LowerAlpha,
        "UpperAlpha" => ListNumberStyle::UpperAlpha,
        other => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ListNumberStyle: {}",
                other
            )));
        }
    };
    let delim = match tag_name(&arr[2], "ListNumberDelim")? {
        "DefaultDelim" => ListNumberDelim::Default,
        "Period" => ListNumberDelim::Period,
        "OneParen" => ListNumberDelim::OneParen,
        "TwoParens" => ListNumberDelim::TwoParens,
        other => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ListNumberDelim: {}",
                other
            )));
        }
    };
    Ok((start, style, delim))
}

fn read_caption(value: &Value) -> Result<Caption> {
    let arr = as_tuple(value, 2, "Caption")?;
    let short = if arr[0].is_null() {
        None
    } else {
        Some(read_inlines(&arr[0])?)
    };
    Ok(Caption {
        short,
        long: read_blocks(&arr[1])?,
    })
}

fn read_alignment(value: &Value) -> Result<Alignment> {
    match tag_name(value, "Alignment")? {
        "AlignLeft" => Ok(Alignment::Left),
        "AlignRight" => Ok(Alignment::Right),
        "AlignCenter" => Ok(Alignment::Center),
        "AlignDefault" => Ok(Alignment::Default),
        other => Err(JsonReadError::UnsupportedVariant(format!(
            "Alignment: {}",
            other
        ))),
    }
}

fn read_colspec(value: &Value) -> Result<ColSpec> {
    let arr = as_tuple(value, 2, "ColSpec")?;
    let alignment = read_alignment(&arr[0])?;
    let (t, c) = tagged(&arr[1], "ColWidth")?;
    let width = match t {
        "ColWidthDefault" => ColWidth::Default,
        "ColWidth" => ColWidth::Percentage(
            content(c, t)?
                .as_f64()
                .ok_or_else(|| invalid("ColWidth must be a number"))?,
        ),
        other => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ColWidth: {}",
                other
            )));
        }
    };
    Ok((alignment, width))
}

fn read_cell(value: &Value) -> Result<Cell> {
    let arr = as_tuple(value, 5, "Cell")?;
    Ok(Cell {
        attr: read_attr(&arr[0])?,
        alignment: read_alignment(&arr[1])?,
        row_span: as_usize(&arr[2], "Cell row span")?,
        col_span: as_usize(&arr[3], "Cell col span")?,
        content: read_blocks(&arr[4])?,
    })
}

fn read_row(value: &Value) -> Result<Row> {
    let arr = as_tuple(value, 2, "Row")?;
    Ok(Row {
        attr: read_attr(&arr[0])?,
        cells: as_array(&arr[1], "Row cells")?
            .iter()
            .map(read_cell)
            .collect::<Result<Vec<_>>>()?,
    })
}

fn read_rows(value: &Value) -> Result<Vec<Row>> {
    as_array(value, "Rows")?.iter().map(read_row).collect()
}

fn read_table(value: &Value) -> Result<Table> {
    let arr = as_tuple(value, 6, "Table")?;

    let head = as_tuple(&arr[3], 2, "TableHead")?;
    let foot = as_tuple(&arr[5], 2, "TableFoot")?;
    let bodies = as_array(&arr[4], "TableBodies")?
        .iter()
        .map(|body| {
            let b = as_tuple(body, 4, "TableBody")?;
            Ok(TableBody {
                attr: read_attr(&b[0])?,
                rowhead_columns: as_usize(&b[1], "TableBody row head columns")?,
                head: read_rows(&b[2])?,
                body: read_rows(&b[3])?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table {
        attr: read_attr(&arr[0])?,
        caption: read_caption(&arr[1])?,
        colspec: as_array(&arr[2], "ColSpecs")?
            .iter()
            .map(read_colspec)
            .collect::<Result<Vec<_>>>()?,
        head: TableHead {
            attr: read_attr(&head[0])?,
            rows: read_rows(&head[1])?,
        },
        bodies,
        foot: TableFoot {
            attr: read_attr(&foot[0])?,
            rows: read_rows(&foot[1])?,
        },
    })
}

fn read_block(value: &Value) -> Result<Block> {
    let (t, c) = tagged(value, "Block")?;

    let block = match t {
        "Plain" => Block::Plain(Plain {
            content: read_inlines(content(c, t)?)?,
        }),
        "Para" => Block::Paragraph(Paragraph {
            content: read_inlines(content(c, t)?)?,
        }),
        "LineBlock" => Block::LineBlock(LineBlock {
            content: as_array(content(c, t)?, "LineBlock")?
                .iter()
                .map(read_inlines)
                .collect::<Result<Vec<_>>>()?,
        }),
        "CodeBlock" => {
            let arr = as_tuple(content(c, t)?, 2, "CodeBlock")?;
            Block::CodeBlock(CodeBlock {
                attr: read_attr(&arr[0])?,
                text: as_string(&arr[1], "CodeBlock text")?,
            })
        }
        "RawBlock" => {
            let arr = as_tuple(content(c, t)?, 2, "RawBlock")?;
            Block::RawBlock(RawBlock {
                format: as_string(&arr[0], "RawBlock format")?,
                text: as_string(&arr[1], "RawBlock text")?,
            })
        }
        "BlockQuote" => Block::BlockQuote(BlockQuote {
            content: read_blocks(content(c, t)?)?,
        }),
        "OrderedList" => {
            let arr = as_tuple(content(c, t)?, 2, "OrderedList")?;
            Block::OrderedList(OrderedList {
                attr: read_list_attributes(&arr[0])?,
                content: read_block_lists(&arr[1])?,
            })
        }
        "BulletList" => Block::BulletList(BulletList {
            content: read_block_lists(content(c, t)?)?,
        }),
        "DefinitionList" => Block::DefinitionList(DefinitionList {
            content: as_array(content(c, t)?, "DefinitionList")?
                .iter()
                .map(|item| {
                    let pair = as_tuple(item, 2, "DefinitionList item")?;
                    Ok((read_inlines(&pair[0])?, read_block_lists(&pair[1])?))
                })
                .collect::<Result<Vec<_>>>()?,
        }),
        "Header" => {
            let arr = as_tuple(content(c, t)?, 3, "Header")?;
            Block::Header(Header {
                level: as_usize(&arr[0], "Header level")?,
                attr: read_attr(&arr[1])?,
                content: read_inlines(&arr[2])?,
            })
        }
        "HorizontalRule" => Block::HorizontalRule(HorizontalRule {}),
        "Table" => Block::Table(read_table(content(c, t)?)?),
        "Figure" => {
            let arr = as_tuple(content(c, t)?, 3, "Figure")?;
            Block::Figure(Figure {
                attr: read_attr(&arr[0])?,
                caption: read_caption(&arr[1])?,
                content: read_blocks(&arr[2])?,
            })
        }
        "Div" => {
            let arr = as_tuple(content(c, t)?, 2, "Div")?;
            Block::Div(Div {
                attr: read_attr(&arr[0])?,
                content: read_blocks(&arr[1])?,
            })
        }
        _ => return Err(JsonReadError::UnsupportedVariant(format!("Block: {}", t))),
    };
    Ok(block)
}

fn read_meta_value(value: &Value) -> Result<MetaValue> {
    let (t, c) = tagged(value, "MetaValue")?;
    let c = content(c, t)?;
    match t {
        "MetaString" => Ok(MetaValue::MetaString(as_string(c, "MetaString")?)),
        "MetaBool" => Ok(MetaValue::MetaBool(
            c.as_bool().ok_or_else(|| invalid("MetaBool must be boolean"))?,
        )),
        "MetaInlines" => Ok(MetaValue::MetaInlines(read_inlines(c)?)),
        "MetaBlocks" => Ok(MetaValue::MetaBlocks(read_blocks(c)?)),
        "MetaList" => Ok(MetaValue::MetaList(
            as_array(c, "MetaList")?
                .iter()
                .map(read_meta_value)
                .collect::<Result<Vec<_>>>()?,
        )),
        "MetaMap" => Ok(MetaValue::MetaMap(read_meta(c)?)),
        _ => Err(JsonReadError::UnsupportedVariant(format!("MetaValue: {}", t))),
    }
}

fn read_meta(value: &Value) -> Result<Meta> {
    let mut meta = Meta::new();
    for (key, v) in as_object(value, "Meta")? {
        meta.insert(key.clone(), read_meta_value(v)?);
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_marker_div_with_meta() {
        let doc = json!({
            "pandoc-api-version": [1, 23, 1],
            "meta": {
                "star": {"t": "MetaList", "c": [
                    {"t": "MetaInlines", "c": [{"t": "Str", "c": "y2"}]}
                ]}
            },
            "blocks": [
                {"t": "Div", "c": [
                    ["", ["FILTER-inject"], [["source", "talks.yaml"], ["format", "Homepage"]]],
                    []
                ]}
            ]
        });

        let pandoc = read_pandoc(&doc).unwrap();
        assert_eq!(pandoc.api_version, vec![1, 23, 1]);
        assert_eq!(pandoc.blocks.len(), 1);
        match &pandoc.blocks[0] {
            Block::Div(div) => {
                assert_eq!(div.attr.1, vec!["FILTER-inject".to_string()]);
                assert_eq!(div.attr.2.get("format").map(String::as_str), Some("Homepage"));
            }
            other => panic!("Expected Div, got {:?}", other),
        }
        let star = pandoc.meta.get("star").and_then(MetaValue::as_list).unwrap();
        assert_eq!(star[0].stringify(), "y2");
    }

    #[test]
    fn test_repeated_attribute_key_keeps_first_value() {
        let blocks = json!([
            {"t": "Div", "c": [
                ["", ["FILTER-inject"], [
                    ["source", "talks.yaml"],
                    ["select", "Since2012"],
                    ["source", "other.bib"]
                ]],
                []
            ]}
        ]);

        let blocks = read_blocks(&blocks).unwrap();
        let Block::Div(div) = &blocks[0] else {
            panic!("Expected Div, got {:?}", blocks[0]);
        };
        assert_eq!(div.attr.2.len(), 2);
        assert_eq!(div.attr.2.get("source").map(String::as_str), Some("talks.yaml"));
    }

    #[test]
    fn test_read_ordered_list_and_span() {
        let blocks = json!([
            {"t": "OrderedList", "c": [
                [1, {"t": "Decimal"}, {"t": "Period"}],
                [[{"t": "Para", "c": [
                    {"t": "Emph", "c": [{"t": "Str", "c": "Talk"}]},
                    {"t": "Str", "c": ","},
                    {"t": "Space"},
                    {"t": "Span", "c": [["", ["x"], []], [{"t": "Str", "c": "2015"}]]}
                ]}]]
            ]}
        ]);

        let blocks = read_blocks(&blocks).unwrap();
        match &blocks[0] {
            Block::OrderedList(list) => {
                assert_eq!(list.attr.0, 1);
                assert_eq!(list.attr.1, ListNumberStyle::Decimal);
                assert_eq!(list.content.len(), 1);
            }
            other => panic!("Expected OrderedList, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_block_variant_is_rejected() {
        let blocks = json!([{"t": "Frobnicate", "c": []}]);
        match read_blocks(&blocks) {
            Err(JsonReadError::UnsupportedVariant(msg)) => assert!(msg.contains("Frobnicate")),
            other => panic!("Expected UnsupportedVariant, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_blocks_field() {
        let doc = json!({"pandoc-api-version": [1, 23], "meta": {}});
        assert!(matches!(
            read_pandoc(&doc),
            Err(JsonReadError::MissingField(_))
        ));
    }
}
