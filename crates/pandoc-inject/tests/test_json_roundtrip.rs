/*
 * test_json_roundtrip.rs
 * Copyright (c) 2025 Posit, PBC
 */

use pandoc_inject::pandoc::{
    Block, ListNumberDelim, ListNumberStyle, MetaValue, OrderedList, Pandoc, Plain,
    text_to_inlines,
};
use pandoc_inject::readers;
use pandoc_inject::writers::json;
use serde_json::Value;

#[test]
fn test_document_survives_read_and_write() {
    let input = serde_json::json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": {
            "title": {"t": "MetaInlines", "c": [{"t": "Str", "c": "Talks"}]},
            "star": {"t": "MetaList", "c": [{"t": "MetaString", "c": "b"}]}
        },
        "blocks": [
            {"t": "OrderedList", "c": [
                [1, {"t": "Decimal"}, {"t": "Period"}],
                [
                    [{"t": "Para", "c": [{"t": "Emph", "c": [{"t": "Str", "c": "Talk"}]}]}],
                    [{"t": "Plain", "c": [{"t": "Code", "c": [["", [], []], "x = 1"]}]}]
                ]
            ]},
            {"t": "Div", "c": [["id", ["a", "b"], [["k", "v"]]], [
                {"t": "CodeBlock", "c": [["", ["rust"], []], "fn main() {}"]},
                {"t": "HorizontalRule"}
            ]]},
            {"t": "Para", "c": [
                {"t": "Link", "c": [["", [], []], [{"t": "Str", "c": "home"}], ["https://example.org", ""]]},
                {"t": "SoftBreak"},
                {"t": "Quoted", "c": [{"t": "DoubleQuote"}, [{"t": "Str", "c": "q"}]]}
            ]}
        ]
    });

    let doc = readers::json::read_pandoc(&input).unwrap();
    assert_eq!(doc.api_version, vec![1, 23, 1]);
    assert!(matches!(doc.meta.get("star"), Some(MetaValue::MetaList(items)) if items.len() == 1));

    let written = json::write_pandoc(&doc);
    assert_eq!(written, input);
}

#[test]
fn test_write_produces_parseable_bytes() {
    let doc = Pandoc {
        blocks: vec![Block::OrderedList(OrderedList {
            attr: (1, ListNumberStyle::Decimal, ListNumberDelim::Period),
            content: vec![vec![Block::Plain(Plain {
                content: text_to_inlines("only item"),
            })]],
        })],
        ..Pandoc::default()
    };

    let mut bytes = Vec::new();
    json::write(&doc, &mut bytes).unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["pandoc-api-version"], serde_json::json!([1, 23]));

    let back = readers::json::read(&mut bytes.as_slice()).unwrap();
    assert_eq!(back, doc);
}
