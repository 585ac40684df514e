/*
 * bibtex.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A small BibTeX reader.
//!
//! Each entry becomes a record with `ENTRYTYPE` (lower-cased) and `ID`
//! followed by its fields, whose names are lower-cased. Values may be
//! brace- or quote-delimited, bare numbers, or `@string` macro names, joined
//! with `#`. Grouping braces are dropped and whitespace runs collapse to a
//! single space. `author` and `editor` become lists of `Last, First` names.
//! `@comment` and `@preamble` blocks, and any text outside entries, are
//! ignored.

use std::collections::HashMap;
use std::path::Path;

use crate::error::SourceError;
use crate::record::{FieldValue, Record};
use crate::source::SourceReader;

#[derive(Debug, Default, Clone, Copy)]
pub struct BibtexReader;

impl SourceReader for BibtexReader {
    fn read(&self, path: &Path) -> Result<Vec<Record>, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_bibtex(&contents).map_err(|err| SourceError::Bibtex {
            path: path.to_path_buf(),
            line: err.line,
            message: err.message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct BibtexSyntaxError {
    pub line: usize,
    pub message: String,
}

pub fn parse_bibtex(input: &str) -> Result<Vec<Record>, BibtexSyntaxError> {
    BibtexParser::new(input).parse()
}

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

struct BibtexParser {
    chars: Vec<char>,
    pos: usize,
    strings: HashMap<String, String>,
}

impl BibtexParser {
    fn new(input: &str) -> Self {
        let strings = MONTHS
            .iter()
            .map(|(abbrev, month)| (abbrev.to_string(), month.to_string()))
            .collect();
        BibtexParser {
            chars: input.chars().collect(),
            pos: 0,
            strings,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn line(&self) -> usize {
        self.chars[..self.pos.min(self.chars.len())]
            .iter()
            .filter(|&&c| c == '\n')
            .count()
            + 1
    }

    fn error(&self, message: impl Into<String>) -> BibtexSyntaxError {
        BibtexSyntaxError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), BibtexSyntaxError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || "_-:.+/'".contains(c) {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    fn parse(mut self) -> Result<Vec<Record>, BibtexSyntaxError> {
        let mut records = Vec::new();
        loop {
            while self.peek().is_some_and(|c| c != '@') {
                self.pos += 1;
            }
            if self.bump().is_none() {
                break;
            }
            let entry_type = self.read_name().to_lowercase();
            let name_end = self.pos;
            self.skip_ws();
            let close = match self.peek() {
                Some('{') if !entry_type.is_empty() => '}',
                Some('(') if !entry_type.is_empty() => ')',
                // an `@` in free text, or a braceless `@comment` line
                _ => {
                    self.pos = name_end;
                    self.skip_line();
                    continue;
                }
            };
            self.pos += 1;
            match entry_type.as_str() {
                "comment" | "preamble" => self.skip_body(close)?,
                "string" => self.parse_string_macro(close)?,
                _ => records.push(self.parse_entry(entry_type, close)?),
            }
        }
        Ok(records)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_body(&mut self, close: char) -> Result<(), BibtexSyntaxError> {
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error("unterminated block"))
    }

    fn parse_string_macro(&mut self, close: char) -> Result<(), BibtexSyntaxError> {
        self.skip_ws();
        let name = self.read_name().to_lowercase();
        if name.is_empty() {
            return Err(self.error("expected @string name"));
        }
        self.skip_ws();
        self.expect('=')?;
        let value = self.parse_value()?;
        self.skip_ws();
        self.expect(close)?;
        self.strings.insert(name, value);
        Ok(())
    }

    fn parse_entry(&mut self, entry_type: String, close: char) -> Result<Record, BibtexSyntaxError> {
        self.skip_ws();
        let mut key = String::new();
        while let Some(c) = self.peek() {
            if c == ',' || c == close || c.is_whitespace() {
                break;
            }
            key.push(c);
            self.pos += 1;
        }

        let mut record = Record::new().with("ENTRYTYPE", entry_type).with("ID", key);

        self.skip_ws();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(record);
        }
        self.expect(',')?;

        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(record);
                }
                None => return Err(self.error("unterminated entry")),
                Some(_) => {}
            }

            let name = self.read_name().to_lowercase();
            if name.is_empty() {
                return Err(self.error("expected field name"));
            }
            self.skip_ws();
            self.expect('=')?;
            let value = self.parse_value()?;
            record.insert(name.clone(), field_value(&name, &value));

            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => return Err(self.error(format!("expected ',' after field {}", name))),
            }
        }
    }

    /// One value: pieces joined with `#`.
    fn parse_value(&mut self) -> Result<String, BibtexSyntaxError> {
        let mut value = String::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('{') => {
                    self.pos += 1;
                    value.push_str(&self.read_delimited('}')?);
                }
                Some('"') => {
                    self.pos += 1;
                    value.push_str(&self.read_delimited('"')?);
                }
                Some(c) if c.is_ascii_digit() => {
                    while let Some(d) = self.peek().filter(char::is_ascii_digit) {
                        value.push(d);
                        self.pos += 1;
                    }
                }
                Some(c) if c.is_alphabetic() => {
                    let name = self.read_name();
                    match self.strings.get(&name.to_lowercase()) {
                        Some(expansion) => value.push_str(expansion),
                        None => value.push_str(&name),
                    }
                }
                _ => return Err(self.error("expected field value")),
            }
            self.skip_ws();
            if self.peek() == Some('#') {
                self.pos += 1;
            } else {
                return Ok(value);
            }
        }
    }

    /// Text up to `end` at brace depth zero. Nested braces are kept.
    fn read_delimited(&mut self, end: char) -> Result<String, BibtexSyntaxError> {
        let mut text = String::new();
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                c if c == end && depth == 0 => return Ok(text),
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            text.push(c);
        }
        Err(self.error("unterminated field value"))
    }
}

/// Drop grouping braces (keeping `\{` and `\}`) and collapse whitespace.
fn clean_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut prev = None;
    for c in raw.chars() {
        if (c == '{' || c == '}') && prev != Some('\\') {
            prev = Some(c);
            continue;
        }
        text.push(c);
        prev = Some(c);
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field_value(name: &str, raw: &str) -> FieldValue {
    let text = clean_text(raw);
    match name {
        "author" | "editor" => FieldValue::List(
            text.split(" and ")
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(|n| FieldValue::Text(normalize_name(n)))
                .collect(),
        ),
        _ => FieldValue::Text(text),
    }
}

/// `First von Last` becomes `von Last, First`; names that already contain
/// a comma are left in `Last, First` order.
fn normalize_name(name: &str) -> String {
    if let Some((last, first)) = name.split_once(',') {
        let first = first.trim();
        if first.is_empty() {
            return last.trim().to_string();
        }
        return format!("{}, {}", last.trim(), first);
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() < 2 {
        return name.to_string();
    }
    let last_start = words[1..words.len() - 1]
        .iter()
        .position(|w| w.chars().next().is_some_and(char::is_lowercase))
        .map(|i| i + 1)
        .unwrap_or(words.len() - 1);
    format!(
        "{}, {}",
        words[last_start..].join(" "),
        words[..last_start].join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(record: &Record, key: &str) -> String {
        record.get_text(key).unwrap_or_default()
    }

    #[test]
    fn test_entry_fields() {
        let records = parse_bibtex(
            r#"
% a leading comment line
@InProceedings{knuth84,
  Title     = {Literate {P}rogramming},
  author    = "Donald E. Knuth and Leslie Lamport",
  year      = 1984,
  booktitle = {The Computer
               Journal},
}
"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(text(r, "ENTRYTYPE"), "inproceedings");
        assert_eq!(text(r, "ID"), "knuth84");
        assert_eq!(text(r, "title"), "Literate Programming");
        assert_eq!(text(r, "booktitle"), "The Computer Journal");
        assert_eq!(r.get("year").and_then(FieldValue::as_i64), Some(1984));
        assert_eq!(
            r.get("author"),
            Some(&FieldValue::List(vec![
                FieldValue::from("Knuth, Donald E."),
                FieldValue::from("Lamport, Leslie"),
            ]))
        );
    }

    #[test]
    fn test_string_macros_and_concatenation() {
        let records = parse_bibtex(
            r#"
@string{conf = "RustConf"}
@comment{ignored {nested} text}
@preamble{"\newcommand{\noop}[1]{}"}
@misc(talk1,
  venue = conf # " " # {2015},
  month = sep
)
"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "venue"), "RustConf 2015");
        assert_eq!(text(&records[0], "month"), "September");
    }

    #[test]
    fn test_at_sign_in_free_text_is_ignored() {
        let records = parse_bibtex(
            "% maintained by someone@example.org\n\n@inproceedings{talk1, title = {Rust Talk}, year = 2015,}",
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "ID"), "talk1");
        assert_eq!(text(&records[0], "title"), "Rust Talk");
    }

    #[test]
    fn test_braceless_comment_line_is_ignored() {
        let records = parse_bibtex("@comment this file is generated\n@misc{a, title = {A}}").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "ID"), "a");
        assert_eq!(text(&records[0], "title"), "A");
    }

    #[test]
    fn test_name_forms() {
        assert_eq!(normalize_name("Ludwig van Beethoven"), "van Beethoven, Ludwig");
        assert_eq!(normalize_name("Lamport, Leslie"), "Lamport, Leslie");
        assert_eq!(normalize_name("Plato"), "Plato");
    }

    #[test]
    fn test_error_line() {
        let err = parse_bibtex("@article{a,\n  title = {x},\n  year 1999\n}\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.message, "expected '=', found '1'");
    }

    #[test]
    fn test_unterminated_value() {
        let err = parse_bibtex("@article{a, title = {never closed\n").unwrap_err();
        assert_eq!(err.message, "unterminated field value");
    }
}
