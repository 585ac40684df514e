/*
 * expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Selection expressions.
//!
//! Compiling an expression happens in four steps:
//!
//! 1. the text is split into words, parentheses and the connectives
//!    `and`/`or`/`not` (any case);
//! 2. every distinct selector token gets a placeholder letter (`a`..`z`,
//!    then `A`..`Z`) in order of first appearance;
//! 3. the letter-substituted token stream is parsed into an [`Expr`] with
//!    `not` binding tightest, then `and`, then `or`;
//! 4. each token is resolved to a [`Predicate`] and installed in the
//!    [`FunctionTable`] under its letter.
//!
//! Evaluation then walks the tree once per record.

use std::collections::HashMap;
use std::fmt;

use crate::error::SelectionError;
use crate::record::Record;
use crate::selector::{Predicate, SelectorRegistry, resolve_token};

/// Number of placeholder letters available.
pub const MAX_PLACEHOLDERS: usize = 52;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::Word(w) => write!(f, "{}", w),
        }
    }
}

fn classify(word: String) -> Token {
    if word.eq_ignore_ascii_case("and") {
        Token::And
    } else if word.eq_ignore_ascii_case("or") {
        Token::Or
    } else if word.eq_ignore_ascii_case("not") {
        Token::Not
    } else {
        Token::Word(word)
    }
}

/// Parentheses are structural even when attached to a word: `(A` lexes as
/// `(` followed by `A`.
fn lex(expression: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for word in expression.split_whitespace() {
        let mut current = String::new();
        for c in word.chars() {
            match c {
                '(' | ')' => {
                    if !current.is_empty() {
                        tokens.push(classify(std::mem::take(&mut current)));
                    }
                    tokens.push(if c == '(' {
                        Token::LParen
                    } else {
                        Token::RParen
                    });
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            tokens.push(classify(current));
        }
    }
    tokens
}

/// Letter for the `index`-th distinct token.
fn placeholder(index: usize) -> Option<char> {
    match index {
        0..=25 => Some((b'a' + index as u8) as char),
        26..=51 => Some((b'A' + (index - 26) as u8) as char),
        _ => None,
    }
}

/// Distinct selector tokens and their placeholder letters, in order of
/// first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceholderMap {
    tokens: Vec<String>,
}

impl PlaceholderMap {
    /// Assign letters to the distinct tokens of `tokens`.
    pub fn build<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Result<Self, SelectionError> {
        let mut distinct: Vec<String> = Vec::new();
        for token in tokens {
            if !distinct.iter().any(|t| t == token) {
                distinct.push(token.to_string());
            }
        }
        if distinct.len() > MAX_PLACEHOLDERS {
            return Err(SelectionError::TooManyTokens {
                count: distinct.len(),
                max: MAX_PLACEHOLDERS,
            });
        }
        Ok(PlaceholderMap { tokens: distinct })
    }

    pub fn letter_for(&self, token: &str) -> Option<char> {
        self.tokens
            .iter()
            .position(|t| t == token)
            .and_then(placeholder)
    }

    /// `(letter, token)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| placeholder(i).map(|letter| (letter, token.as_str())))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Predicates keyed by placeholder letter.
#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: HashMap<char, Predicate>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, letter: char, predicate: Predicate) {
        self.functions.insert(letter, predicate);
    }

    pub fn call(&self, letter: char, record: &Record) -> bool {
        self.functions
            .get(&letter)
            .is_some_and(|predicate| predicate.test(record))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(char),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate with `lookup` supplying each placeholder's value.
    pub fn eval(&self, lookup: &mut impl FnMut(char) -> bool) -> bool {
        match self {
            Expr::Var(letter) => lookup(*letter),
            Expr::Not(inner) => !inner.eval(lookup),
            Expr::And(lhs, rhs) => lhs.eval(lookup) && rhs.eval(lookup),
            Expr::Or(lhs, rhs) => lhs.eval(lookup) || rhs.eval(lookup),
        }
    }
}

/// Fully parenthesized form, so precedence is visible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(letter) => write!(f, "{}", letter),
            Expr::Not(inner) => write!(f, "not {}", inner),
            Expr::And(lhs, rhs) => write!(f, "({} and {})", lhs, rhs),
            Expr::Or(lhs, rhs) => write!(f, "({} or {})", lhs, rhs),
        }
    }
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    placeholders: &'a PlaceholderMap,
    pos: usize,
    expression: &'a str,
}

impl<'a> ExprParser<'a> {
    fn malformed(&self, message: impl Into<String>) -> SelectionError {
        SelectionError::Malformed {
            expression: self.expression.to_string(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn parse(mut self) -> Result<Expr, SelectionError> {
        if self.tokens.is_empty() {
            return Err(self.malformed("empty expression"));
        }
        let expr = self.parse_or()?;
        match self.next_token() {
            None => Ok(expr),
            Some(Token::RParen) => Err(self.malformed("unbalanced ')'")),
            Some(token) => Err(self.malformed(format!("unexpected '{}'", token))),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, SelectionError> {
        let mut expr = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.next_token();
            let rhs = self.parse_and()?;
            expr = Expr::Or(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, SelectionError> {
        let mut expr = self.parse_not()?;
        while self.peek() == Some(&Token::And) {
            self.next_token();
            let rhs = self.parse_not()?;
            expr = Expr::And(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<Expr, SelectionError> {
        if self.peek() == Some(&Token::Not) {
            self.next_token();
            let expr = self.parse_not()?;
            Ok(Expr::Not(Box::new(expr)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SelectionError> {
        match self.next_token() {
            Some(Token::Word(word)) => self
                .placeholders
                .letter_for(word)
                .map(Expr::Var)
                .ok_or_else(|| self.malformed(format!("no placeholder for '{}'", word))),
            Some(Token::LParen) => {
                if self.peek() == Some(&Token::RParen) {
                    return Err(self.malformed("empty parentheses"));
                }
                let expr = self.parse_or()?;
                match self.next_token() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(self.malformed("unbalanced '('")),
                }
            }
            Some(Token::RParen) => Err(self.malformed("unbalanced ')'")),
            Some(token) => Err(self.malformed(format!("unexpected '{}'", token))),
            None => Err(self.malformed("unexpected end of expression")),
        }
    }
}

/// An expression ready to be evaluated against records.
#[derive(Debug)]
pub struct CompiledExpression {
    expr: Expr,
    placeholders: PlaceholderMap,
    functions: FunctionTable,
    translated: String,
}

impl CompiledExpression {
    pub fn compile(expression: &str, registry: &SelectorRegistry) -> Result<Self, SelectionError> {
        let tokens = lex(expression);
        let placeholders = PlaceholderMap::build(tokens.iter().filter_map(|t| match t {
            Token::Word(w) => Some(w.as_str()),
            _ => None,
        }))?;

        let translated = translate(&tokens, &placeholders);
        let expr = ExprParser {
            tokens: &tokens,
            placeholders: &placeholders,
            pos: 0,
            expression,
        }
        .parse()?;

        let mut functions = FunctionTable::new();
        for (letter, token) in placeholders.iter() {
            functions.install(letter, resolve_token(token, registry)?);
        }

        tracing::debug!("compiled selection {:?} as {}", expression, expr);
        Ok(CompiledExpression {
            expr,
            placeholders,
            functions,
            translated,
        })
    }

    pub fn evaluate(&self, record: &Record) -> bool {
        self.expr
            .eval(&mut |letter| self.functions.call(letter, record))
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn placeholders(&self) -> &PlaceholderMap {
        &self.placeholders
    }

    /// The expression with every token replaced by its letter.
    pub fn translated(&self) -> &str {
        &self.translated
    }
}

fn translate(tokens: &[Token], placeholders: &PlaceholderMap) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for token in tokens {
        let glue = matches!(prev, None | Some(Token::LParen)) || *token == Token::RParen;
        if !glue {
            out.push(' ');
        }
        match token {
            Token::Word(w) => match placeholders.letter_for(w) {
                Some(letter) => out.push(letter),
                None => out.push_str(w),
            },
            other => out.push_str(&other.to_string()),
        }
        prev = Some(token);
    }
    out
}
