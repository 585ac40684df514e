/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Record selection.
//!
//! A selection expression combines selector tokens with `and`, `or`, `not`
//! and parentheses. A token is either the name of a [`Selector`] registered
//! in a [`SelectorRegistry`], or a `field=value` test on one of
//! [`FIELD_SELECTORS`].

pub mod expression;
pub mod select;

use std::collections::HashMap;
use std::fmt;

use crate::error::SelectionError;
use crate::record::Record;

pub use expression::{CompiledExpression, Expr, FunctionTable, PlaceholderMap};
pub use select::select_entries;

/// Fields that may be tested with a `field=value` token.
pub const FIELD_SELECTORS: &[&str] = &["uuid", "slug"];

pub trait Selector {
    fn select(&self, record: &Record) -> bool;
}

pub type SelectorFactory = fn() -> Box<dyn Selector>;

fn make_selector<S: Selector + Default + 'static>() -> Box<dyn Selector> {
    Box::new(S::default())
}

/// Selector names mapped to constructors.
#[derive(Default, Clone)]
pub struct SelectorRegistry {
    factories: HashMap<String, SelectorFactory>,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: Selector + Default + 'static>(&mut self, name: &str) -> &mut Self {
        self.register_factory(name, make_selector::<S>)
    }

    pub fn register_factory(&mut self, name: &str, factory: SelectorFactory) -> &mut Self {
        self.factories.insert(name.to_string(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Selector>> {
        self.factories.get(name).map(|factory| factory())
    }
}

/// A resolved selector token.
pub enum Predicate {
    FieldEquals { field: String, value: String },
    Named { name: String, selector: Box<dyn Selector> },
}

impl Predicate {
    pub fn test(&self, record: &Record) -> bool {
        match self {
            Predicate::FieldEquals { field, value } => record.matches_field(field, value),
            Predicate::Named { selector, .. } => selector.select(record),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::FieldEquals { field, value } => write!(f, "{}={}", field, value),
            Predicate::Named { name, .. } => write!(f, "{}", name),
        }
    }
}

/// Resolve one selector token.
///
/// `field=value` tokens never consult the registry; a field outside
/// [`FIELD_SELECTORS`] is an unknown selector like any missing name.
pub fn resolve_token(token: &str, registry: &SelectorRegistry) -> Result<Predicate, SelectionError> {
    if let Some((field, value)) = token.split_once('=') {
        if FIELD_SELECTORS.contains(&field) {
            return Ok(Predicate::FieldEquals {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        return Err(SelectionError::UnknownSelector(token.to_string()));
    }
    registry
        .create(token)
        .map(|selector| Predicate::Named {
            name: token.to_string(),
            selector,
        })
        .ok_or_else(|| SelectionError::UnknownSelector(token.to_string()))
}
