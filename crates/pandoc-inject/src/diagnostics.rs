/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! DiagnosticCollector - collects the messages reported during one filter pass

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Info => write!(f, "INFO"),
            DiagnosticKind::Warning => write!(f, "WARNING"),
            DiagnosticKind::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn to_text(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }
}

/// Collector for diagnostic messages.
///
/// Every message is also forwarded to `tracing` at the matching level, so
/// a subscriber sees the same stream the collector records.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            DiagnosticKind::Info => tracing::info!("{}", message),
            DiagnosticKind::Warning => tracing::warn!("{}", message),
            DiagnosticKind::Error => tracing::error!("{}", message),
        }
        self.diagnostics.push(Diagnostic { kind, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(DiagnosticKind::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.add(DiagnosticKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(DiagnosticKind::Error, message);
    }

    /// Check if any errors were collected (warnings don't count)
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Messages of one kind, in the order they were reported.
    pub fn messages(&self, kind: DiagnosticKind) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.message.as_str())
            .collect()
    }

    pub fn to_text(&self) -> Vec<String> {
        self.diagnostics.iter().map(Diagnostic::to_text).collect()
    }
}
