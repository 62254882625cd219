// SPDX-License-Identifier: Apache-2.0

//! `Span`, `Location`, and `Diagnostic` (design §3). Zero-based in
//! memory, rendered 1-based in [`crate::format`].

/// A zero-based source position: byte offset, line, and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }
}

/// A source range, plus enough context to render it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub text: Option<String>,
    pub url: Option<String>,
    pub start: Location,
    pub end: Option<Location>,
    /// The full source line (or lines) the span sits in, used to render
    /// the caret-underlined context line in `pretty` output.
    pub context: Option<String>,
}

/// The three non-fatal diagnostic kinds the compiler can emit mid-compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Warning,
    Deprecation,
    Debug,
}

impl DiagnosticKind {
    pub fn tag(self) -> &'static str {
        match self {
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Deprecation => "deprecation warning",
            DiagnosticKind::Debug => "debug",
        }
    }
}

/// A non-fatal message produced during compilation (design §3,
/// `CompilerMessage` in the wire protocol). Ordered by arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub text: String,
    pub span: Option<Span>,
    pub stack: Option<String>,
}
