// SPDX-License-Identifier: Apache-2.0

//! Error Formatting (design §4.5): composes user-facing text for
//! compiler errors and diagnostics, including span context and stack
//! traces. Locations are stored zero-based and displayed one-based.

use crate::error::CompilerError;
use crate::span::{Diagnostic, DiagnosticKind, Span};

fn format_span_prefix(span: &Span) -> String {
    let file = span.url.as_deref().unwrap_or("-");
    format!("{}:{}:{} ", file, span.start.line + 1, span.start.column + 1)
}

fn format_context(span: &Span) -> Option<String> {
    let context = span.context.as_ref()?;
    let line_no = span.start.line + 1;
    let gutter = format!("{line_no} │ ");
    let mut out = String::new();
    out.push_str(&gutter);
    out.push_str(context);
    if !context.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}

fn format_stack(stack: &str) -> String {
    stack
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_body(tag: &str, text: &str, span: Option<&Span>, stack: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(span) = span {
        out.push_str(&format_span_prefix(span));
    }
    out.push_str(tag);
    out.push_str(": ");
    out.push_str(text);
    if let Some(span) = span {
        if let Some(context) = format_context(span) {
            out.push('\n');
            out.push_str(context.trim_end_matches('\n'));
        }
    }
    if let Some(stack) = stack {
        if !stack.is_empty() {
            out.push('\n');
            out.push_str(&format_stack(stack));
        }
    }
    out
}

/// Renders a single diagnostic the way the compiler's own CLI would:
/// optional `file:line:col` prefix, a type tag, the message body, and an
/// indented stack trace.
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format_body(
        diagnostic.kind.tag(),
        &diagnostic.text,
        diagnostic.span.as_ref(),
        diagnostic.stack.as_deref(),
    )
}

/// Renders the `error` form of a message that isn't (yet) wrapped in a
/// `CompilerError`, e.g. while building one up.
pub fn format_error_body(text: &str, span: Option<&Span>, stack: Option<&str>) -> String {
    format_body("Error", text, span, stack)
}

/// The catalogue of diagnostics accumulated before a failing compile,
/// each followed by a newline, then the error itself.
pub fn format_compiler_error(error: &CompilerError) -> String {
    let mut out = String::new();
    for diagnostic in &error.diagnostics {
        out.push_str(&format_diagnostic(diagnostic));
        out.push('\n');
    }
    out.push_str(&format_error_body(
        &error.message,
        error.span.as_ref(),
        error.stack.as_deref(),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Location;

    #[test]
    fn plain_message_has_no_prefix() {
        let d = Diagnostic {
            kind: DiagnosticKind::Debug,
            text: "hello".into(),
            span: None,
            stack: None,
        };
        assert_eq!(format_diagnostic(&d), "debug: hello");
    }

    #[test]
    fn span_prefix_is_one_based() {
        let span = Span {
            text: None,
            url: Some("foo.scss".into()),
            start: Location::new(0, 0, 0),
            end: None,
            context: None,
        };
        let d = Diagnostic {
            kind: DiagnosticKind::Warning,
            text: "oops".into(),
            span: Some(span),
            stack: None,
        };
        assert_eq!(format_diagnostic(&d), "foo.scss:1:1 warning: oops");
    }

    #[test]
    fn compiler_error_pretty_includes_diagnostics_then_error() {
        let err = CompilerError {
            message: "boom".into(),
            span: None,
            stack: None,
            diagnostics: vec![Diagnostic {
                kind: DiagnosticKind::Warning,
                text: "heads up".into(),
                span: None,
                stack: None,
            }],
        };
        let pretty = err.pretty();
        assert_eq!(pretty, "warning: heads up\nError: boom");
    }

    #[test]
    fn stack_trace_is_indented_four_spaces() {
        let out = format_error_body("boom", None, Some("at foo\nat bar"));
        assert_eq!(out, "Error: boom\n    at foo\n    at bar");
    }

    #[test]
    fn context_line_is_caret_gutter_style() {
        let span = Span {
            text: None,
            url: None,
            start: Location::new(0, 5, 2),
            end: None,
            context: Some("  @include reflexive-position(top, 12px)".into()),
        };
        let out = format_error_body("nope", Some(&span), None);
        assert!(out.contains("6 │   @include reflexive-position(top, 12px)"));
    }
}
