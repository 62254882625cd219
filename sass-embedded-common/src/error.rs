// SPDX-License-Identifier: Apache-2.0

//! The four-way failure taxonomy (design §7): `CompilerError`,
//! `ProtocolError`, `LifecycleError`, and `ValueError`. Each is a
//! `thiserror` enum rather than a bare string, the way crate-public
//! error surfaces are modeled elsewhere in this workspace (e.g.
//! `libdd-profiling`'s `exporter::errors::SendError`); internal
//! plumbing that doesn't cross a crate boundary is free to use
//! `anyhow::Error` and narrate it into one of these at the boundary.

use crate::span::{Diagnostic, Span};

/// The external compiler reported a failed compilation. Not fatal to the
/// supervisor: a `CompilerError` returning from `compile` leaves the
/// supervisor `Idle`.
///
/// `Display`/`{error}` renders the bare message (what S5 in the test
/// scenarios compares against); [`CompilerError::pretty`] renders the full
/// catalogue-plus-error form described in design §4.5.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CompilerError {
    pub message: String,
    pub span: Option<Span>,
    pub stack: Option<String>,
    /// Diagnostics accumulated before the failure, in arrival order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilerError {
    /// The catalogue of accumulated diagnostics, each followed by a
    /// newline, then the error itself — design §4.5.
    pub fn pretty(&self) -> String {
        crate::format::format_compiler_error(self)
    }
}

/// The exchange with the child violated the protocol's expectations.
/// Always triggers a restart attempt.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unknown enum discriminant {discriminant} in field {field}")]
    UnknownDiscriminant { field: &'static str, discriminant: i32 },

    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("compilation id mismatch: expected {expected}, got {actual}")]
    CompilationIdMismatch { expected: u32, actual: u32 },

    #[error("importer id {0} is out of range for this compilation")]
    BadImporterId(u32),

    #[error("canonicalize/import request targeted a load-path importer slot")]
    LoadPathSlotRequested,

    #[error("malformed import url: {0}")]
    MalformedUrl(String),

    #[error("unexpected message variant: {0}")]
    UnexpectedVariant(&'static str),

    #[error("i/o error talking to the compiler subprocess")]
    Io(#[from] std::io::Error),

    #[error("timed out waiting for the compiler subprocess")]
    Timeout,

    #[error("failed to decode a wire message: {0}")]
    Decode(String),
}

/// The child could not be spawned or restarted, or a compile was
/// attempted on a `Broken` supervisor. Non-recoverable for this
/// supervisor instance; the caller must construct a new one.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("failed to spawn compiler subprocess at {path}: {source}")]
    SpawnFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no executable named {0:?} found on PATH")]
    NotFoundOnPath(String),

    #[error("compile rejected: supervisor is in a terminal broken state")]
    Broken,

    #[error("compile rejected: a compile is already in flight on this supervisor")]
    AlreadyActive,
}

/// A host callback's return value failed a typed downcast, or otherwise
/// could not be represented as the Sass value the caller expected.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("expected a {expected} value, got {actual}")]
    WrongVariant {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

/// A blanket error covering anything `compile` can return, used by call
/// sites that want a single error type to match on.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Compiler(#[from] CompilerError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Value(#[from] ValueError),
}
