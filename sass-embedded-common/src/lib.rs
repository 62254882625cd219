// SPDX-License-Identifier: Apache-2.0
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]

//! Shared plumbing for the embedded Sass compiler host: the error
//! taxonomy (§7 of the design), the `tracing` bootstrap, and the
//! environment-variable tunables that sit outside the per-call compile
//! API.

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod options;
pub mod span;
pub mod value;

pub use error::{CompilerError, HostError, LifecycleError, ProtocolError, ValueError};
pub use options::{InputSyntax, OutputStyle};
pub use span::{Diagnostic, DiagnosticKind, Location, Span};
pub use value::{
    CompilerFunctionId, DynamicFunctionRef, ListSeparator, SassColor, SassNumber, Value,
    ValueVisitor,
};
