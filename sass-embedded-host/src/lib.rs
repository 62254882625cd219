// SPDX-License-Identifier: Apache-2.0
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]

//! The embedded Sass compiler host: supervises an external compiler
//! subprocess, speaks its length-prefixed binary protocol, and exposes a
//! synchronous `compile` API (design §1). The [`Supervisor`] is the
//! whole public surface; the subprocess channel it drives is never
//! exposed outside this crate (design §9).

mod channel;
mod driver;
mod function;
mod importer;
mod registry;
mod results;

pub use driver::{CompileInput, Supervisor, SupervisorState};
pub use function::{merge_functions, HostFunctionDef};
pub use importer::{CustomImporter, ImportResolver, LoadedStylesheet};
pub use registry::{DynamicFunctionRegistry, HostFunction, RegisteredFunction};
pub use results::CompilerResults;

pub use sass_embedded_common::{
    CompilerError, Diagnostic, DiagnosticKind, HostError, InputSyntax, LifecycleError, Location,
    OutputStyle, ProtocolError, SassNumber, Span, Value, ValueError,
};
