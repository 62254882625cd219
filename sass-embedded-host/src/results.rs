// SPDX-License-Identifier: Apache-2.0

//! `CompilerResults`: the success outcome of a compile (design §4.4).

use sass_embedded_common::Diagnostic;

/// The output of a successful compile. The source map, when requested,
/// is carried as the raw JSON string the compiler emitted and passed
/// through unparsed; this crate does no source-map post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerResults {
    pub css: String,
    pub source_map: Option<String>,
    /// Diagnostics accumulated between the `CompileRequest` and the
    /// terminal `CompileResponse`, in arrival order (design §8, property
    /// 3).
    pub diagnostics: Vec<Diagnostic>,
}
