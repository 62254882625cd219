// SPDX-License-Identifier: Apache-2.0

//! The per-call/global host function table (design §3's `CompileJob`
//! field "a mapping from function name to host callback", and design
//! §4.4 step 3's "name→callback table retained for dispatch"). Distinct
//! from the process-wide [`crate::registry::DynamicFunctionRegistry`]:
//! these are functions known up front by signature, transmitted to the
//! compiler before compilation starts, not created mid-compile.

use crate::registry::HostFunction;
use std::sync::Arc;

/// A host function as declared to the compiler: the Sass signature
/// string it's registered under (e.g. `"my-fn($a, $b: null)"`) plus the
/// callback invoked for it.
#[derive(Clone)]
pub struct HostFunctionDef {
    pub signature: String,
    pub callback: Arc<HostFunction>,
}

impl HostFunctionDef {
    pub fn new(signature: impl Into<String>, callback: Arc<HostFunction>) -> Self {
        HostFunctionDef { signature: signature.into(), callback }
    }

    /// The bare function name a signature is dispatched under — the text
    /// before the first `(`, trimmed. `"my-fn($a, $b)"` dispatches as
    /// `"my-fn"`.
    pub fn name(&self) -> &str {
        self.signature.split('(').next().unwrap_or(&self.signature).trim()
    }
}

/// Merges `globals` and `overrides` into the effective per-compile
/// function list (design §4.4 step 3: "per-call overrides global by
/// function name, not by full signature"). Globals keep their original
/// position; an override with a name already present replaces that
/// entry in place, preserving order; a genuinely new name is appended.
pub fn merge_functions(globals: &[HostFunctionDef], overrides: &[HostFunctionDef]) -> Vec<HostFunctionDef> {
    let mut merged: Vec<HostFunctionDef> = globals.to_vec();
    for over in overrides {
        if let Some(slot) = merged.iter_mut().find(|existing| existing.name() == over.name()) {
            *slot = over.clone();
        } else {
            merged.push(over.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use sass_embedded_common::Value;

    fn def(signature: &str) -> HostFunctionDef {
        HostFunctionDef::new(signature, Arc::new(|_args| Ok(Value::Null)))
    }

    #[test]
    fn name_is_the_text_before_the_first_paren() {
        assert_eq!(def("my-fn($a, $b: null)").name(), "my-fn");
        assert_eq!(def("bare-name()").name(), "bare-name");
    }

    #[test]
    fn per_call_override_replaces_by_name_preserving_position() {
        let globals = vec![def("a()"), def("b($x)")];
        let overrides = vec![def("b($x, $y)")];
        let merged = merge_functions(&globals, &overrides);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].signature, "b($x, $y)");
    }

    #[test]
    fn per_call_new_name_is_appended() {
        let globals = vec![def("a()")];
        let overrides = vec![def("c()")];
        let merged = merge_functions(&globals, &overrides);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].name(), "c");
    }
}
