// SPDX-License-Identifier: Apache-2.0

//! The process-wide Dynamic Function Registry (design §4.3): host
//! functions created mid-compile are assigned a stable id here and
//! never forgotten, so a stale id arriving later on the wire (e.g. from
//! a value that outlived its compilation) never dangles. Modeled after
//! the lazily-initialized, mutex-guarded process singletons this
//! workspace already uses for global state (e.g. `datadog-log`'s
//! `LOGGER` static, `datadog-sidecar`'s `EXCEPTION_HASH_LIMITER`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use sass_embedded_common::Value;

/// First id handed out by [`DynamicFunctionRegistry::next_id`] (design
/// §4.3, glossary: "identified by a process-global id").
const FIRST_DYNAMIC_FUNCTION_ID: u32 = 2001;

/// A host callback registered as a Sass dynamic function: takes the
/// already-decoded argument values and returns either a `Value` or an
/// error message to surface to the compiler as a function-call failure.
pub type HostFunction = dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync;

struct Entry {
    signature: String,
    callback: Arc<HostFunction>,
}

struct State {
    next_id: AtomicU32,
    entries: Mutex<HashMap<u32, Entry>>,
}

static REGISTRY: LazyLock<State> = LazyLock::new(|| State {
    next_id: AtomicU32::new(FIRST_DYNAMIC_FUNCTION_ID),
    entries: Mutex::new(HashMap::new()),
});

/// A lookup result: the signature the function was registered with,
/// plus the callback itself.
#[derive(Clone)]
pub struct RegisteredFunction {
    pub signature: String,
    pub callback: Arc<HostFunction>,
}

/// The process-wide Dynamic Function Registry. Zero-sized — all state
/// lives in the `REGISTRY` static, so this is only a namespace for the
/// three operations design §4.3 specifies.
pub struct DynamicFunctionRegistry;

impl DynamicFunctionRegistry {
    /// A fresh, strictly increasing id starting at 2001.
    pub fn next_id() -> u32 {
        REGISTRY.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Registers `callback` under a fresh id and returns it. Entries are
    /// never removed — see the module docs.
    pub fn register(signature: impl Into<String>, callback: Arc<HostFunction>) -> u32 {
        let id = Self::next_id();
        let signature = signature.into();
        #[allow(clippy::unwrap_used)]
        let mut entries = REGISTRY.entries.lock().unwrap();
        entries.insert(id, Entry { signature, callback });
        id
    }

    pub fn lookup(id: u32) -> Option<RegisteredFunction> {
        #[allow(clippy::unwrap_used)]
        let entries = REGISTRY.entries.lock().unwrap();
        entries.get(&id).map(|entry| RegisteredFunction {
            signature: entry.signature.clone(),
            callback: Arc::clone(&entry.callback),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing_and_start_past_2000() {
        let a = DynamicFunctionRegistry::next_id();
        let b = DynamicFunctionRegistry::next_id();
        assert!(a >= FIRST_DYNAMIC_FUNCTION_ID);
        assert!(b > a);
    }

    #[test]
    fn registered_function_is_found_by_its_id() {
        let id = DynamicFunctionRegistry::register("my-fn($a)", Arc::new(|args| Ok(args[0].clone())));
        let found = DynamicFunctionRegistry::lookup(id).expect("just registered");
        assert_eq!(found.signature, "my-fn($a)");
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert!(DynamicFunctionRegistry::lookup(u32::MAX).is_none());
    }
}
