// SPDX-License-Identifier: Apache-2.0

//! Environment-variable tunables that sit outside the per-call compile
//! API (design §7.2), named after the `ENV_SIDECAR_*` convention used by
//! `datadog-sidecar/src/config.rs`.

/// Overrides the default `tracing` filter directive used when the
/// embedder hasn't installed its own subscriber.
pub const ENV_LOG_LEVEL: &str = "_SASS_HOST_LOG_LEVEL";

/// Overrides the default `overall_timeout_seconds` used by the façade's
/// convenience constructors when the caller doesn't specify one.
pub const ENV_DEFAULT_TIMEOUT_SECS: &str = "_SASS_HOST_DEFAULT_TIMEOUT_SECS";

/// A negative timeout disables the whole-compile budget (design §5).
pub const TIMEOUT_DISABLED: i64 = -1;

pub fn default_timeout_secs() -> i64 {
    std::env::var(ENV_DEFAULT_TIMEOUT_SECS)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(TIMEOUT_DISABLED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_disabled_when_unset() {
        std::env::remove_var(ENV_DEFAULT_TIMEOUT_SECS);
        assert_eq!(default_timeout_secs(), TIMEOUT_DISABLED);
    }
}
