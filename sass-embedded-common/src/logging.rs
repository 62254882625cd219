// SPDX-License-Identifier: Apache-2.0

//! The `tracing` bootstrap (design §7.1). We never write to stdout or
//! stderr directly — the host's own diagnostics are emitted as
//! `tracing` spans/events, and routing them anywhere is left to
//! whatever subscriber the embedder installs. `init_default` is a
//! convenience for embedders (and our own integration tests) that
//! haven't installed one of their own; it is a no-op if a global
//! subscriber is already set.

use crate::config::ENV_LOG_LEVEL;
use tracing_subscriber::EnvFilter;

/// Installs a best-effort `fmt` subscriber filtered by
/// `_SASS_HOST_LOG_LEVEL` (falling back to `warn`). Returns `false`
/// without panicking if a global subscriber is already installed.
pub fn init_default() -> bool {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
