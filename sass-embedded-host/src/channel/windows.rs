// SPDX-License-Identifier: Apache-2.0

//! Windows stand-in for [`super::unix::PlatformChannel`] (design §4.1):
//! structurally present, mirroring the `cfg(unix)`/`cfg(windows)` split
//! this workspace uses for platform transports (e.g.
//! `libdd-ipc/src/platform/mod.rs`), but without a Windows toolchain to
//! validate a real duplex named-pipe implementation against. Every
//! operation reports `LifecycleError::SpawnFailed` rather than guessing
//! at pipe semantics; `spawn` always fails, so the other methods are
//! unreachable in practice.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sass_embedded_common::{LifecycleError, ProtocolError};
use sass_embedded_protocol::{InboundMessage, OutboundMessage};

pub(crate) struct PlatformChannel {
    #[allow(dead_code)]
    path: PathBuf,
}

impl PlatformChannel {
    pub(crate) fn spawn(path: &Path, _args: &[String], _cwd: &Path) -> Result<Self, LifecycleError> {
        Err(LifecycleError::SpawnFailed {
            path: path.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                "the Windows duplex named-pipe channel is not implemented",
            ),
        })
    }

    pub(crate) fn send(&mut self, _message: &InboundMessage) -> Result<(), ProtocolError> {
        unreachable!("spawn always fails on this platform, so no PlatformChannel is ever constructed")
    }

    pub(crate) fn receive(&mut self, _timeout: Option<Duration>) -> Result<OutboundMessage, ProtocolError> {
        unreachable!("spawn always fails on this platform, so no PlatformChannel is ever constructed")
    }

    pub(crate) fn terminate(&mut self) {
        unreachable!("spawn always fails on this platform, so no PlatformChannel is ever constructed")
    }

    pub(crate) fn process_id(&self) -> u32 {
        unreachable!("spawn always fails on this platform, so no PlatformChannel is ever constructed")
    }
}
