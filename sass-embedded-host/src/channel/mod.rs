// SPDX-License-Identifier: Apache-2.0

//! The Subprocess Channel (design §4.1): spawns the compiler binary,
//! owns the stdin/stdout pair, frames length-prefixed messages, and
//! provides blocking send/receive. The platform-specific plumbing lives
//! in `unix`/`windows`; this module is the public, platform-neutral
//! surface the Supervisor drives.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix::PlatformChannel;
#[cfg(windows)]
use windows::PlatformChannel;

use std::path::Path;
use std::time::Duration;

use sass_embedded_common::{LifecycleError, ProtocolError};
use sass_embedded_protocol::{InboundMessage, OutboundMessage};

/// One end of the framed duplex connection to a compiler subprocess.
/// Exclusive ownership: never shared across threads concurrently (design
/// §4.1, §5).
pub struct Channel(PlatformChannel);

impl Channel {
    /// Starts `path` with its stdin/stdout wired to a fresh stream
    /// socket pair and its stderr discarded. Failure to start is a
    /// [`LifecycleError`].
    pub fn spawn(path: &Path, args: &[String], cwd: &Path) -> Result<Self, LifecycleError> {
        PlatformChannel::spawn(path, args, cwd).map(Channel)
    }

    /// Serializes and frames `message`, then writes it atomically.
    pub fn send(&mut self, message: &InboundMessage) -> Result<(), ProtocolError> {
        self.0.send(message)
    }

    /// Blocks up to `timeout` (`None` = infinite) for one full framed
    /// message. A non-blocking-would-block or OS timeout is reported as
    /// [`ProtocolError::Timeout`].
    pub fn receive(&mut self, timeout: Option<Duration>) -> Result<OutboundMessage, ProtocolError> {
        self.0.receive(timeout)
    }

    /// Kills the child and closes the pipes. Safe to call more than
    /// once.
    pub fn terminate(&mut self) {
        self.0.terminate()
    }

    pub fn process_id(&self) -> u32 {
        self.0.process_id()
    }
}
