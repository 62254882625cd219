// SPDX-License-Identifier: Apache-2.0

//! The unix Subprocess Channel (design §4.1): an anonymous
//! `SOCK_STREAM` socket pair, one end kept by the host as a
//! `UnixStream`, the other dup2'd onto the child's stdin *and* stdout
//! before `execve`. Grounded on the identical socketpair technique in
//! `datadog-crashtracker/src/collector/receiver_manager.rs`, adapted
//! from that file's signal-handler-safe `vfork`+manual-`execve` dance to
//! an ordinary `std::process::Command` + `pre_exec` spawn, since this
//! channel is created from regular host code, not from inside a signal
//! handler.

use std::io;
use std::os::fd::{IntoRawFd, OwnedFd};
use std::os::unix::net::UnixStream;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use nix::sys::socket::{socketpair, AddressFamily, SockFlag, SockType};
use sass_embedded_common::{LifecycleError, ProtocolError};
use sass_embedded_protocol::{read_frame, write_frame, InboundMessage, OutboundMessage};

pub(crate) struct PlatformChannel {
    child: Child,
    stream: UnixStream,
}

impl PlatformChannel {
    pub(crate) fn spawn(path: &Path, args: &[String], cwd: &Path) -> Result<Self, LifecycleError> {
        let (host_fd, child_fd): (OwnedFd, OwnedFd) = socketpair(
            AddressFamily::Unix,
            SockType::Stream,
            None,
            SockFlag::empty(),
        )
        .map_err(|errno| LifecycleError::SpawnFailed {
            path: path.to_path_buf(),
            source: io::Error::from_raw_os_error(errno as i32),
        })?;

        let mut command = Command::new(path);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let raw_child_fd = child_fd.into_raw_fd();
        // SAFETY: the closure only calls `dup2`/`close`, both
        // async-signal-safe, and touches no Rust-managed state.
        unsafe {
            command.pre_exec(move || {
                if libc::dup2(raw_child_fd, 0) < 0 {
                    return Err(io::Error::last_os_error());
                }
                if libc::dup2(raw_child_fd, 1) < 0 {
                    return Err(io::Error::last_os_error());
                }
                libc::close(raw_child_fd);
                Ok(())
            });
        }

        let child = command.spawn().map_err(|source| LifecycleError::SpawnFailed {
            path: path.to_path_buf(),
            source,
        })?;

        // The fork already happened; drop this process's handle to the
        // child's end so the host doesn't keep it alive after the child
        // exits.
        // SAFETY: `raw_child_fd` was produced by `into_raw_fd` above and
        // is not used anywhere else in this process.
        unsafe { libc::close(raw_child_fd) };

        let stream = UnixStream::from(host_fd);
        Ok(PlatformChannel { child, stream })
    }

    pub(crate) fn send(&mut self, message: &InboundMessage) -> Result<(), ProtocolError> {
        write_frame(&mut self.stream, message)
    }

    pub(crate) fn receive(&mut self, timeout: Option<Duration>) -> Result<OutboundMessage, ProtocolError> {
        self.stream.set_read_timeout(timeout)?;
        match read_frame(&mut self.stream) {
            Ok(message) => Ok(message),
            Err(ProtocolError::Io(err)) if is_timeout(&err) => Err(ProtocolError::Timeout),
            Err(other) => Err(other),
        }
    }

    pub(crate) fn terminate(&mut self) {
        let _ = self.child.kill();
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
    }

    pub(crate) fn process_id(&self) -> u32 {
        self.child.id()
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sass_embedded_protocol::wire::{inbound_message, outbound_message, CompileRequest, LogEvent};

    fn fake_compiler_path() -> std::path::PathBuf {
        std::path::PathBuf::from(env!("CARGO_BIN_EXE_sass-embedded-fake-compiler"))
    }

    #[test]
    fn spawns_and_round_trips_one_message() {
        let mut channel = PlatformChannel::spawn(&fake_compiler_path(), &[], &std::env::temp_dir())
            .expect("fake compiler spawns");

        channel
            .send(&InboundMessage {
                message: Some(inbound_message::Message::CompileRequest(CompileRequest {
                    id: 1,
                    input: Some(sass_embedded_protocol::wire::compile_request::Input::String(
                        sass_embedded_protocol::wire::compile_request::StringInput {
                            source: "a { b: c }".into(),
                            syntax: 0,
                            url: None,
                        },
                    )),
                    style: 0,
                    source_map: false,
                    importers: vec![],
                    global_functions: vec![],
                })),
            })
            .expect("send succeeds");

        let response = channel.receive(Some(Duration::from_secs(5))).expect("receives a reply");
        match response.message {
            Some(outbound_message::Message::CompileResponse(r)) => assert_eq!(r.id, 1),
            other => panic!("expected a CompileResponse, got {other:?}"),
        }
        channel.terminate();
    }

    #[test]
    fn receive_times_out_when_the_child_sends_nothing() {
        let mut channel = PlatformChannel::spawn(&fake_compiler_path(), &["--idle".into()], &std::env::temp_dir())
            .expect("fake compiler spawns");
        let err = channel
            .receive(Some(Duration::from_millis(200)))
            .expect_err("nothing arrives");
        assert!(matches!(err, ProtocolError::Timeout));
        channel.terminate();
    }

    #[test]
    #[allow(unused)]
    fn silence_unused_log_event_import() {
        let _ = std::mem::size_of::<LogEvent>();
    }
}
