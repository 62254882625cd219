// SPDX-License-Identifier: Apache-2.0
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]

//! The wire schema (design §4.2, §6) and the stateless codec that
//! converts between it and the types in `sass-embedded-common`.
//!
//! This crate has no knowledge of the subprocess, the supervisor state
//! machine, or sockets — it only knows how to turn bytes into messages
//! and messages into bytes. `sass-embedded-host` is the only caller.

pub mod codec;
pub mod framing;
pub mod wire;

pub use framing::{is_clean_eof, read_frame, write_frame};
pub use wire::{InboundMessage, OutboundMessage};
