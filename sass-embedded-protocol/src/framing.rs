// SPDX-License-Identifier: Apache-2.0

//! The length-delimited framing the compiler subprocess speaks on its
//! stdin/stdout pair (design §6): each message is a 4-byte
//! little-endian length prefix followed by that many bytes of encoded
//! `InboundMessage`/`OutboundMessage`. Blocking, not `tokio`-based — the
//! teacher's `tokio_util::codec::LengthDelimitedCodec` is async; the
//! Subprocess Channel in `sass-embedded-host` talks to the child over a
//! plain blocking `UnixStream`, so this reimplements the same framing
//! rule directly against `std::io::Read`/`Write`.

use std::io::{self, Read, Write};

use prost::Message;
use sass_embedded_common::ProtocolError;

/// The largest frame we'll allocate a buffer for. A well-behaved
/// compiler never approaches this; a misbehaving one that claims a
/// multi-gigabyte frame gets a `Malformed` error instead of an OOM.
const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// Reads one length-prefixed frame and decodes it as `M`.
pub fn read_frame<M: Message + Default>(reader: &mut impl Read) -> Result<M, ProtocolError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::Malformed(format!(
            "frame length {len} exceeds the {MAX_FRAME_LEN} byte limit"
        )));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    M::decode(payload.as_slice()).map_err(|e| ProtocolError::Decode(e.to_string()))
}

/// Encodes `message` and writes it as one length-prefixed frame.
pub fn write_frame<M: Message>(writer: &mut impl Write, message: &M) -> Result<(), ProtocolError> {
    let payload = message.encode_to_vec();
    let len: u32 = payload
        .len()
        .try_into()
        .map_err(|_| ProtocolError::Malformed("outgoing message exceeds u32::MAX bytes".into()))?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

/// Used by [`read_frame`] callers that want to distinguish a clean EOF
/// (the child exited between messages, not mid-frame) from a real I/O
/// error.
pub fn is_clean_eof(err: &ProtocolError) -> bool {
    matches!(err, ProtocolError::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{inbound_message, CompileRequest, InboundMessage};
    use std::io::Cursor;

    #[test]
    fn round_trips_a_frame() {
        let message = InboundMessage {
            message: Some(inbound_message::Message::CompileRequest(CompileRequest {
                id: 7,
                input: None,
                style: 0,
                source_map: false,
                importers: vec![],
                global_functions: vec![],
            })),
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &message).expect("writes");

        let mut cursor = Cursor::new(buf);
        let decoded: InboundMessage = read_frame(&mut cursor).expect("reads");
        assert_eq!(decoded, message);
    }

    #[test]
    fn oversized_length_prefix_is_rejected_before_allocating() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(MAX_FRAME_LEN + 1).to_le_bytes());
        let mut cursor = Cursor::new(buf);
        let err = read_frame::<InboundMessage>(&mut cursor).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn truncated_frame_is_an_io_error() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&10u32.to_le_bytes());
        buf.extend_from_slice(b"short");
        let mut cursor = Cursor::new(buf);
        let err = read_frame::<InboundMessage>(&mut cursor).unwrap_err();
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
