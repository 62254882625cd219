// SPDX-License-Identifier: Apache-2.0

//! A minimal stand-in for the external Embedded Sass compiler binary,
//! speaking just enough of the wire protocol (design §4.1, §6) to drive
//! this workspace's integration tests without depending on the real
//! Dart/Rust Sass compiler. Never shipped; only ever invoked as
//! `env!("CARGO_BIN_EXE_sass-embedded-fake-compiler")` from test code.
//!
//! Response content is driven entirely by markers embedded in the
//! compile input's source text (or, for `compile_file`, the file's
//! contents) — see `handle_compile` below. This lets the test suite
//! pick a scenario just by choosing what to compile, the same way
//! `libdd-ipc/tests/blocking_client.rs`'s stand-in peer is driven by the
//! test that spawns it.

use std::io::{self, Read, Write};
use std::time::Duration;

use sass_embedded_protocol::wire::{
    self, canonicalize_response, compile_request, compile_response, function_call_request,
    function_call_response, import_response, inbound_message, outbound_message, wire_value,
    CanonicalizeRequest, CompileRequest, CompileResponse, FunctionCallRequest, ImportRequest, LogEvent,
    LogEventKind, OutboundMessage, SourceSpan, WireLocation, WireValue,
};
use sass_embedded_protocol::{read_frame, write_frame};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--idle") {
        // Never writes anything; lets the test suite exercise the
        // host's receive timeout without a real hang.
        loop {
            std::thread::sleep(Duration::from_secs(3600));
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    let mut next_request_id: u32 = 1;

    loop {
        let message: wire::InboundMessage = match read_frame(&mut reader) {
            Ok(message) => message,
            Err(_) => break, // host closed the pipe (or we wrote garbage and it hung up)
        };
        match message.message {
            Some(inbound_message::Message::CompileRequest(request)) => {
                if handle_compile(&mut reader, &mut writer, &request, &mut next_request_id).is_err() {
                    break;
                }
            }
            _ => break, // anything else arriving outside a compile is unexpected
        }
    }
}

fn handle_compile(
    reader: &mut impl Read,
    writer: &mut impl Write,
    request: &CompileRequest,
    next_request_id: &mut u32,
) -> io::Result<()> {
    let id = request.id;

    let source = match &request.input {
        Some(compile_request::Input::String(string_input)) => string_input.source.clone(),
        Some(compile_request::Input::Path(path)) => match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return send_failure(writer, id, format!("Cannot open file: {path}"), None, None),
        },
        None => return send_failure(writer, id, "missing compile input".into(), None, None),
    };

    if source.trim() == "FAKE_PROTOCOL_VIOLATION" {
        return send_garbage_frame(writer);
    }

    if source.contains("@include reflexive-position") {
        let span = SourceSpan {
            text: None,
            url: None,
            start: Some(WireLocation { offset: 0, line: 5, column: 2 }),
            end: None,
            context: Some("  @include reflexive-position(top, 12px)".into()),
        };
        return send_failure(
            writer,
            id,
            "\"Property top must be either left or right.\"".into(),
            Some(span),
            None,
        );
    }

    if source.contains("@warn \"First warning\"") {
        send_log(writer, id, LogEventKind::Warning, "First warning")?;
        send_log(writer, id, LogEventKind::Warning, "Second warning")?;
        send_log(writer, id, LogEventKind::DebugMessage, "Third debug")?;
        return send_success(writer, id, String::new(), None);
    }

    if source.contains("!default !global") {
        send_log(writer, id, LogEventKind::Deprecation, "$my-list: () !default !global has no effect")?;
        return send_success(writer, id, String::new(), None);
    }

    if let Some(url) = source.trim().strip_prefix("CUSTOM_IMPORT:") {
        let contents = roundtrip_import(reader, writer, id, url.trim(), next_request_id)?;
        return send_success(writer, id, format!("/* imported */\n{contents}"), None);
    }

    if let Some(name) = source.trim().strip_prefix("CALL_FUNCTION:") {
        let outcome = roundtrip_function_call(
            reader,
            writer,
            id,
            function_call_request::Identifier::Name(name.trim().to_string()),
            next_request_id,
        )?;
        return match outcome {
            Ok(value) => send_success(writer, id, format!(".result {{\n  value: {value};\n}}\n"), None),
            Err(message) => send_failure(writer, id, message, None, None),
        };
    }

    if let Some(raw_id) = source.trim().strip_prefix("CALL_FUNCTION_ID:") {
        let function_id: u32 = raw_id.trim().parse().map_err(io::Error::other)?;
        let outcome = roundtrip_function_call(
            reader,
            writer,
            id,
            function_call_request::Identifier::FunctionId(function_id),
            next_request_id,
        )?;
        return match outcome {
            Ok(value) => send_success(writer, id, format!(".result {{\n  value: {value};\n}}\n"), None),
            Err(message) => send_failure(writer, id, message, None, None),
        };
    }

    // Default: a trivial, deterministic "compile" of `selector { decl; decl }`.
    let css = render_trivial_rule(&source).unwrap_or(source);
    send_success(writer, id, css, None)
}

/// Renders `"a { b: c }"` as `"a {\n  b: c;\n}\n"` — just enough of a
/// Sass compiler to make S1-style assertions ("css begins with `a {`
/// and contains `b: c;`") meaningful without a real compiler.
fn render_trivial_rule(source: &str) -> Option<String> {
    let trimmed = source.trim();
    let open = trimmed.find('{')?;
    let close = trimmed.rfind('}')?;
    if close < open {
        return None;
    }
    let selector = trimmed[..open].trim();
    let body = trimmed[open + 1..close].trim();
    if selector.is_empty() || body.is_empty() {
        return None;
    }
    let mut out = format!("{selector} {{\n");
    for decl in body.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        out.push_str("  ");
        out.push_str(decl);
        out.push_str(";\n");
    }
    out.push_str("}\n");
    Some(out)
}

fn roundtrip_import(
    reader: &mut impl Read,
    writer: &mut impl Write,
    compilation_id: u32,
    url: &str,
    next_request_id: &mut u32,
) -> io::Result<String> {
    let canonicalize_id = *next_request_id;
    *next_request_id += 1;
    write_msg(
        writer,
        &OutboundMessage {
            message: Some(outbound_message::Message::CanonicalizeRequest(CanonicalizeRequest {
                id: canonicalize_id,
                compilation_id,
                importer_id: 4000,
                url: url.to_string(),
                from_import: false,
            })),
        },
    )?;

    let reply: wire::InboundMessage = read_frame(reader).map_err(io::Error::other)?;
    let canonical_url = match reply.message {
        Some(inbound_message::Message::CanonicalizeResponse(response)) if response.id == canonicalize_id => {
            match response.result {
                Some(canonicalize_response::Result::Url(url)) => url,
                _ => return Err(io::Error::other("canonicalize did not return a url")),
            }
        }
        _ => return Err(io::Error::other("expected a CanonicalizeResponse")),
    };

    let import_id = *next_request_id;
    *next_request_id += 1;
    write_msg(
        writer,
        &OutboundMessage {
            message: Some(outbound_message::Message::ImportRequest(ImportRequest {
                id: import_id,
                compilation_id,
                importer_id: 4000,
                url: canonical_url,
            })),
        },
    )?;

    let reply: wire::InboundMessage = read_frame(reader).map_err(io::Error::other)?;
    match reply.message {
        Some(inbound_message::Message::ImportResponse(response)) if response.id == import_id => {
            match response.result {
                Some(import_response::Result::Success(success)) => Ok(success.contents),
                _ => Err(io::Error::other("import did not succeed")),
            }
        }
        _ => Err(io::Error::other("expected an ImportResponse")),
    }
}

/// Round-trips a `FunctionCallRequest`. The outer `io::Result` is a
/// transport-level failure (bad frame, id mismatch); the inner
/// `Result<f64, String>` is the function call's own outcome — `Err`
/// carries the message text the host sent back in a
/// `FunctionCallResponse::Error` (e.g. a `ValueError` from a failed
/// typed downcast), which the caller renders as a compile failure
/// rather than treating as a reason to tear down the child.
fn roundtrip_function_call(
    reader: &mut impl Read,
    writer: &mut impl Write,
    compilation_id: u32,
    identifier: function_call_request::Identifier,
    next_request_id: &mut u32,
) -> io::Result<Result<f64, String>> {
    let request_id = *next_request_id;
    *next_request_id += 1;
    let argument = WireValue {
        value: Some(wire_value::Value::Number(wire_value::WireNumber {
            value: 21.0,
            numerator_units: vec![],
            denominator_units: vec![],
        })),
    };
    write_msg(
        writer,
        &OutboundMessage {
            message: Some(outbound_message::Message::FunctionCallRequest(FunctionCallRequest {
                id: request_id,
                compilation_id,
                identifier: Some(identifier),
                arguments: vec![argument],
            })),
        },
    )?;

    let reply: wire::InboundMessage = read_frame(reader).map_err(io::Error::other)?;
    match reply.message {
        Some(inbound_message::Message::FunctionCallResponse(response)) if response.id == request_id => {
            match response.result {
                Some(function_call_response::Result::Success(value)) => match value.value {
                    Some(wire_value::Value::Number(n)) => Ok(Ok(n.value)),
                    _ => Err(io::Error::other("function call did not return a number")),
                },
                Some(function_call_response::Result::Error(message)) => Ok(Err(message)),
                None => Err(io::Error::other("missing function call result")),
            }
        }
        _ => Err(io::Error::other("expected a FunctionCallResponse")),
    }
}

fn write_msg(writer: &mut impl Write, message: &OutboundMessage) -> io::Result<()> {
    write_frame(writer, message).map_err(io::Error::other)
}

fn send_success(writer: &mut impl Write, id: u32, css: String, source_map: Option<String>) -> io::Result<()> {
    write_msg(
        writer,
        &OutboundMessage {
            message: Some(outbound_message::Message::CompileResponse(CompileResponse {
                id,
                result: Some(compile_response::Result::Success(compile_response::Success { css, source_map })),
            })),
        },
    )
}

fn send_failure(
    writer: &mut impl Write,
    id: u32,
    message: String,
    span: Option<SourceSpan>,
    stack_trace: Option<String>,
) -> io::Result<()> {
    write_msg(
        writer,
        &OutboundMessage {
            message: Some(outbound_message::Message::CompileResponse(CompileResponse {
                id,
                result: Some(compile_response::Result::Failure(compile_response::Failure {
                    message,
                    span,
                    stack_trace,
                })),
            })),
        },
    )
}

fn send_log(writer: &mut impl Write, compilation_id: u32, kind: LogEventKind, message: &str) -> io::Result<()> {
    write_msg(
        writer,
        &OutboundMessage {
            message: Some(outbound_message::Message::LogEvent(LogEvent {
                compilation_id,
                kind: kind as i32,
                message: message.to_string(),
                span: None,
                stack_trace: None,
            })),
        },
    )
}

/// Writes a length-prefixed frame whose payload is not a valid
/// `OutboundMessage` — simulates the "unknown message variant" protocol
/// violation from S6, so the host's decode step fails and triggers a
/// restart.
fn send_garbage_frame(writer: &mut impl Write) -> io::Result<()> {
    let garbage = [0xFFu8; 8];
    writer.write_all(&(garbage.len() as u32).to_le_bytes())?;
    writer.write_all(&garbage)?;
    writer.flush()
}
