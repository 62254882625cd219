// SPDX-License-Identifier: Apache-2.0

//! The wire schema for the Embedded Sass protocol (design §4.2, §6).
//!
//! These types are hand-derived `prost::Message`/`prost::Oneof` structs
//! rather than `protoc`-generated ones: the published `.proto` is long
//! and stable, so — the way `datadog-trace-protobuf` checks in its
//! generated `_includes.rs` rather than regenerating it on every build —
//! we write the generated-code shape directly and skip the
//! `build.rs`/`protoc` step entirely.

use prost::{Enumeration, Message, Oneof};

// ---------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------

/// Everything the host may send to the compiler.
#[derive(Clone, PartialEq, Message)]
pub struct InboundMessage {
    #[prost(oneof = "inbound_message::Message", tags = "1, 2, 3, 4")]
    pub message: Option<inbound_message::Message>,
}

pub mod inbound_message {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Message {
        #[prost(message, tag = "1")]
        CompileRequest(super::CompileRequest),
        #[prost(message, tag = "2")]
        CanonicalizeResponse(super::CanonicalizeResponse),
        #[prost(message, tag = "3")]
        ImportResponse(super::ImportResponse),
        #[prost(message, tag = "4")]
        FunctionCallResponse(super::FunctionCallResponse),
    }
}

/// Everything the compiler may send to the host.
#[derive(Clone, PartialEq, Message)]
pub struct OutboundMessage {
    #[prost(oneof = "outbound_message::Message", tags = "1, 2, 3, 4, 5, 6")]
    pub message: Option<outbound_message::Message>,
}

pub mod outbound_message {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Message {
        #[prost(message, tag = "1")]
        CompileResponse(super::CompileResponse),
        #[prost(message, tag = "2")]
        LogEvent(super::LogEvent),
        #[prost(message, tag = "3")]
        ProtocolError(super::ProtocolError),
        #[prost(message, tag = "4")]
        CanonicalizeRequest(super::CanonicalizeRequest),
        #[prost(message, tag = "5")]
        ImportRequest(super::ImportRequest),
        #[prost(message, tag = "6")]
        FunctionCallRequest(super::FunctionCallRequest),
    }
}

// ---------------------------------------------------------------------
// Shared enums
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enumeration)]
#[repr(i32)]
pub enum OutputStyle {
    Expanded = 0,
    Compact = 1,
    Compressed = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enumeration)]
#[repr(i32)]
pub enum Syntax {
    Scss = 0,
    Indented = 1,
    Css = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enumeration)]
#[repr(i32)]
pub enum LogEventKind {
    Warning = 0,
    Deprecation = 1,
    DebugMessage = 2,
}

// ---------------------------------------------------------------------
// CompileRequest / CompileResponse
// ---------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct CompileRequest {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(oneof = "compile_request::Input", tags = "2, 3")]
    pub input: Option<compile_request::Input>,
    #[prost(enumeration = "OutputStyle", tag = "4")]
    pub style: i32,
    #[prost(bool, tag = "5")]
    pub source_map: bool,
    #[prost(message, repeated, tag = "6")]
    pub importers: Vec<ImporterDescriptor>,
    #[prost(string, repeated, tag = "7")]
    pub global_functions: Vec<String>,
}

pub mod compile_request {
    use super::*;

    #[derive(Clone, PartialEq, Message)]
    pub struct StringInput {
        #[prost(string, tag = "1")]
        pub source: String,
        #[prost(enumeration = "Syntax", tag = "2")]
        pub syntax: i32,
        #[prost(string, optional, tag = "3")]
        pub url: Option<String>,
    }

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Input {
        #[prost(message, tag = "2")]
        String(StringInput),
        #[prost(string, tag = "3")]
        Path(String),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct ImporterDescriptor {
    #[prost(oneof = "importer_descriptor::Importer", tags = "1, 2")]
    pub importer: Option<importer_descriptor::Importer>,
}

pub mod importer_descriptor {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Importer {
        #[prost(string, tag = "1")]
        Path(String),
        #[prost(uint32, tag = "2")]
        ImporterId(u32),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct CompileResponse {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(oneof = "compile_response::Result", tags = "2, 3")]
    pub result: Option<compile_response::Result>,
}

pub mod compile_response {
    use super::*;

    #[derive(Clone, PartialEq, Message)]
    pub struct Success {
        #[prost(string, tag = "1")]
        pub css: String,
        #[prost(string, optional, tag = "2")]
        pub source_map: Option<String>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Failure {
        #[prost(string, tag = "1")]
        pub message: String,
        #[prost(message, optional, tag = "2")]
        pub span: Option<super::SourceSpan>,
        #[prost(string, optional, tag = "3")]
        pub stack_trace: Option<String>,
    }

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Result {
        #[prost(message, tag = "2")]
        Success(Success),
        #[prost(message, tag = "3")]
        Failure(Failure),
    }
}

// ---------------------------------------------------------------------
// LogEvent / ProtocolError
// ---------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct LogEvent {
    #[prost(uint32, tag = "1")]
    pub compilation_id: u32,
    #[prost(enumeration = "LogEventKind", tag = "2")]
    pub kind: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(message, optional, tag = "4")]
    pub span: Option<SourceSpan>,
    #[prost(string, optional, tag = "5")]
    pub stack_trace: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ProtocolError {
    #[prost(uint32, optional, tag = "1")]
    pub compilation_id: Option<u32>,
    #[prost(string, tag = "2")]
    pub message: String,
}

// ---------------------------------------------------------------------
// Canonicalize / Import
// ---------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct CanonicalizeRequest {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    pub compilation_id: u32,
    #[prost(uint32, tag = "3")]
    pub importer_id: u32,
    #[prost(string, tag = "4")]
    pub url: String,
    #[prost(bool, tag = "5")]
    pub from_import: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct CanonicalizeResponse {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(oneof = "canonicalize_response::Result", tags = "2, 3")]
    pub result: Option<canonicalize_response::Result>,
}

pub mod canonicalize_response {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Result {
        #[prost(string, tag = "2")]
        Url(String),
        #[prost(string, tag = "3")]
        Error(String),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct ImportRequest {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    pub compilation_id: u32,
    #[prost(uint32, tag = "3")]
    pub importer_id: u32,
    #[prost(string, tag = "4")]
    pub url: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct ImportResponse {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(oneof = "import_response::Result", tags = "2, 3")]
    pub result: Option<import_response::Result>,
}

pub mod import_response {
    use super::*;

    #[derive(Clone, PartialEq, Message)]
    pub struct Success {
        #[prost(string, tag = "1")]
        pub contents: String,
        #[prost(enumeration = "super::Syntax", tag = "2")]
        pub syntax: i32,
        #[prost(string, optional, tag = "3")]
        pub source_map_url: Option<String>,
    }

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Result {
        #[prost(message, tag = "2")]
        Success(Success),
        #[prost(string, tag = "3")]
        Error(String),
    }
}

// ---------------------------------------------------------------------
// FunctionCall
// ---------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct FunctionCallRequest {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    pub compilation_id: u32,
    #[prost(oneof = "function_call_request::Identifier", tags = "3, 4")]
    pub identifier: Option<function_call_request::Identifier>,
    #[prost(message, repeated, tag = "5")]
    pub arguments: Vec<WireValue>,
}

pub mod function_call_request {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Identifier {
        #[prost(uint32, tag = "3")]
        FunctionId(u32),
        #[prost(string, tag = "4")]
        Name(String),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct FunctionCallResponse {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(oneof = "function_call_response::Result", tags = "2, 3")]
    pub result: Option<function_call_response::Result>,
}

pub mod function_call_response {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Result {
        #[prost(message, tag = "2")]
        Success(WireValue),
        #[prost(string, tag = "3")]
        Error(String),
    }
}

// ---------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enumeration)]
#[repr(i32)]
pub enum WireListSeparator {
    Comma = 0,
    Space = 1,
    Slash = 2,
    Undecided = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enumeration)]
#[repr(i32)]
pub enum WireSingleton {
    True = 0,
    False = 1,
    Null = 2,
}

#[derive(Clone, PartialEq, Message)]
pub struct WireValue {
    #[prost(oneof = "wire_value::Value", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9")]
    pub value: Option<wire_value::Value>,
}

pub mod wire_value {
    use super::*;

    #[derive(Clone, PartialEq, Message)]
    pub struct WireString {
        #[prost(string, tag = "1")]
        pub text: String,
        #[prost(bool, tag = "2")]
        pub quoted: bool,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct WireNumber {
        #[prost(double, tag = "1")]
        pub value: f64,
        #[prost(string, repeated, tag = "2")]
        pub numerator_units: Vec<String>,
        #[prost(string, repeated, tag = "3")]
        pub denominator_units: Vec<String>,
    }

    #[derive(Clone, Copy, PartialEq, Message)]
    pub struct WireRgba {
        #[prost(uint32, tag = "1")]
        pub red: u32,
        #[prost(uint32, tag = "2")]
        pub green: u32,
        #[prost(uint32, tag = "3")]
        pub blue: u32,
        #[prost(double, tag = "4")]
        pub alpha: f64,
    }

    #[derive(Clone, Copy, PartialEq, Message)]
    pub struct WireHsla {
        #[prost(double, tag = "1")]
        pub hue: f64,
        #[prost(double, tag = "2")]
        pub saturation: f64,
        #[prost(double, tag = "3")]
        pub lightness: f64,
        #[prost(double, tag = "4")]
        pub alpha: f64,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct WireList {
        #[prost(message, repeated, tag = "1")]
        pub contents: Vec<super::WireValue>,
        #[prost(enumeration = "super::WireListSeparator", tag = "2")]
        pub separator: i32,
        #[prost(bool, tag = "3")]
        pub has_brackets: bool,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct WireMapEntry {
        #[prost(message, optional, tag = "1")]
        pub key: Option<super::WireValue>,
        #[prost(message, optional, tag = "2")]
        pub value: Option<super::WireValue>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct WireMap {
        #[prost(message, repeated, tag = "1")]
        pub entries: Vec<WireMapEntry>,
    }

    #[derive(Clone, Copy, PartialEq, Message)]
    pub struct WireCompilerFunction {
        #[prost(uint32, tag = "1")]
        pub id: u32,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct WireHostFunction {
        #[prost(uint32, tag = "1")]
        pub id: u32,
        #[prost(string, tag = "2")]
        pub signature: String,
    }

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Value {
        #[prost(message, tag = "1")]
        String(WireString),
        #[prost(message, tag = "2")]
        Number(WireNumber),
        #[prost(message, tag = "3")]
        RgbaColor(WireRgba),
        #[prost(message, tag = "4")]
        HslaColor(WireHsla),
        #[prost(enumeration = "super::WireSingleton", tag = "5")]
        Singleton(i32),
        #[prost(message, tag = "6")]
        List(WireList),
        #[prost(message, tag = "7")]
        Map(WireMap),
        #[prost(message, tag = "8")]
        CompilerFunction(WireCompilerFunction),
        #[prost(message, tag = "9")]
        HostFunction(WireHostFunction),
    }
}

// ---------------------------------------------------------------------
// Span / Location
// ---------------------------------------------------------------------

#[derive(Clone, PartialEq, Message)]
pub struct WireLocation {
    #[prost(uint32, tag = "1")]
    pub offset: u32,
    #[prost(uint32, tag = "2")]
    pub line: u32,
    #[prost(uint32, tag = "3")]
    pub column: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct SourceSpan {
    #[prost(string, optional, tag = "1")]
    pub text: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub url: Option<String>,
    #[prost(message, optional, tag = "3")]
    pub start: Option<WireLocation>,
    #[prost(message, optional, tag = "4")]
    pub end: Option<WireLocation>,
    #[prost(string, optional, tag = "5")]
    pub context: Option<String>,
}
