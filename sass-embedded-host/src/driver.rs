// SPDX-License-Identifier: Apache-2.0

//! The Supervisor / Protocol Driver (design §4.4): the compile state
//! machine, the callback dispatch loop, identifier spaces for the
//! current compilation, restart logic, and the public compile contract.
//! Grounded on `datadog-sidecar`'s pattern of owning one supervised
//! external process behind a synchronous service façade, combined with
//! the blocking framing built in `sass-embedded-protocol`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use sass_embedded_common::{
    CompilerError, InputSyntax, LifecycleError, OutputStyle, ProtocolError,
};
use sass_embedded_protocol::codec;
use sass_embedded_protocol::wire::{
    self, canonicalize_response, compile_request, compile_response, function_call_request,
    function_call_response, import_response, importer_descriptor, inbound_message, outbound_message,
    CanonicalizeRequest, CanonicalizeResponse, FunctionCallRequest, FunctionCallResponse, ImportRequest,
    ImportResponse, InboundMessage,
};

use crate::channel::Channel;
use crate::function::{merge_functions, HostFunctionDef};
use crate::importer::ImportResolver;
use crate::registry::DynamicFunctionRegistry;
use crate::results::CompilerResults;

/// The first importer id handed out for a compilation's importer list
/// (design §4.6, glossary: "Importer id ... 4000 + index").
const IMPORTER_ID_BASE: u32 = 4000;

/// The supervisor's compilation-id counter starts here; the first
/// compile increments it to 1001 (design §4.4 step 2, glossary).
const FIRST_COMPILATION_ID: u32 = 1000;

/// design §4.4's formal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Active,
    ActiveInCallback,
    Broken,
}

/// What to compile: inline source text, or a file path the compiler
/// reads itself (design §4.4 step 4).
pub enum CompileInput {
    Text { source: String, syntax: InputSyntax, url: Option<String> },
    Path(PathBuf),
}

/// The host-side object that owns one compiler subprocess (glossary).
/// Single-threaded cooperative from the public API's perspective (design
/// §5): exactly one compile may be in flight, and callbacks run on the
/// caller's own thread of control. The OS subprocess is exclusive to its
/// `Supervisor` (design §9) — there is no way to obtain the [`Channel`]
/// from outside this module.
pub struct Supervisor {
    exec_path: PathBuf,
    cwd: PathBuf,
    timeout: Option<Duration>,
    global_importers: Vec<ImportResolver>,
    global_functions: Vec<HostFunctionDef>,
    channel: Channel,
    state: SupervisorState,
    next_compilation_id: u32,
}

impl Supervisor {
    /// Spawns the subprocess at `exec_path` and sets the initial state to
    /// `Idle` (design §4.4). `timeout_seconds < 0` disables the
    /// whole-compile budget (design §5).
    pub fn new(
        exec_path: impl Into<PathBuf>,
        timeout_seconds: i64,
        importers: Vec<ImportResolver>,
        functions: Vec<HostFunctionDef>,
    ) -> Result<Self, LifecycleError> {
        let exec_path = exec_path.into();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        info!(path = %exec_path.display(), "spawning compiler subprocess");
        let channel = Channel::spawn(&exec_path, &[], &cwd).inspect_err(|err| {
            warn!(path = %exec_path.display(), %err, "failed to spawn compiler subprocess");
        })?;
        debug!(pid = channel.process_id(), "compiler subprocess spawned, supervisor idle");
        Ok(Supervisor {
            exec_path,
            cwd,
            timeout: timeout_from_seconds(timeout_seconds),
            global_importers: importers,
            global_functions: functions,
            channel,
            state: SupervisorState::Idle,
            next_compilation_id: FIRST_COMPILATION_ID,
        })
    }

    /// Resolves `name` against `PATH` (design §6's "`which`-equivalent"
    /// resolution) and spawns it.
    pub fn new_from_name(
        name: &str,
        timeout_seconds: i64,
        importers: Vec<ImportResolver>,
        functions: Vec<HostFunctionDef>,
    ) -> Result<Self, LifecycleError> {
        let path = resolve_on_path(name).ok_or_else(|| LifecycleError::NotFoundOnPath(name.to_string()))?;
        Self::new(path, timeout_seconds, importers, functions)
    }

    /// Like [`Supervisor::new`], but the overall compile timeout comes
    /// from `_SASS_HOST_DEFAULT_TIMEOUT_SECS` (design §7.2) instead of
    /// being passed explicitly — the convenience constructor for
    /// embedders that don't have a per-instance timeout preference.
    pub fn new_with_default_timeout(
        exec_path: impl Into<PathBuf>,
        importers: Vec<ImportResolver>,
        functions: Vec<HostFunctionDef>,
    ) -> Result<Self, LifecycleError> {
        Self::new(exec_path, sass_embedded_common::config::default_timeout_secs(), importers, functions)
    }

    /// Like [`Supervisor::new_from_name`], defaulting the timeout the
    /// same way [`Supervisor::new_with_default_timeout`] does.
    pub fn new_from_name_with_default_timeout(
        name: &str,
        importers: Vec<ImportResolver>,
        functions: Vec<HostFunctionDef>,
    ) -> Result<Self, LifecycleError> {
        Self::new_from_name(name, sass_embedded_common::config::default_timeout_secs(), importers, functions)
    }

    pub fn process_id(&self) -> u32 {
        self.channel.process_id()
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Terminates and respawns the child (design §4.4). Only valid from
    /// `Idle` or `Broken`.
    pub fn reinit(&mut self) -> Result<(), LifecycleError> {
        if matches!(self.state, SupervisorState::Active | SupervisorState::ActiveInCallback) {
            return Err(LifecycleError::AlreadyActive);
        }
        info!(path = %self.exec_path.display(), "reinit: terminating and respawning compiler subprocess");
        self.channel.terminate();
        match Channel::spawn(&self.exec_path, &[], &self.cwd) {
            Ok(channel) => {
                debug!(pid = channel.process_id(), "reinit succeeded, supervisor idle");
                self.channel = channel;
                self.state = SupervisorState::Idle;
                Ok(())
            }
            Err(err) => {
                warn!(path = %self.exec_path.display(), %err, "reinit failed, supervisor is now broken");
                self.state = SupervisorState::Broken;
                Err(err)
            }
        }
    }

    /// The `compile_text` entry point (design §6).
    #[allow(clippy::too_many_arguments)]
    pub fn compile_text(
        &mut self,
        text: impl Into<String>,
        syntax: InputSyntax,
        url: Option<String>,
        style: OutputStyle,
        source_map: bool,
        importers: Vec<ImportResolver>,
        functions: Vec<HostFunctionDef>,
    ) -> Result<CompilerResults, sass_embedded_common::HostError> {
        let input = CompileInput::Text { source: text.into(), syntax, url };
        self.compile(input, style, source_map, importers, functions)
    }

    /// The `compile_file` entry point (design §6).
    pub fn compile_file(
        &mut self,
        file_path: impl Into<PathBuf>,
        style: OutputStyle,
        source_map: bool,
        importers: Vec<ImportResolver>,
        functions: Vec<HostFunctionDef>,
    ) -> Result<CompilerResults, sass_embedded_common::HostError> {
        self.compile(CompileInput::Path(file_path.into()), style, source_map, importers, functions)
    }

    /// The heart of the system (design §4.4).
    fn compile(
        &mut self,
        input: CompileInput,
        style: OutputStyle,
        source_map: bool,
        per_call_importers: Vec<ImportResolver>,
        per_call_functions: Vec<HostFunctionDef>,
    ) -> Result<CompilerResults, sass_embedded_common::HostError> {
        match self.state {
            SupervisorState::Broken => return Err(LifecycleError::Broken.into()),
            SupervisorState::Active | SupervisorState::ActiveInCallback => {
                return Err(LifecycleError::AlreadyActive.into())
            }
            SupervisorState::Idle => {}
        }

        self.next_compilation_id += 1;
        let compilation_id = self.next_compilation_id;
        debug!(compilation_id, "compile: idle -> active");

        let mut importers: Vec<ImportResolver> =
            Vec::with_capacity(self.global_importers.len() + per_call_importers.len());
        importers.extend(self.global_importers.iter().cloned());
        importers.extend(per_call_importers);

        let functions = merge_functions(&self.global_functions, &per_call_functions);

        let request = build_compile_request(compilation_id, &input, style, source_map, &importers, &functions);

        if let Err(err) = self.channel.send(&InboundMessage {
            message: Some(inbound_message::Message::CompileRequest(request)),
        }) {
            return Err(self.recover_from_protocol_failure(err).into());
        }

        self.state = SupervisorState::Active;

        match self.run_receive_loop(compilation_id, &importers, &functions) {
            Ok(results) => {
                debug!(compilation_id, "compile: active -> idle, success");
                self.state = SupervisorState::Idle;
                Ok(results)
            }
            Err(Outcome::CompilerError(err)) => {
                debug!(compilation_id, %err, "compile: active -> idle, compiler error");
                self.state = SupervisorState::Idle;
                Err(err.into())
            }
            Err(Outcome::Fatal(err)) => {
                warn!(compilation_id, %err, "compile: fatal protocol error, restarting subprocess");
                Err(self.recover_from_protocol_failure(err).into())
            }
        }
    }

    /// Terminates the child, tries to respawn it, and leaves the
    /// supervisor `Idle` on success or `Broken` on failure (design
    /// §4.4's failure-handling table). The original error is always
    /// returned to the caller.
    fn recover_from_protocol_failure(&mut self, err: ProtocolError) -> ProtocolError {
        self.channel.terminate();
        match Channel::spawn(&self.exec_path, &[], &self.cwd) {
            Ok(channel) => {
                info!(pid = channel.process_id(), "subprocess restarted, supervisor idle");
                self.channel = channel;
                self.state = SupervisorState::Idle;
            }
            Err(spawn_err) => {
                warn!(%spawn_err, "restart failed, supervisor is now broken");
                self.state = SupervisorState::Broken;
            }
        }
        err
    }

    fn run_receive_loop(
        &mut self,
        compilation_id: u32,
        importers: &[ImportResolver],
        functions: &[HostFunctionDef],
    ) -> Result<CompilerResults, Outcome> {
        let start = Instant::now();
        let mut diagnostics = Vec::new();

        loop {
            let remaining = self.timeout.map(|total| {
                let elapsed = start.elapsed();
                if elapsed >= total {
                    Duration::from_secs(1)
                } else {
                    (total - elapsed).max(Duration::from_secs(1))
                }
            });

            let message = self.channel.receive(remaining).map_err(Outcome::Fatal)?;
            let message = message
                .message
                .ok_or_else(|| Outcome::Fatal(ProtocolError::MissingField("OutboundMessage.message")))?;

            match message {
                outbound_message::Message::CompileResponse(response) => {
                    check_id(compilation_id, response.id)?;
                    return finish_compile_response(response, diagnostics);
                }
                outbound_message::Message::LogEvent(event) => {
                    check_id(compilation_id, event.compilation_id)?;
                    let diagnostic = codec::diagnostic_from_log_event(&event).map_err(Outcome::Fatal)?;
                    diagnostics.push(diagnostic);
                }
                outbound_message::Message::ProtocolError(err) => {
                    return Err(Outcome::Fatal(ProtocolError::Malformed(err.message)));
                }
                outbound_message::Message::CanonicalizeRequest(request) => {
                    check_id(compilation_id, request.compilation_id)?;
                    let response = self.handle_canonicalize(&request, importers)?;
                    self.channel
                        .send(&InboundMessage {
                            message: Some(inbound_message::Message::CanonicalizeResponse(response)),
                        })
                        .map_err(Outcome::Fatal)?;
                }
                outbound_message::Message::ImportRequest(request) => {
                    check_id(compilation_id, request.compilation_id)?;
                    let response = self.handle_import(&request, importers)?;
                    self.channel
                        .send(&InboundMessage {
                            message: Some(inbound_message::Message::ImportResponse(response)),
                        })
                        .map_err(Outcome::Fatal)?;
                }
                outbound_message::Message::FunctionCallRequest(request) => {
                    check_id(compilation_id, request.compilation_id)?;
                    let response = self.handle_function_call(&request, functions)?;
                    self.channel
                        .send(&InboundMessage {
                            message: Some(inbound_message::Message::FunctionCallResponse(response)),
                        })
                        .map_err(Outcome::Fatal)?;
                }
            }
        }
    }

    fn handle_canonicalize(
        &mut self,
        request: &CanonicalizeRequest,
        importers: &[ImportResolver],
    ) -> Result<CanonicalizeResponse, Outcome> {
        let custom = resolve_custom_importer(importers, request.importer_id)?;

        debug!(importer_id = request.importer_id, url = %request.url, "canonicalize: active -> active-in-callback");
        self.state = SupervisorState::ActiveInCallback;
        let outcome = custom.canonicalize(&request.url);
        self.state = SupervisorState::Active;

        let result = match outcome {
            Ok(Some(url)) => Some(canonicalize_response::Result::Url(url)),
            Ok(None) => None,
            Err(err) => Some(canonicalize_response::Result::Error(err.to_string())),
        };
        Ok(CanonicalizeResponse { id: request.id, result })
    }

    fn handle_import(
        &mut self,
        request: &ImportRequest,
        importers: &[ImportResolver],
    ) -> Result<ImportResponse, Outcome> {
        let custom = resolve_custom_importer(importers, request.importer_id)?;
        let canonical = url::Url::parse(&request.url)
            .map_err(|err| Outcome::Fatal(ProtocolError::MalformedUrl(err.to_string())))?;

        debug!(importer_id = request.importer_id, url = %canonical, "import: active -> active-in-callback");
        self.state = SupervisorState::ActiveInCallback;
        let outcome = custom.load(canonical.as_str());
        self.state = SupervisorState::Active;

        let result = match outcome {
            Ok(loaded) => import_response::Result::Success(import_response::Success {
                contents: loaded.contents,
                syntax: codec::syntax_to_wire(loaded.syntax) as i32,
                source_map_url: loaded.source_map_url,
            }),
            Err(err) => import_response::Result::Error(err.to_string()),
        };
        Ok(ImportResponse { id: request.id, result: Some(result) })
    }

    fn handle_function_call(
        &mut self,
        request: &FunctionCallRequest,
        functions: &[HostFunctionDef],
    ) -> Result<FunctionCallResponse, Outcome> {
        let identifier = request
            .identifier
            .clone()
            .ok_or_else(|| Outcome::Fatal(ProtocolError::MissingField("FunctionCallRequest.identifier")))?;

        let callback = match identifier {
            function_call_request::Identifier::FunctionId(id) => DynamicFunctionRegistry::lookup(id)
                .map(|found| found.callback)
                .ok_or_else(|| {
                    Outcome::Fatal(ProtocolError::Malformed(format!("unknown dynamic function id {id}")))
                })?,
            function_call_request::Identifier::Name(name) => functions
                .iter()
                .find(|def| def.name() == name)
                .map(|def| def.callback.clone())
                .ok_or_else(|| Outcome::Fatal(ProtocolError::Malformed(format!("unknown function {name:?}"))))?,
        };

        let args = request
            .arguments
            .iter()
            .map(codec::wire_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Outcome::Fatal)?;

        debug!("function call: active -> active-in-callback");
        self.state = SupervisorState::ActiveInCallback;
        let outcome = callback(&args);
        self.state = SupervisorState::Active;

        let result = match outcome {
            Ok(value) => function_call_response::Result::Success(codec::value_to_wire(&value)),
            Err(err) => function_call_response::Result::Error(err.to_string()),
        };
        Ok(FunctionCallResponse { id: request.id, result: Some(result) })
    }
}

/// Either a `CompilerError` (a normal terminal outcome — the supervisor
/// returns to `Idle`) or a fatal protocol violation (triggers restart).
/// Mirrors design §4.4's failure-handling split without forcing every
/// intermediate dispatch step to know about supervisor recovery.
enum Outcome {
    CompilerError(CompilerError),
    Fatal(ProtocolError),
}

impl From<std::io::Error> for Outcome {
    fn from(err: std::io::Error) -> Self {
        Outcome::Fatal(err.into())
    }
}

fn check_id(expected: u32, actual: u32) -> Result<(), Outcome> {
    if expected == actual {
        Ok(())
    } else {
        Err(Outcome::Fatal(ProtocolError::CompilationIdMismatch { expected, actual }))
    }
}

fn resolve_custom_importer(
    importers: &[ImportResolver],
    importer_id: u32,
) -> Result<&std::sync::Arc<dyn crate::importer::CustomImporter>, Outcome> {
    let index = importer_id
        .checked_sub(IMPORTER_ID_BASE)
        .filter(|&i| (i as usize) < importers.len())
        .ok_or_else(|| Outcome::Fatal(ProtocolError::BadImporterId(importer_id)))?;
    match &importers[index as usize] {
        ImportResolver::Custom(custom) => Ok(custom),
        ImportResolver::LoadPath(_) => Err(Outcome::Fatal(ProtocolError::LoadPathSlotRequested)),
    }
}

fn finish_compile_response(
    response: wire::CompileResponse,
    diagnostics: Vec<sass_embedded_common::Diagnostic>,
) -> Result<CompilerResults, Outcome> {
    match response.result {
        Some(compile_response::Result::Success(success)) => Ok(CompilerResults {
            css: success.css,
            source_map: success.source_map,
            diagnostics,
        }),
        Some(compile_response::Result::Failure(failure)) => {
            let span = codec::span_from_wire_opt(failure.span.as_ref()).map_err(Outcome::Fatal)?;
            Err(Outcome::CompilerError(CompilerError {
                message: failure.message,
                span,
                stack: failure.stack_trace,
                diagnostics,
            }))
        }
        None => Err(Outcome::Fatal(ProtocolError::MissingField("CompileResponse.result"))),
    }
}

fn build_compile_request(
    compilation_id: u32,
    input: &CompileInput,
    style: OutputStyle,
    source_map: bool,
    importers: &[ImportResolver],
    functions: &[HostFunctionDef],
) -> wire::CompileRequest {
    let input = match input {
        CompileInput::Text { source, syntax, url } => {
            compile_request::Input::String(compile_request::StringInput {
                source: source.clone(),
                syntax: codec::syntax_to_wire(*syntax) as i32,
                url: url.clone(),
            })
        }
        CompileInput::Path(path) => compile_request::Input::Path(path.to_string_lossy().into_owned()),
    };

    let importer_descriptors = importers
        .iter()
        .enumerate()
        .map(|(index, importer)| {
            let importer = match importer {
                ImportResolver::LoadPath(path) => {
                    importer_descriptor::Importer::Path(path.to_string_lossy().into_owned())
                }
                ImportResolver::Custom(_) => {
                    importer_descriptor::Importer::ImporterId(IMPORTER_ID_BASE + index as u32)
                }
            };
            wire::ImporterDescriptor { importer: Some(importer) }
        })
        .collect();

    let global_functions = functions.iter().map(|def| def.signature.clone()).collect();

    wire::CompileRequest {
        id: compilation_id,
        input: Some(input),
        style: codec::style_to_wire(style) as i32,
        source_map,
        importers: importer_descriptors,
        global_functions,
    }
}

fn timeout_from_seconds(seconds: i64) -> Option<Duration> {
    if seconds < 0 {
        None
    } else {
        Some(Duration::from_secs(seconds as u64))
    }
}

fn resolve_on_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(name);
        is_executable_file(&candidate).then_some(candidate)
    })
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_timeout_disables_the_budget() {
        assert_eq!(timeout_from_seconds(-1), None);
    }

    #[test]
    fn non_negative_timeout_is_honored() {
        assert_eq!(timeout_from_seconds(0), Some(Duration::from_secs(0)));
        assert_eq!(timeout_from_seconds(30), Some(Duration::from_secs(30)));
    }

    #[test]
    fn resolve_on_path_finds_a_known_executable() {
        // `sh` is present on every unix CI image this workspace targets.
        if cfg!(unix) {
            assert!(resolve_on_path("sh").is_some());
        }
    }

    #[test]
    fn resolve_on_path_is_none_for_a_bogus_name() {
        assert!(resolve_on_path("definitely-not-a-real-executable-name").is_none());
    }

    fn fake_compiler_path() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_sass-embedded-fake-compiler"))
    }

    fn supervisor() -> Supervisor {
        Supervisor::new(fake_compiler_path(), -1, vec![], vec![]).expect("fake compiler spawns")
    }

    #[test]
    fn new_with_default_timeout_honors_the_env_var_when_unset() {
        std::env::remove_var(sass_embedded_common::config::ENV_DEFAULT_TIMEOUT_SECS);
        let sup = Supervisor::new_with_default_timeout(fake_compiler_path(), vec![], vec![])
            .expect("fake compiler spawns");
        assert_eq!(sup.timeout, None, "an unset env var disables the whole-compile timeout");
    }

    #[test]
    fn compile_is_rejected_while_a_compile_is_already_in_flight() {
        let mut sup = supervisor();
        sup.state = SupervisorState::Active;
        let err = sup
            .compile_text("a { b: c }", InputSyntax::Scss, None, OutputStyle::Expanded, false, vec![], vec![])
            .expect_err("rejected");
        assert!(matches!(err, sass_embedded_common::HostError::Lifecycle(LifecycleError::AlreadyActive)));
    }

    #[test]
    fn compile_is_rejected_on_a_broken_supervisor() {
        let mut sup = supervisor();
        sup.state = SupervisorState::Broken;
        let err = sup
            .compile_text("a { b: c }", InputSyntax::Scss, None, OutputStyle::Expanded, false, vec![], vec![])
            .expect_err("rejected");
        assert!(matches!(err, sass_embedded_common::HostError::Lifecycle(LifecycleError::Broken)));
    }

    #[test]
    fn reinit_is_rejected_while_active() {
        let mut sup = supervisor();
        sup.state = SupervisorState::ActiveInCallback;
        let err = sup.reinit().expect_err("rejected");
        assert!(matches!(err, LifecycleError::AlreadyActive));
    }

    #[test]
    fn a_protocol_violation_restarts_the_child_and_leaves_the_supervisor_idle() {
        let mut sup = supervisor();
        let err = sup
            .compile_text(
                "FAKE_PROTOCOL_VIOLATION",
                InputSyntax::Scss,
                None,
                OutputStyle::Expanded,
                false,
                vec![],
                vec![],
            )
            .expect_err("the garbage frame is a protocol violation");
        assert!(matches!(err, sass_embedded_common::HostError::Protocol(_)));
        assert_eq!(sup.state(), SupervisorState::Idle);

        let results = sup
            .compile_text("a { b: c }", InputSyntax::Scss, None, OutputStyle::Expanded, false, vec![], vec![])
            .expect("the respawned child compiles normally");
        assert!(results.css.contains("b: c;"));
    }
}
