// SPDX-License-Identifier: Apache-2.0

//! Black-box compile scenarios against the fake compiler stand-in,
//! mirroring the library's own `libdd-ipc` style of exercising a real
//! subprocess rather than mocking the channel.

use std::sync::Arc;

use sass_embedded_host::{
    CustomImporter, DiagnosticKind, DynamicFunctionRegistry, HostError, HostFunctionDef, ImportResolver,
    InputSyntax, LifecycleError, LoadedStylesheet, OutputStyle, SassNumber, Supervisor, SupervisorState,
    Value,
};

fn fake_compiler_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_sass-embedded-fake-compiler"))
}

fn supervisor() -> Supervisor {
    Supervisor::new(fake_compiler_path(), -1, vec![], vec![]).expect("fake compiler spawns")
}

#[test]
fn compiles_a_simple_rule_to_expanded_css() {
    let mut sup = supervisor();
    let results = sup
        .compile_text("a { b: c }", InputSyntax::Scss, None, OutputStyle::Expanded, false, vec![], vec![])
        .expect("compiles");
    assert!(results.css.starts_with("a {"));
    assert!(results.css.contains("b: c;"));
    assert!(results.diagnostics.is_empty());
    assert_eq!(sup.state(), SupervisorState::Idle);
}

#[test]
fn a_compiler_error_carries_its_span_context_and_leaves_the_supervisor_idle() {
    let mut sup = supervisor();
    let err = sup
        .compile_text(
            "@include reflexive-position(top, 12px)",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![],
            vec![],
        )
        .expect_err("the fake compiler rejects this input");

    match err {
        HostError::Compiler(compiler_error) => {
            assert!(compiler_error.message.contains("Property top must be either left or right."));
            let span = compiler_error.span.expect("failure carries a span");
            assert_eq!(span.context.as_deref(), Some("  @include reflexive-position(top, 12px)"));
        }
        other => panic!("expected a compiler error, got {other:?}"),
    }
    assert_eq!(sup.state(), SupervisorState::Idle);
}

#[test]
fn warnings_and_debug_messages_arrive_in_order_before_a_successful_result() {
    let mut sup = supervisor();
    let results = sup
        .compile_text(
            "@warn \"First warning\"",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![],
            vec![],
        )
        .expect("compiles despite the warnings");

    let kinds: Vec<_> = results.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::Warning, DiagnosticKind::Warning, DiagnosticKind::Debug]);
    assert_eq!(results.diagnostics[0].text, "First warning");
    assert_eq!(results.diagnostics[1].text, "Second warning");
    assert_eq!(results.diagnostics[2].text, "Third debug");
}

#[test]
fn a_default_global_declaration_produces_one_deprecation_diagnostic() {
    let mut sup = supervisor();
    let results = sup
        .compile_text(
            "$x: () !default !global;",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![],
            vec![],
        )
        .expect("compiles");

    assert_eq!(results.diagnostics.len(), 1);
    assert_eq!(results.diagnostics[0].kind, DiagnosticKind::Deprecation);
}

#[test]
fn compiling_a_missing_file_fails_with_no_diagnostics() {
    let mut sup = supervisor();
    let dir = tempfile::tempdir().expect("create a scratch dir");
    let missing = dir.path().join("sass-embedded-host-missing-input.scss");
    let err = sup
        .compile_file(&missing, OutputStyle::Expanded, false, vec![], vec![])
        .expect_err("the path does not exist");

    match err {
        HostError::Compiler(compiler_error) => {
            assert_eq!(compiler_error.message, format!("Cannot open file: {}", missing.display()));
            assert!(compiler_error.diagnostics.is_empty());
        }
        other => panic!("expected a compiler error, got {other:?}"),
    }
}

#[test]
fn compile_file_reads_a_real_file_on_disk() {
    use std::io::Write;

    let mut sup = supervisor();
    let mut file = tempfile::NamedTempFile::new().expect("create a scratch file");
    write!(file, "a {{ b: c }}").expect("write scratch input");

    let results = sup
        .compile_file(file.path(), OutputStyle::Expanded, false, vec![], vec![])
        .expect("compiles a file that exists on disk");
    assert!(results.css.contains("b: c;"));
}

#[test]
fn a_protocol_violation_restarts_the_child_instead_of_wedging_the_supervisor() {
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
        .expect_err("the garbage frame cannot be decoded");
    assert!(matches!(err, HostError::Protocol(_)));
    assert_eq!(sup.state(), SupervisorState::Idle);

    // The respawned child is a fresh process and compiles normally.
    let results = sup
        .compile_text("a { b: c }", InputSyntax::Scss, None, OutputStyle::Expanded, false, vec![], vec![])
        .expect("the new child compiles");
    assert!(results.css.contains("b: c;"));
}

#[test]
fn reinit_respawns_a_healthy_child_and_stays_idle() {
    let mut sup = supervisor();
    let first_pid = sup.process_id();
    sup.reinit().expect("reinit from idle succeeds");
    assert_eq!(sup.state(), SupervisorState::Idle);
    assert_ne!(sup.process_id(), first_pid, "reinit spawns a new child process");

    let results = sup
        .compile_text("a { b: c }", InputSyntax::Scss, None, OutputStyle::Expanded, false, vec![], vec![])
        .expect("compiles after reinit");
    assert!(results.css.contains("b: c;"));
}

#[test]
fn new_from_name_fails_for_an_executable_not_on_path() {
    let err = Supervisor::new_from_name("definitely-not-a-real-sass-compiler", -1, vec![], vec![])
        .expect_err("not found");
    assert!(matches!(err, LifecycleError::NotFoundOnPath(_)));
}

struct FixedUrlImporter;

impl CustomImporter for FixedUrlImporter {
    fn canonicalize(&self, url: &str) -> anyhow::Result<Option<String>> {
        Ok(Some(format!("https://example.test/{url}")))
    }

    fn load(&self, canonical_url: &str) -> anyhow::Result<LoadedStylesheet> {
        Ok(LoadedStylesheet {
            contents: format!(".from-import {{ source: \"{canonical_url}\"; }}"),
            syntax: InputSyntax::Scss,
            source_map_url: None,
        })
    }
}

#[test]
fn a_custom_importer_answers_canonicalize_and_import_requests() {
    let mut sup = supervisor();
    let results = sup
        .compile_text(
            "CUSTOM_IMPORT:styles/foo",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![ImportResolver::custom(FixedUrlImporter)],
            vec![],
        )
        .expect("the custom importer resolves the url");
    assert!(results.css.contains("/* imported */"));
    assert!(results.css.contains("https://example.test/styles/foo"));
}

#[test]
fn a_load_path_importer_slot_never_produces_a_canonicalize_request() {
    // A load-path slot is resolved by the compiler itself; asking the
    // fake compiler to treat it as a custom importer target would be a
    // protocol violation the driver must reject (design §4.6). This test
    // only exercises the happy path of declaring one alongside a custom
    // importer; the rejection path is covered by the `driver` unit tests.
    let mut sup = supervisor();
    let results = sup
        .compile_text(
            "a { b: c }",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![ImportResolver::load_path("/tmp/sass-load-path")],
            vec![],
        )
        .expect("compiles with a load-path importer declared but unused");
    assert!(results.css.contains("b: c;"));
}

fn double_fn() -> HostFunctionDef {
    HostFunctionDef::new(
        "double($x)",
        Arc::new(|args: &[Value]| {
            let n = args[0].expect_number()?;
            Ok(Value::Number(SassNumber::unitless(n.value * 2.0)))
        }),
    )
}

fn wants_a_string_fn() -> HostFunctionDef {
    HostFunctionDef::new(
        "wants-a-string($x)",
        Arc::new(|args: &[Value]| {
            let (text, _quoted) = args[0].expect_string()?;
            Ok(Value::String { text: text.to_string(), quoted: true })
        }),
    )
}

#[test]
fn a_failed_typed_downcast_surfaces_as_a_function_call_error() {
    let mut sup = supervisor();
    let err = sup
        .compile_text(
            "CALL_FUNCTION:wants-a-string",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![],
            vec![wants_a_string_fn()],
        )
        .expect_err("the callback's expect_string() downcast fails on a number argument");

    match err {
        HostError::Compiler(compiler_error) => {
            assert!(compiler_error.message.contains("expected a string value, got number"));
        }
        other => panic!("expected a compiler error, got {other:?}"),
    }
}

#[test]
fn a_per_compilation_host_function_is_dispatched_by_name() {
    let mut sup = supervisor();
    let results = sup
        .compile_text(
            "CALL_FUNCTION:double",
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![],
            vec![double_fn()],
        )
        .expect("the host function call round-trips");
    assert!(results.css.contains("value: 42"));
}

#[test]
fn a_globally_registered_dynamic_function_is_dispatched_by_id() {
    let mut sup = supervisor();
    let id = DynamicFunctionRegistry::register(
        "triple($x)",
        Arc::new(|args: &[Value]| {
            let n = args[0].expect_number()?;
            Ok(Value::Number(SassNumber::unitless(n.value * 3.0)))
        }),
    );
    let results = sup
        .compile_text(
            format!("CALL_FUNCTION_ID:{id}"),
            InputSyntax::Scss,
            None,
            OutputStyle::Expanded,
            false,
            vec![],
            vec![],
        )
        .expect("the dynamic function call round-trips");
    assert!(results.css.contains("value: 63"));
}
