use crate::support::{fixture_path, seeded_repository};
use clap::{CommandFactory, Parser};
use persona_forge::config::{AppConfig, RepositoryKind};
use persona_forge::events::NoopEventSink;
use persona_forge::persona::PersonaService;
use persona_forge::tooling::cli::{Cli, CliContext, Commands, OutputFormat};
use persona_forge::PersonaError;
use std::sync::Arc;

fn context() -> CliContext {
    let service = PersonaService::new(seeded_repository(), Arc::new(NoopEventSink));
    CliContext::with_service(service, AppConfig::default()).unwrap()
}

fn run(args: &[&str]) -> Result<String, PersonaError> {
    let cli = Cli::try_parse_from(args).unwrap();
    context().execute(&cli.command)
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["persona-forge", "list"],
        vec!["persona-forge", "list", "--all", "--thread-type", "zero-touch"],
        vec!["persona-forge", "list", "--format", "json"],
        vec!["persona-forge", "get", "dev-1"],
        vec!["persona-forge", "get-by-name", "Developer", "--version", "1.0"],
        vec!["persona-forge", "enhancements", "dev-1", "--type", "tool"],
        vec![
            "persona-forge",
            "create",
            "dev-1",
            "--context-allocation",
            "0.5",
            "--parent",
            "agent-7",
            "--enhancement",
            "e-model",
            "--set",
            "temperature=0.2",
            "--no-event",
        ],
        vec!["persona-forge", "thread-types"],
        vec!["persona-forge", "--seed", "personas.yaml", "health"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_unknown_thread_type_and_format() {
    assert!(Cli::try_parse_from(["persona-forge", "list", "--thread-type", "swarm"]).is_err());
    assert!(Cli::try_parse_from(["persona-forge", "list", "--format", "xml"]).is_err());
    assert!(Cli::try_parse_from(["persona-forge", "create"]).is_err());
}

#[test]
fn help_lists_every_subcommand() {
    let mut command = Cli::command();
    let mut output = Vec::new();
    command.write_long_help(&mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    for name in [
        "list",
        "get",
        "get-by-name",
        "enhancements",
        "create",
        "thread-types",
        "health",
    ] {
        assert!(output.contains(name), "help should mention {name}");
    }
}

#[test]
fn create_parses_into_command() {
    let cli = Cli::parse_from(["persona-forge", "create", "dev-1", "--set", "model=x"]);
    match cli.command {
        Commands::Create {
            persona_id,
            context_allocation,
            overrides,
            no_event,
            format,
            ..
        } => {
            assert_eq!(persona_id, "dev-1");
            assert_eq!(context_allocation, 0.3);
            assert_eq!(overrides, vec!["model=x"]);
            assert!(!no_event);
            assert_eq!(format, OutputFormat::Text);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn list_json_output() {
    let output = run(&["persona-forge", "list", "--all", "--format", "json"]).unwrap();
    let personas: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(personas.len(), 3);
}

#[test]
fn create_json_output_honors_overrides() {
    let output = run(&[
        "persona-forge",
        "create",
        "dev-1",
        "--enhancement",
        "e-tools",
        "--set",
        "temperature=0.2",
        "--set",
        "model=claude-haiku-4-5",
        "--format",
        "json",
    ])
    .unwrap();
    let creation: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(creation["config"]["model"], "claude-haiku-4-5");
    assert_eq!(creation["config"]["temperature"], 0.2);
    assert_eq!(
        creation["config"]["tools"],
        serde_json::json!(["read_file", "search", "shell"])
    );
    assert_eq!(creation["enhancements_applied"].as_array().unwrap().len(), 1);
}

#[test]
fn create_text_output_shows_prompt() {
    let output = run(&["persona-forge", "create", "legacy-1", "--no-event"]).unwrap();
    assert!(output.contains("Agent Configuration"));
    assert!(output.contains("You file everything."));
    assert!(output.contains("Digest: "));
}

#[test]
fn invalid_requests_surface_as_errors() {
    assert!(matches!(
        run(&["persona-forge", "create", "dev-1", "--context-allocation", "1.5"]),
        Err(PersonaError::InvalidRequest(_))
    ));
    assert!(matches!(
        run(&["persona-forge", "get", "ghost"]),
        Err(PersonaError::NotFound(_))
    ));
    assert!(matches!(
        run(&["persona-forge", "get-by-name", "Developer", "--version", "9.9"]),
        Err(PersonaError::NotFound(_))
    ));
}

#[test]
fn thread_types_and_health_render() {
    let output = run(&["persona-forge", "thread-types", "--format", "json"]).unwrap();
    let catalogue: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(catalogue.len(), 6);
    assert_eq!(catalogue[5]["type"], "zero_touch");

    let output = run(&["persona-forge", "health", "--format", "json"]).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["status"], "healthy");
    assert_eq!(report["total_personas"], 3);
}

#[test]
fn seed_flag_builds_memory_context() {
    let path = fixture_path();
    let cli = Cli::parse_from([
        "persona-forge",
        "--seed",
        path.to_str().unwrap(),
        "enhancements",
        "dev-1",
    ]);
    let mut config = AppConfig::default();
    cli.apply_store_overrides(&mut config);
    assert_eq!(config.repository.kind, RepositoryKind::Memory);

    let output = CliContext::new(config).unwrap().execute(&cli.command).unwrap();
    assert!(output.contains("e-model"));
    assert!(output.contains("hologram"));
}

#[test]
fn rest_store_requires_credentials() {
    let config = AppConfig::default();
    assert!(matches!(
        CliContext::new(config),
        Err(PersonaError::ConfigurationError(_))
    ));
}
