//! `lexedit` operator binary

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lexedit_core::{
    content_metrics, detect_category, legal_elements, ChatApiBackend, EditSession, EditorConfig,
    GeminiBackend, ModelClient,
};
use lexedit_document::{DocumentHandle, MemoryDocument, SelectionRange, StructuredNode};
use lexedit_repair::{validate, RepairCascade};
use serde_json::json;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("lexedit")
        .version(lexedit_core::VERSION)
        .about("Structured-document edit pipeline for legal drafting")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("repair")
                .about("Recover a document fragment from raw model output")
                .arg(Arg::new("file").help("Raw output file (stdin when omitted)")),
        )
        .subcommand(
            Command::new("tag")
                .about("Print legal elements and metrics of plain text")
                .arg(Arg::new("file").help("Text file (stdin when omitted)")),
        )
        .subcommand(
            Command::new("edit")
                .about("Run one edit against a JSON document")
                .arg(
                    Arg::new("document")
                        .long("document")
                        .required(true)
                        .help("Document JSON file"),
                )
                .arg(
                    Arg::new("command")
                        .long("command")
                        .required(true)
                        .help("Edit instruction"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .requires("to")
                        .value_parser(value_parser!(usize))
                        .help("Selection start"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .requires("from")
                        .value_parser(value_parser!(usize))
                        .help("Selection end"),
                )
                .arg(Arg::new("config").long("config").help("TOML config file"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("Write the edited document here instead of stdout"),
                ),
        )
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn read_input(file: Option<&String>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn run_repair(args: &ArgMatches) -> Result<()> {
    let raw = read_input(args.get_one::<String>("file"))?;
    let recovered = RepairCascade::new().recover(&raw, &StructuredNode::default());
    let report = validate(&recovered.value, "");

    let output = json!({
        "strategy": recovered.strategy,
        "failed_stages": recovered.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "fragment": recovered.value,
        "validation": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_tag(args: &ArgMatches) -> Result<()> {
    let text = read_input(args.get_one::<String>("file"))?;
    let output = json!({
        "category": detect_category(&text),
        "legal_elements": legal_elements(&text),
        "metrics": content_metrics(&text),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_edit(args: &ArgMatches) -> Result<()> {
    let document_path = args
        .get_one::<String>("document")
        .context("--document is required")?;
    let command = args
        .get_one::<String>("command")
        .context("--command is required")?;

    let config = match args.get_one::<String>("config") {
        Some(path) => EditorConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => EditorConfig::default(),
    };

    let json = std::fs::read_to_string(document_path)
        .with_context(|| format!("reading document {document_path}"))?;
    let mut document = MemoryDocument::from_json(&json).context("decoding document")?;

    if let (Some(from), Some(to)) = (args.get_one::<usize>("from"), args.get_one::<usize>("to")) {
        document
            .set_selection(SelectionRange::new(*from, *to))
            .context("applying selection")?;
    }

    let timeout = config.request_timeout();
    let backend = GeminiBackend::from_env(timeout).context("configuring completion backend")?;
    let mut client = ModelClient::new(Arc::new(backend), &config);
    if let Some(chat) = ChatApiBackend::from_env(timeout) {
        client = client.with_chat(Arc::new(chat));
    }

    let mut session = EditSession::new(document, config, client).context("starting session")?;
    let response = match session.process_command(command).await {
        Ok(response) => response,
        Err(e) => bail!("{} ({e})", e.user_message()),
    };

    let summary = json!({
        "strategy": response.strategy,
        "confidence": response.confidence,
        "warnings": response.warnings,
        "changes": response.changes,
    });
    let edited = session.into_document().to_json_pretty()?;

    match args.get_one::<String>("output") {
        Some(path) => {
            write_output(Path::new(path), &edited)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => {
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
            println!("{edited}");
        }
    }
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote edited document");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("repair", args)) => run_repair(args),
        Some(("tag", args)) => run_tag(args),
        Some(("edit", args)) => run_edit(args).await,
        _ => bail!("unknown command"),
    }
}
