mod render;

use std::borrow::Cow;
use std::fs;
use std::io;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sheet_history_core::{
    Diagnostic, ParseConfig, ParseResult, TokenSummary, UrlFragment, load_config_from_str,
    parse_fragment_with,
};
use sheet_history_diagnostics::{self as diag, codes};
use tracing_subscriber::EnvFilter;

use crate::render::{Format, highlight_id, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "sheet-history",
    version,
    about = "Parse, canonicalise and check spreadsheet history URL fragments"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Path to a JSON parser configuration, e.g. `{"max_fragment_len": 4096}`.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a fragment and describe the resulting token.
    Parse {
        /// The fragment, e.g. `/1/Untitled/cell/A1`. Use `-` to read stdin.
        fragment: String,
    },

    /// Print the canonical form of a fragment.
    Canonical {
        /// The fragment. Use `-` to read stdin.
        fragment: String,
    },

    /// Print the token the editor returns to when the current action is cancelled.
    Clear {
        /// The fragment. Use `-` to read stdin.
        fragment: String,
    },

    /// Check a file of fragments, one per line: each must parse, and its
    /// canonical form must parse back to the same token.
    Check {
        /// Path to the file. Use `-` to read stdin. Blank lines and lines
        /// starting with `#` are skipped.
        file: String,
        /// Treat warnings as failures.
        #[arg(long)]
        strict: bool,
    },

    /// Explain a diagnostic ID (e.g. HIST1201), or list all of them.
    Explain { id: Option<String> },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli, format) {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!("{out:#}");
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(2);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli, format: Format) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Parse { fragment } => cmd_parse(&read_fragment(&fragment)?, &config, format),
        Cmd::Canonical { fragment } => cmd_canonical(&read_fragment(&fragment)?, &config, format),
        Cmd::Clear { fragment } => cmd_clear(&read_fragment(&fragment)?, &config, format),
        Cmd::Check { file, strict } => cmd_check(&file, strict, &config, format),
        Cmd::Explain { id } => cmd_explain(id.as_deref(), format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(fragment: &str, config: &ParseConfig, format: Format) -> Result<()> {
    let res = parse(fragment, config);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "token": res.token,
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(token) = &res.token {
                let summary = token.summary();
                println!("{}", summary.fragment);
                println!("  kind: {}", summary.kind);
                print_summary_fields(&summary);
            }
            render_diagnostics(fragment, ARGUMENT_ORIGIN, &res.diagnostics);
            print_summary(&res.diagnostics);
        }
    }

    exit_on_failure(&res);
    Ok(())
}

fn cmd_canonical(fragment: &str, config: &ParseConfig, format: Format) -> Result<()> {
    let res = parse(fragment, config);
    let canonical = res.token.as_ref().map(ToString::to_string);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "input": fragment,
                "canonical": canonical,
                "changed": canonical.as_deref().is_some_and(|c| c != fragment),
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(canonical) = &canonical {
                println!("{canonical}");
            }
            render_diagnostics(fragment, ARGUMENT_ORIGIN, &res.diagnostics);
        }
    }

    exit_on_failure(&res);
    Ok(())
}

fn cmd_clear(fragment: &str, config: &ParseConfig, format: Format) -> Result<()> {
    let res = parse(fragment, config);
    let cleared = res.token.as_ref().map(|token| {
        let cleared = token.clear_action();
        let changed = matches!(cleared, Cow::Owned(_));
        (cleared.into_owned(), changed)
    });

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "token": res.token,
                "cleared": cleared.as_ref().map(|(token, _)| token),
                "changed": cleared.as_ref().is_some_and(|(_, changed)| *changed),
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some((token, _)) = &cleared {
                println!("{token}");
            }
            render_diagnostics(fragment, ARGUMENT_ORIGIN, &res.diagnostics);
        }
    }

    exit_on_failure(&res);
    Ok(())
}

/// One line of a batch file that did not survive the check.
#[derive(Debug, Serialize)]
struct CheckFailure {
    line: usize,
    fragment: String,
    reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

fn cmd_check(path: &str, strict: bool, config: &ParseConfig, format: Format) -> Result<()> {
    let text = if path == "-" {
        io::read_to_string(io::stdin()).context("failed to read fragments from stdin")?
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
    };

    let mut checked = 0usize;
    let mut failures = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let fragment = raw.trim_end_matches('\r');
        if fragment.trim().is_empty() || fragment.starts_with('#') {
            continue;
        }
        checked += 1;
        tracing::debug!(line = index + 1, fragment, "checking");
        if let Some(failure) = check_fragment(index + 1, fragment, strict, config) {
            failures.push(failure);
        }
    }

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": failures.is_empty(),
                "checked": checked,
                "failures": failures,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for failure in &failures {
                let origin = format!("{path}:{}", failure.line);
                eprintln!("{origin}: {} {:?}", failure.reason, failure.fragment);
                if let Some(canonical) = &failure.canonical {
                    eprintln!("  canonical: {canonical}");
                }
                render_diagnostics(&failure.fragment, &origin, &failure.diagnostics);
            }
            eprintln!("checked {checked} fragments, {} failed", failures.len());
        }
    }

    if !failures.is_empty() {
        process::exit(1);
    }
    Ok(())
}

/// Parse, print, and parse again. `None` when the line passes.
fn check_fragment(line: usize, fragment: &str, strict: bool, config: &ParseConfig) -> Option<CheckFailure> {
    let failure = |reason, canonical, diagnostics| {
        Some(CheckFailure {
            line,
            fragment: fragment.to_string(),
            reason,
            canonical,
            diagnostics,
        })
    };

    let res = parse(fragment, config);
    let Some(token) = res.token else {
        return failure("not understood", None, res.diagnostics);
    };
    if strict && !res.diagnostics.is_empty() {
        return failure("partially understood", Some(token.to_string()), res.diagnostics);
    }

    let canonical = token.to_string();
    let again = parse(&canonical, config);
    if !again.diagnostics.is_empty() {
        return failure("canonical form has diagnostics", Some(canonical), again.diagnostics);
    }
    if again.token.as_ref() != Some(&token) {
        return failure("canonical form parses to a different token", Some(canonical), Vec::new());
    }
    None
}

fn cmd_explain(id: Option<&str>, format: Format) -> Result<()> {
    let ids: Vec<&str> = match id {
        Some(id) => vec![id],
        None => codes::ALL.to_vec(),
    };

    match format {
        Format::Json => {
            let entries: Vec<_> = ids
                .iter()
                .map(|id| serde_json::json!({ "id": id, "explanation": diag::explain(id) }))
                .collect();
            let out = match entries.as_slice() {
                [single] if id.is_some() => single.clone(),
                _ => serde_json::Value::Array(entries),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for id in ids {
                match diag::explain(id) {
                    Some(text) => println!("{}: {}", highlight_id(id), text),
                    None => println!("{id}: (no explanation available)"),
                }
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

const ARGUMENT_ORIGIN: &str = "<fragment>";

fn resolve_config(path: Option<&str>) -> Result<ParseConfig> {
    let Some(path) = path else {
        return Ok(ParseConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("failed to read config file {path}"))?;
    let config =
        load_config_from_str(&text).with_context(|| format!("failed to load config file {path}"))?;
    tracing::debug!(?config, path, "loaded parser config");
    Ok(config)
}

/// The argument itself, or the first line of stdin for `-`.
fn read_fragment(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let text = io::read_to_string(io::stdin()).context("failed to read fragment from stdin")?;
    Ok(text.lines().next().unwrap_or_default().trim_end_matches('\r').to_string())
}

fn parse(fragment: &str, config: &ParseConfig) -> ParseResult {
    parse_fragment_with(&UrlFragment::with(fragment), config)
}

fn print_summary_fields(summary: &TokenSummary) {
    let fields = [
        ("spreadsheet id", summary.spreadsheet_id.as_deref()),
        ("spreadsheet name", summary.spreadsheet_name.as_deref()),
        ("selection", summary.selection.as_deref()),
        ("selection kind", summary.selection_kind),
        ("anchor", summary.anchor),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
}

/// Exit with code 1 when the fragment produced no token or an error.
/// Warnings alone do not cause a non-zero exit.
fn exit_on_failure(res: &ParseResult) {
    if res.token.is_none() || res.has_errors() {
        process::exit(1);
    }
}
