//! The `ecma-cli` external collaborator (spec §6 "CLI surface"): argument
//! parsing, file/stdin reading, tokenize/parse modes, and JSON/diagnostic
//! output. Thin shell around `ecma-parser`'s three entry points; none of
//! the grammar lives here.

mod args;

use std::io::Read;
use std::process::ExitCode;

use ariadne::{Label, Report, ReportKind, Source};

use ecma_common::{ParseError, Severity};
use ecma_lexer::{LexedToken, Value};
use ecma_parser::{AllowReserved, EcmaVersion, Options, RawOptions, SourceType};

use args::Cli;

fn main() -> ExitCode {
    let cli = match args::parse_args(std::env::args().skip(1).collect()) {
        Ok(cli) => cli,
        Err(args::ArgError::Help(text)) => {
            println!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(args::ArgError::Message(msg)) => {
            eprintln!("{msg}");
            eprintln!("{}", args::usage());
            return ExitCode::FAILURE;
        }
    };

    let options = resolve_options(&cli);

    let inputs = match read_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("ecma-cli: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut had_errors = false;
    let mut results = Vec::new();

    for (name, source) in &inputs {
        if cli.tokenize {
            let tokens = ecma_parser::tokenizer(source, options.clone());
            results.push(serde_json::to_value(tokens_to_snapshots(&tokens)).unwrap());
        } else {
            match ecma_parser::parse(source, options.clone()) {
                Ok(program) => results.push(serde_json::to_value(&program).unwrap()),
                Err(err) => {
                    had_errors = true;
                    report_error(name, source, &err);
                }
            }
        }
    }

    if !cli.silent && !had_errors {
        let value = if inputs.len() == 1 {
            results.into_iter().next().unwrap()
        } else {
            serde_json::Value::Array(results)
        };
        if cli.compact {
            println!("{}", serde_json::to_string(&value).unwrap());
        } else {
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
        }
    }

    if had_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn resolve_options(cli: &Cli) -> Options {
    let mut raw = RawOptions {
        source_type: Some(if cli.module { SourceType::Module } else { SourceType::Script }),
        allow_hash_bang: cli.allow_hash_bang,
        allow_await_outside_function: cli.allow_await_outside_function,
        locations: cli.locations,
        ..RawOptions::default()
    };
    if cli.allow_reserved_never {
        raw.allow_reserved = Some(AllowReserved::Never);
    }
    if let Some(version) = cli.ecma_version {
        raw.ecma_version = Some(if version >= 2015 { EcmaVersion::Year(version) } else { EcmaVersion::Edition(version) });
    }
    raw.resolve()
}

/// Reads every requested input. No paths (or a lone `-`) reads stdin once;
/// `--` forces every following argument to be treated as a file path even
/// if it looks like a flag (spec §6 "a `--` separator").
fn read_inputs(cli: &Cli) -> Result<Vec<(String, String)>, String> {
    if cli.files.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(vec![("<stdin>".to_string(), buf)]);
    }
    let mut out = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        if path == std::path::Path::new("-") {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            out.push(("<stdin>".to_string(), buf));
            continue;
        }
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
        out.push((path.display().to_string(), source));
    }
    Ok(out)
}

/// Renders a [`ParseError`] with `ariadne`, the way the teacher's
/// `report_diagnostics` renders `snow_parser`'s errors (spec §7: fatal and
/// recoverable errors are both terminal, so there is only ever one error
/// to report per input).
fn report_error(name: &str, source: &str, err: &ParseError) {
    let start = err.span.start as usize;
    let end = (err.span.end as usize).max(start + 1).min(source.len().max(start + 1));
    let kind = match err.severity {
        Severity::Fatal => "Syntax error",
        Severity::Recoverable => "Syntax error (recoverable)",
    };
    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_message(format!("{kind} in {name}"))
        .with_label(Label::new(start..end).with_message(&err.message))
        .finish()
        .eprint(Source::from(source));
}

#[derive(serde::Serialize)]
struct TokenSnapshot {
    #[serde(rename = "type")]
    kind: String,
    start: u32,
    end: u32,
    value: Option<ValueSnapshot>,
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum ValueSnapshot {
    Str(String),
    Num(f64),
    BigInt(String),
    Regex { pattern: String, flags: String },
}

fn tokens_to_snapshots(tokens: &[LexedToken]) -> Vec<TokenSnapshot> {
    tokens
        .iter()
        .map(|t| TokenSnapshot {
            kind: format!("{:?}", t.token.kind),
            start: t.token.span.start,
            end: t.token.span.end,
            value: match &t.value {
                Value::None => None,
                Value::Str(s) => Some(ValueSnapshot::Str(s.clone())),
                Value::Num(n) => Some(ValueSnapshot::Num(*n)),
                Value::BigInt(b) => Some(ValueSnapshot::BigInt(b.to_string())),
                Value::Regex { pattern, flags } => {
                    Some(ValueSnapshot::Regex { pattern: pattern.clone(), flags: flags.clone() })
                }
            },
        })
        .collect()
}
