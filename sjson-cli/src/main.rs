//! SJSON CLI - Command-line tool for SuperJSON envelopes
//!
//! This binary provides command-line interfaces for:
//! - encode: plain JSON → envelope
//! - decode: envelope → one line per typed value
//! - validate: run the pre-flight input checks only
//! - html: envelope escaped for inline HTML embedding

use clap::{Parser, Subcommand};
use sjson_codec::Engine;
use sjson_format::{SjsonError, Value};
use sjson_io::{init_tracing, to_html, ClassRegistry, SjsonConfig};
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sjson")]
#[command(about = "SuperJSON envelope CLI tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode plain JSON into a SuperJSON envelope
    ///
    /// Strings of 16 or more digits are tagged as bigint.
    Encode {
        /// Input file (plain JSON)
        input: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print the envelope
        #[arg(long)]
        pretty: bool,
    },
    /// Decode an envelope and list its typed values
    ///
    /// Prints `path<TAB>kind<TAB>value` for every restored non-JSON value.
    /// The root path is shown as `$`.
    Decode {
        /// Input file (envelope or plain JSON)
        input: PathBuf,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check size, shape, depth and collection limits without decoding
    Validate {
        /// Input file
        input: PathBuf,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Encode plain JSON and HTML-escape the envelope
    Html {
        /// Input file (plain JSON)
        input: PathBuf,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            config,
            pretty,
        } => {
            handle_encode(&input, output.as_deref(), config.as_deref(), pretty)?;
        }
        Commands::Decode { input, config } => {
            handle_decode(&input, config.as_deref())?;
        }
        Commands::Validate { input, config } => {
            handle_validate(&input, config.as_deref())?;
        }
        Commands::Html { input, config } => {
            handle_html(&input, config.as_deref())?;
        }
    }

    Ok(())
}

fn load_engine(config: Option<&Path>) -> Result<Engine, SjsonError> {
    match config {
        Some(path) => SjsonConfig::from_path(path)?.build_engine(ClassRegistry::new()),
        None => Ok(Engine::new()),
    }
}

fn read_plain_json(input: &Path) -> Result<Value, Box<dyn Error>> {
    let text = fs::read_to_string(input)?;
    let document: serde_json::Value = serde_json::from_str(&text)?;
    Ok(Value::from(document))
}

fn handle_encode(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn Error>> {
    let engine = load_engine(config)?;
    let value = read_plain_json(input)?;
    let envelope = engine.serialize(&value)?;

    let mut text = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    text.push('\n');

    match output {
        Some(path) => {
            fs::write(path, &text)?;
            let markers = envelope.meta.as_ref().map_or(0, |m| m.values.len());
            eprintln!(
                "Encoded {} → {} ({} typed value{})",
                input.display(),
                path.display(),
                markers,
                if markers == 1 { "" } else { "s" }
            );
        }
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}

fn handle_decode(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let engine = load_engine(config)?;
    let text = fs::read_to_string(input)?;
    let value = engine.deserialize(&text)?;

    let mut lines = Vec::new();
    collect_typed(&value, "", &mut lines)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, kind, rendering) in &lines {
        let shown = if path.is_empty() { "$" } else { path.as_str() };
        writeln!(out, "{}\t{}\t{}", shown, kind, rendering)?;
    }
    tracing::debug!(typed_values = lines.len(), "decoded {}", input.display());
    Ok(())
}

/// Pre-order list of `(path, kind, rendering)` for every non-JSON value
fn collect_typed(
    value: &Value,
    path: &str,
    lines: &mut Vec<(String, &'static str, String)>,
) -> Result<(), Box<dyn Error>> {
    let rendering = match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_typed(item, &sjson_format::join_path(path, &idx.to_string()), lines)?;
            }
            None
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                collect_typed(item, &sjson_format::join_path(path, key), lines)?;
            }
            None
        }
        Value::Date(date) => Some(date.to_rfc3339()),
        Value::BigInt(big) => Some(big.as_str().to_string()),
        Value::Set(set) => Some(serde_json::to_string(set.items())?),
        Value::Map(map) => Some(serde_json::to_string(map.entries())?),
        Value::Regex(pattern) => Some(pattern.to_string()),
        Value::Url(url) => Some(url.as_str().to_string()),
        Value::Error(error) => Some(format!("{}: {}", error.name(), error.message())),
        Value::Record(record) => {
            let record = record
                .read()
                .map_err(|_| "record lock poisoned while listing values")?
                .clone();
            lines.push((path.to_string(), value.kind(), record.type_name().to_string()));
            for (key, item) in record.fields() {
                collect_typed(item, &sjson_format::join_path(path, key), lines)?;
            }
            None
        }
        Value::Custom(custom) => Some(custom.type_name().to_string()),
    };

    if let Some(rendering) = rendering {
        lines.push((path.to_string(), value.kind(), rendering));
    }
    Ok(())
}

fn handle_validate(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let engine = load_engine(config)?;
    let text = fs::read_to_string(input)?;
    engine.validate(&text)?;
    println!("{}: ok", input.display());
    Ok(())
}

fn handle_html(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let engine = load_engine(config)?;
    let value = read_plain_json(input)?;
    println!("{}", to_html(&engine, &value)?);
    Ok(())
}
