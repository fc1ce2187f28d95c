//! Command-line harness: compiles one query against a schema file and
//! prints the resulting translator output as JSON.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use serde::Deserialize;
use searchql_core::schema::{Field, Schema, SchemaOptions};
use searchql_core::translate::TranslatorRegistry;

#[derive(Debug, ClapParser)]
#[command(name = "searchql", about = "Compile a search query against a schema file")]
struct Cli {
    /// Path to a JSON schema file (`{"name", "fields", "options"}`).
    #[arg(long, env = "SEARCHQL_SCHEMA")]
    schema: PathBuf,

    /// Target dialect: postgres, mysql, sqlite, or document.
    #[arg(long, default_value = "postgres")]
    dialect: String,

    /// The query string to compile.
    query: String,
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    name: String,
    fields: HashMap<String, Field>,
    #[serde(default)]
    options: SchemaOptions,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            tracing::error!(%message, "compilation failed");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let raw = fs::read_to_string(&cli.schema).map_err(|err| format!("reading {}: {err}", cli.schema.display()))?;
    let schema_file: SchemaFile =
        serde_json::from_str(&raw).map_err(|err| format!("parsing {}: {err}", cli.schema.display()))?;
    let schema = Schema::build(schema_file.name, schema_file.fields, schema_file.options)
        .map_err(|err| format!("invalid schema: {err}"))?;

    let registry = TranslatorRegistry::with_builtin_dialects();
    let mut translator = registry
        .get(&cli.dialect)
        .ok_or_else(|| format!("unknown dialect {:?}; expected one of {:?}", cli.dialect, registry.list()))?;

    let output =
        searchql_core::compile_query(&cli.query, &schema, translator.as_mut()).map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&output).map_err(|err| format!("serializing output: {err}"))
}
