//! Host-side plumbing for the PEL command line runner
//!
//! The language core is silent and file-agnostic; everything user-facing
//! lives here: reading source, assembling the scope from JSON bindings,
//! shaping output records, and rendering failures against the source text.

use std::fs;
use std::path::Path;

use pel_lang::pipeline::{PipelineError, PipelineResult};
use pel_lang::plugins::RegistryError;
use pel_lang::runtime::EvalError;
use pel_lang::types::LValue;
use pel_lang::utils::SourceMap;
use pel_lang::Scope;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read '{path}': {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid binding '{spec}': expected name=value")]
    InvalidBinding { spec: String },

    #[error("Bindings file must hold a JSON object, found {found}")]
    BindingsNotAnObject { found: &'static str },

    #[error("Invalid JSON in bindings file: {0}")]
    BindingsJson(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Scope(#[from] EvalError),
}

/// Options gathered from everything after the source argument
#[derive(Debug, Default)]
pub struct RunOptions {
    pub binds: Vec<String>,
    pub bindings_file: Option<String>,
    pub emit_ast: bool,
    pub json_output: bool,
}

pub fn parse_options(args: &[String]) -> RunOptions {
    let mut options = RunOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                if i + 1 < args.len() {
                    options.binds.push(args[i + 1].clone());
                    i += 1; // Skip the consumed value
                } else {
                    eprintln!("Warning: --bind requires name=value");
                }
            }
            "--bindings" => {
                if i + 1 < args.len() {
                    options.bindings_file = Some(args[i + 1].clone());
                    i += 1; // Skip the path argument
                } else {
                    eprintln!("Warning: --bindings requires a file path");
                }
            }
            "--emit-ast" => {
                options.emit_ast = true;
            }
            "--json" => {
                options.json_output = true;
            }
            _ => {
                eprintln!("Warning: Unknown option '{}'", args[i]);
            }
        }
        i += 1;
    }

    options
}

/// A positional argument naming an existing file is read as source text;
/// anything else is taken as the expression itself
pub fn read_source(arg: &str) -> Result<String, CliError> {
    let path = Path::new(arg);
    if path.is_file() {
        fs::read_to_string(path).map_err(|source| CliError::ReadInput {
            path: arg.to_string(),
            source,
        })
    } else {
        Ok(arg.to_string())
    }
}

/// Assemble the evaluation scope; inline binds win over file entries
pub fn build_scope(options: &RunOptions) -> Result<Scope, CliError> {
    let mut scope = Scope::new();

    if let Some(path) = &options.bindings_file {
        let text = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
            path: path.clone(),
            source,
        })?;
        let parsed: serde_json::Value = serde_json::from_str(&text)?;
        let object = parsed
            .as_object()
            .ok_or_else(|| CliError::BindingsNotAnObject {
                found: json_kind_name(&parsed),
            })?;
        for (name, value) in object {
            scope.define(name.clone(), LValue::from_json(value))?;
        }
    }

    for spec in &options.binds {
        let (name, raw) = spec
            .split_once('=')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| CliError::InvalidBinding { spec: spec.clone() })?;
        scope.define(name, parse_bind_value(raw))?;
    }

    Ok(scope)
}

/// Binding values are JSON first; anything that does not parse binds
/// as a plain string
fn parse_bind_value(raw: &str) -> LValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => LValue::from_json(&value),
        Err(_) => LValue::Str(raw.to_string()),
    }
}

fn json_kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Machine-readable result record for `--json` output
pub fn value_record(result: &PipelineResult) -> serde_json::Value {
    serde_json::json!({
        "value": result.value.to_json(),
        "kind": result.value.kind().as_str(),
        "token_count": result.token_count,
        "duration_us": result.processing_duration.as_micros() as u64,
    })
}

/// Human-readable failure, with the offending line underlined when the
/// error carries a span
pub fn render_failure(source: &str, error: &PipelineError) -> String {
    match error.span() {
        Some(span) => SourceMap::new(source).format_error(span, &error.to_string()),
        None => format!("error: {}\n", error),
    }
}
