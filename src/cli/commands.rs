//! CLI command implementations
//!
//! Every invocation writes exactly one JSON envelope to stdout. Failures,
//! including a bad configuration file, are written as an error envelope and
//! then returned, so `main` can exit non-zero.

use std::io::{self, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde_json::{json, Map, Value};

use crate::market::{stock_query_builder, QueryWindow};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{Arguments, Registry};
use crate::schema::SchemaLoader;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error_to, write_response};

/// Parse arguments, load configuration and run the selected command
pub fn run() -> CliResult<()> {
    let result = execute(Cli::parse_args());
    report(result, &mut io::stdout())
}

/// Loads the configuration and runs the command
pub fn execute(cli: Cli) -> CliResult<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    config.apply();
    run_command(cli.command, &config)
}

/// Writes the error envelope for a failed command, then returns the failure
fn report<W: Write>(result: CliResult<()>, out: &mut W) -> CliResult<()> {
    if let Err(e) = &result {
        write_error_to(out, e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Check { schema_dir } => check(config.schema_dir_or(schema_dir.as_deref())),
        Command::Construct {
            schema_dir,
            type_name,
        } => construct(config.schema_dir_or(schema_dir.as_deref()), &type_name),
        Command::Window {
            symbol,
            source,
            days,
        } => window(&symbol, &source, days),
    }
}

/// Load every schema file and print the registered types
pub fn check(schema_dir: &Path) -> CliResult<()> {
    let data = check_schemas(schema_dir)?;
    write_response(data)
}

/// Construct one record from the request on stdin
pub fn construct(schema_dir: &Path, type_name: &str) -> CliResult<()> {
    let request = read_request()?;
    let data = construct_record(schema_dir, type_name, &request)?;
    write_response(data)
}

/// Resolve the stock query window ending today
pub fn window(symbol: &str, source: &str, days: i64) -> CliResult<()> {
    let today = Local::now().date_naive();
    let data = resolve_window(symbol, source, days, today)?;
    write_response(data)
}

/// Builds a registry with the built-in types plus every schema file.
pub fn load_registry(schema_dir: &Path) -> CliResult<Registry> {
    let mut registry = Registry::new();
    registry.define(stock_query_builder()?)?;

    let mut loader = SchemaLoader::new(schema_dir);
    loader.load_all()?;
    loader.register_all(&mut registry)?;

    Ok(registry)
}

/// Describes every registered type, in definition order.
pub fn check_schemas(schema_dir: &Path) -> CliResult<Value> {
    let registry = load_registry(schema_dir)?;

    let types: Vec<Value> = registry
        .iter()
        .map(|record_type| {
            json!({
                "name": record_type.name(),
                "extends": record_type.base_name(),
                "signature": record_type.signature().to_string(),
            })
        })
        .collect();

    Ok(json!({ "types": types }))
}

/// Constructs `type_name` from a `{"args": [...], "kwargs": {...}}` request.
pub fn construct_record(schema_dir: &Path, type_name: &str, request: &Value) -> CliResult<Value> {
    let registry = load_registry(schema_dir)?;
    let arguments = parse_arguments(request)?;

    match registry.construct(type_name, arguments) {
        Ok(record) => {
            log_event_with_fields(Event::RecordConstructed, &[("record_type", type_name)]);
            Ok(json!({
                "type": record.type_name(),
                "display": record.to_string(),
                "fields": record.to_json(),
            }))
        }
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::RecordRejected,
                &[("code", e.code()), ("reason", reason.as_str()), ("record_type", type_name)],
            );
            Err(e.into())
        }
    }
}

/// Validates the query inputs and resolves the window ending at `today`.
pub fn resolve_window(symbol: &str, source: &str, days: i64, today: NaiveDate) -> CliResult<Value> {
    let window = QueryWindow::resolve(symbol, source, days, today).map_err(|e| {
        let reason = e.to_string();
        log_event_with_fields(
            Event::RecordRejected,
            &[("code", e.code()), ("reason", reason.as_str()), ("record_type", "StockQuery")],
        );
        CliError::from(e)
    })?;

    let start = window.start.to_string();
    let end = window.end.to_string();
    log_event_with_fields(
        Event::QueryWindowResolved,
        &[
            ("end", end.as_str()),
            ("source", window.source.as_str()),
            ("start", start.as_str()),
            ("symbol", window.symbol.as_str()),
        ],
    );

    Ok(serde_json::to_value(&window)?)
}

/// Splits a request into positional and keyword arguments.
///
/// Both keys are optional; anything else in the request is rejected.
pub fn parse_arguments(request: &Value) -> CliResult<Arguments> {
    let obj = request
        .as_object()
        .ok_or_else(|| CliError::invalid_request("Request must be a JSON object"))?;

    if let Some(key) = obj.keys().find(|k| *k != "args" && *k != "kwargs") {
        return Err(CliError::invalid_request(format!("Unknown request key '{}'", key)));
    }

    let positional = match obj.get("args") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(_) => return Err(CliError::invalid_request("'args' must be an array")),
    };

    let keywords = match obj.get("kwargs") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(CliError::invalid_request("'kwargs' must be an object")),
    };

    Ok(Arguments::from_json(positional, keywords))
}
