//! CLI command implementations
//!
//! Every command boots the same way: load config, apply the log level,
//! load schemas. The codec itself never touches files; commands read the
//! inputs and print the results.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{
    as_databag, as_record, read_databag_file, read_request, write_error, write_response,
};
use crate::codec::{decode, Codec, DataValidationError, RawBag, Record};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{EncodeMode, Schema, SchemaRegistry};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Check { config } => check(&config),
        Command::Decode {
            config,
            schema,
            version,
        } => decode_command(&config, &schema, version.as_deref()),
        Command::Encode {
            config,
            schema,
            version,
            mode,
            base,
            keep_existing,
        } => encode_command(
            &config,
            &schema,
            version.as_deref(),
            mode,
            base.as_deref(),
            keep_existing,
        ),
    }
}

/// Loaded config and schemas
struct Context {
    config: Config,
    registry: SchemaRegistry,
}

fn boot(config_path: &Path) -> CliResult<Context> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.min_severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", config_path.display().to_string().as_str())],
    );

    let registry = SchemaRegistry::load_dir(&config.schema_path())?;
    log_event_with_fields(
        Event::SchemasLoaded,
        &[
            ("count", registry.len().to_string().as_str()),
            ("schema_dir", config.schema_dir.as_str()),
        ],
    );

    Ok(Context { config, registry })
}

/// `databag check`
pub fn check(config_path: &Path) -> CliResult<()> {
    let ctx = boot(config_path)?;
    write_response(summarize(&ctx.registry))
}

/// `databag decode`
pub fn decode_command(config_path: &Path, name: &str, version: Option<&str>) -> CliResult<()> {
    let ctx = boot(config_path)?;
    let schema = resolve_schema(&ctx.registry, name, version)?;
    let databag = as_databag(read_request()?)?;

    match decode_bag(&schema, &databag) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code(), e.message(), error_fields(&e))?;
            Err(e.into())
        }
    }
}

/// `databag encode`
pub fn encode_command(
    config_path: &Path,
    name: &str,
    version: Option<&str>,
    mode: Option<EncodeMode>,
    base: Option<&Path>,
    keep_existing: bool,
) -> CliResult<()> {
    let ctx = boot(config_path)?;
    let schema = resolve_schema(&ctx.registry, name, version)?;
    let record = as_record(read_request()?)?;

    let databag = match base {
        Some(path) => read_databag_file(path)?,
        None => RawBag::new(),
    };
    let mode = mode.or(ctx.config.encode_mode).unwrap_or(schema.encode_mode);
    let clear = ctx.config.clear && !keep_existing;

    match encode_record(&schema, record, mode, databag, clear) {
        Ok(databag) => write_response(json!(databag)),
        Err(e) => {
            write_error(e.code(), e.message(), error_fields(&e))?;
            Err(e.into())
        }
    }
}

/// Picks `version` of `name`, or its latest version.
pub fn resolve_schema(
    registry: &SchemaRegistry,
    name: &str,
    version: Option<&str>,
) -> CliResult<Arc<Schema>> {
    let schema = match version {
        Some(v) => registry.get(name, v),
        None => registry.latest(name),
    };
    schema.ok_or_else(|| CliError::unknown_schema(name, version))
}

/// Decodes `databag` and returns the record as name-keyed JSON.
pub fn decode_bag(schema: &Arc<Schema>, databag: &RawBag) -> Result<Value, DataValidationError> {
    decode(schema, databag).map(|record| record.to_json())
}

/// Validates `values` and encodes them into `databag`.
pub fn encode_record(
    schema: &Arc<Schema>,
    values: Map<String, Value>,
    mode: EncodeMode,
    mut databag: RawBag,
    clear: bool,
) -> Result<RawBag, DataValidationError> {
    let record = Record::new(Arc::clone(schema), values)?;
    Codec::new(schema)
        .with_mode(mode)
        .encode_values(record.values(), &mut databag, clear);
    Ok(databag)
}

/// One entry per registered schema.
pub fn summarize(registry: &SchemaRegistry) -> Value {
    let schemas: Vec<Value> = registry
        .iter()
        .map(|schema| {
            json!({
                "name": schema.name,
                "version": schema.version,
                "encode_mode": schema.encode_mode.as_str(),
                "fields": schema.aliases().collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "schemas": schemas })
}

fn error_fields(e: &DataValidationError) -> Map<String, Value> {
    let mut extra = Map::new();
    extra.insert("kind".into(), e.kind().as_str().into());
    if let Some(key) = e.key() {
        extra.insert("key".into(), key.into());
    }
    if let Some(details) = e.details() {
        extra.insert("field".into(), details.field.clone().into());
        extra.insert("reason".into(), details.to_string().into());
    }
    extra
}
