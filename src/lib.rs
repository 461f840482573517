pub mod args;
pub mod class_list;
pub mod config;
pub mod errors;
pub mod props;
pub mod variants;

pub use args::{BatchArgs, CheckArgs, Cli, Commands, CxArgs, ResolveArgs};
pub use class_list::{join, tokens, ClassInput, ClassLike, ClassList, Text};
pub use config::{cva, ComponentsFile, CompoundConfig, VariantConfig};
pub use errors::{Result, VariantError};
pub use props::{AxisKind, AxisValue, Props, Record};
pub use variants::{
    Axis, CompoundVariant, Resolution, SelectedValue, ValueSource, Variants, VariantsBuilder,
};

use indexmap::IndexMap;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber used by the CLI.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `warn`.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Dispatch a parsed command line and return what should be printed.
pub fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Resolve(args) => handle_resolve_command(&args),
        Commands::Batch(args) => handle_batch_command(&args),
        Commands::Cx(args) => Ok(handle_cx_command(&args)),
        Commands::Check(args) => handle_check_command(&args),
    }
}

/// Handle resolve command - resolve one selection for a named component
pub fn handle_resolve_command(args: &ResolveArgs) -> Result<String> {
    args.validate().map_err(VariantError::InvalidInput)?;

    let variants = ComponentsFile::from_file(&args.config)?.component(&args.component)?;

    let props = if args.none {
        None
    } else {
        resolve_props(args)?
    };

    tracing::debug!(
        component = %args.component,
        props = ?props,
        "resolving component"
    );

    if args.explain {
        Ok(serde_json::to_string_pretty(&variants.explain(&props))?)
    } else {
        Ok(variants.resolve(&props))
    }
}

/// Merge `--props-json` and `--set` into one selection; `None` is no selection.
fn resolve_props(args: &ResolveArgs) -> Result<Option<IndexMap<String, AxisValue>>> {
    let mut props = IndexMap::new();

    if let Some(json) = &args.props_json {
        match serde_json::from_str::<Value>(json)? {
            Value::Null if args.set.is_empty() => return Ok(None),
            Value::Null => {}
            Value::Object(fields) => {
                for (axis, value) in fields {
                    match AxisValue::from_json(&value) {
                        Some(value) => {
                            props.insert(axis, value);
                        }
                        None => {
                            tracing::warn!(axis = %axis, "ignoring props value that is not a string, bool or integer");
                        }
                    }
                }
            }
            _ => {
                return Err(VariantError::InvalidInput(
                    "--props-json must be a JSON object or null".to_string(),
                ))
            }
        }
    }

    props.extend(args.assignments().map_err(VariantError::InvalidInput)?);
    Ok(Some(props))
}

/// Handle batch command - resolve a JSON array of props in parallel
pub fn handle_batch_command(args: &BatchArgs) -> Result<String> {
    use rayon::prelude::*;

    args.validate().map_err(VariantError::InvalidInput)?;

    let variants = ComponentsFile::from_file(&args.config)?.component(&args.component)?;

    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let selections: Vec<Value> = serde_json::from_str(&input)?;

    tracing::debug!(
        component = %args.component,
        count = selections.len(),
        "resolving batch"
    );

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| VariantError::InvalidInput(format!("Failed to start thread pool: {}", e)))?;

    // Indexed parallel iterators collect in input order.
    let resolved: Vec<String> = pool.install(|| {
        selections
            .par_iter()
            .map(|props| variants.resolve(props))
            .collect()
    });

    Ok(serde_json::to_string_pretty(&resolved)?)
}

/// Handle cx command - join ad-hoc class arguments
pub fn handle_cx_command(args: &CxArgs) -> String {
    join(&args.classes)
}

/// Handle check command - build every component and report what was found
pub fn handle_check_command(args: &CheckArgs) -> Result<String> {
    let file = ComponentsFile::from_file(&args.config)?;
    let components = file.build_all()?;

    let mut report = Vec::with_capacity(components.len());
    for (name, variants) in &components {
        report.push(format!(
            "{}: {} axes, {} compound variants",
            name,
            variants.axes().len(),
            variants.compound_variants().len()
        ));
    }
    report.push(format!("{} components OK", components.len()));

    Ok(report.join("\n"))
}
