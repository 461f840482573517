use crate::props::AxisValue;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Class variants CLI - resolves component variant selections into class strings
#[derive(Parser, Debug)]
#[command(name = "class-variants")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        default_value_t = false,
        help = "Enable debug logging (RUST_LOG takes precedence)"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one props selection for a component
    Resolve(ResolveArgs),
    /// Resolve a JSON array of props selections in parallel
    Batch(BatchArgs),
    /// Join ad-hoc class arguments into one class string
    Cx(CxArgs),
    /// Validate every component in a config file
    Check(CheckArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    /// Components file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "CLASS_VARIANTS_CONFIG",
        help = "Path to the components file (YAML or JSON)"
    )]
    pub config: PathBuf,

    /// Component name
    #[arg(
        short = 'n',
        long = "component",
        value_name = "NAME",
        help = "Name of the component to resolve"
    )]
    pub component: String,

    /// Axis assignments
    #[arg(
        short = 's',
        long = "set",
        value_name = "AXIS=VALUE",
        num_args = 0..,
        help = "Select an axis value; true/false and integers are typed"
    )]
    pub set: Vec<String>,

    /// Props as a JSON object
    #[arg(
        long = "props-json",
        value_name = "JSON",
        help = "Props as a JSON object; --set values are applied on top"
    )]
    pub props_json: Option<String>,

    /// No selection
    #[arg(
        long = "none",
        default_value_t = false,
        help = "Resolve with no selection at all (base class only, no defaults)"
    )]
    pub none: bool,

    /// Print a JSON breakdown instead of the class string
    #[arg(
        long = "explain",
        default_value_t = false,
        help = "Print effective axis values and matched compound rules as JSON"
    )]
    pub explain: bool,
}

/// Arguments for the batch command
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Components file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "CLASS_VARIANTS_CONFIG",
        help = "Path to the components file (YAML or JSON)"
    )]
    pub config: PathBuf,

    /// Component name
    #[arg(
        short = 'n',
        long = "component",
        value_name = "NAME",
        help = "Name of the component to resolve"
    )]
    pub component: String,

    /// Input file with a JSON array of props (stdin when omitted)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "JSON array of props objects; null entries mean no selection"
    )]
    pub input: Option<PathBuf>,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,
}

/// Arguments for the cx command
#[derive(Parser, Debug, Clone)]
pub struct CxArgs {
    /// Class arguments
    #[arg(value_name = "CLASSES", num_args = 0.., allow_hyphen_values = true)]
    pub classes: Vec<String>,
}

/// Arguments for the check command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Components file path
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "CLASS_VARIANTS_CONFIG",
        help = "Path to the components file (YAML or JSON)"
    )]
    pub config: PathBuf,
}

impl ResolveArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.none && (!self.set.is_empty() || self.props_json.is_some()) {
            return Err("--none cannot be combined with --set or --props-json".to_string());
        }

        self.assignments().map(|_| ())
    }

    /// Parse `--set axis=value` pairs in order; later pairs override earlier ones.
    pub fn assignments(&self) -> Result<IndexMap<String, AxisValue>, String> {
        let mut assignments = IndexMap::new();
        for item in &self.set {
            let (axis, value) = item
                .split_once('=')
                .ok_or_else(|| format!("Invalid assignment '{}', expected AXIS=VALUE", item))?;
            let axis = axis.trim();
            if axis.is_empty() {
                return Err(format!("Invalid assignment '{}', axis name is empty", item));
            }
            assignments.insert(axis.to_string(), AxisValue::from_key(value.trim()));
        }
        Ok(assignments)
    }
}

impl BatchArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        Ok(())
    }
}
