use thiserror::Error;

/// Main error type for the class-variants crate
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Compound variant #{index} has no constraints and would match every selection")]
    EmptyCompound { index: usize },

    #[error("Axis '{0}' is declared more than once")]
    DuplicateAxis(String),

    #[error("Axis '{axis}' mixes value kinds; all values of an axis must share one kind")]
    MixedAxisDomain { axis: String },

    #[error("Default value for axis '{axis}' does not match the axis value kind")]
    DefaultKindMismatch { axis: String },

    #[error("Compound variant #{index} constrains axis '{axis}' with a value of the wrong kind")]
    ConstraintKindMismatch { index: usize, axis: String },
}

pub type Result<T> = std::result::Result<T, VariantError>;
