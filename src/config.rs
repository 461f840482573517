use crate::class_list::ClassInput;
use crate::errors::{Result, VariantError};
use crate::props::{AxisValue, Props};
use crate::variants::Variants;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Variant configuration for one component, as written in config files.
///
/// Mapping keys are strings on disk; they are parsed with
/// [`AxisValue::from_key`] when the table is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantConfig {
    /// Classes every resolution starts with
    pub base: ClassInput,

    /// Axis name -> axis value -> class fragment
    pub variants: IndexMap<String, IndexMap<String, ClassInput>>,

    /// Axis name -> value used when props do not supply one
    #[serde(alias = "defaultVariants", alias = "default_values")]
    pub default_values: IndexMap<String, AxisValue>,

    /// Extra fragments for specific combinations of axis values
    #[serde(alias = "compound_variants")]
    pub compound_variants: Vec<CompoundConfig>,
}

/// One compound rule in a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundConfig {
    /// Axis name -> required effective value
    #[serde(alias = "constraints")]
    pub when: IndexMap<String, AxisValue>,

    /// Fragment added when every constraint holds
    #[serde(alias = "className")]
    pub class: ClassInput,
}

impl VariantConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        parse_yaml(content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        parse_json(content)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        parse_yaml(&read_config(path)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        parse_json(&read_config(path)?)
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        load_file(path)
    }

    /// Validate the configuration and build the immutable variant table.
    pub fn build(&self) -> Result<Variants> {
        let mut builder = Variants::builder(self.base.clone());

        for (axis, values) in &self.variants {
            let values = values
                .iter()
                .map(|(key, fragment)| (AxisValue::from_key(key), fragment.clone()));
            builder = builder.variant(axis.clone(), values);
        }

        for (axis, value) in &self.default_values {
            builder = builder.default_value(axis.clone(), value.clone());
        }

        for compound in &self.compound_variants {
            let constraints = compound
                .when
                .iter()
                .map(|(axis, value)| (axis.clone(), value.clone()));
            builder = builder.compound(constraints, compound.class.clone());
        }

        builder.build()
    }
}

/// Build a resolve function for `config` on top of `base`.
///
/// `base` replaces whatever base the configuration carries.
pub fn cva(
    base: impl Into<ClassInput>,
    config: VariantConfig,
) -> Result<impl Fn(&dyn Props) -> String + Send + Sync> {
    let config = VariantConfig {
        base: base.into(),
        ..config
    };
    Ok(config.build()?.into_fn())
}

/// A config file declaring several components by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsFile {
    pub components: IndexMap<String, VariantConfig>,
}

impl ComponentsFile {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        parse_yaml(content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        parse_json(content)
    }

    /// Load components from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        load_file(path)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Build the variant table of one component.
    pub fn component(&self, name: &str) -> Result<Variants> {
        self.components
            .get(name)
            .ok_or_else(|| VariantError::UnknownComponent(name.to_string()))?
            .build()
    }

    /// Build every component, stopping at the first invalid one.
    pub fn build_all(&self) -> Result<IndexMap<String, Variants>> {
        self.components
            .iter()
            .map(|(name, config)| {
                config
                    .build()
                    .map(|variants| (name.clone(), variants))
                    .map_err(|e| VariantError::ConfigError {
                        message: format!("component '{}': {}", name, e),
                    })
            })
            .collect()
    }

    /// Merge with another file; components in `other` replace same-named ones.
    pub fn merge(mut self, other: Self) -> Self {
        self.components.extend(other.components);
        self
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| VariantError::ConfigError {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(serde_yaml::from_str(content)?)
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| VariantError::ConfigError {
        message: format!("Failed to parse JSON config: {}", e),
    })
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => parse_yaml(&read_config(path)?),
        Some("json") => parse_json(&read_config(path)?),
        _ => Err(VariantError::ConfigError {
            message: format!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                path.display()
            ),
        }),
    }
}
