use tracing::warn;

use super::config_parse::ParameterMap;
use crate::error::ConfigError;

pub const DEFAULT_QUAST_DIR: &str = "quast_results";
pub const DEFAULT_PARTITION: &str = "batch";
pub const DEFAULT_ASSEMBLER_MODULE: &str = "smartdenovo";
pub const DEFAULT_QUAST_MODULE: &str = "quast/4.3";
pub const DEFAULT_QUAST_SCRIPT: &str = "/hpc/soft/quast/4.3/bin/quast.py";

/// Largest number of jobs a single sweep may generate.
pub const MAX_COMBINATIONS: usize = 10_000;

const KNOWN_KEYS: &[&str] = &[
    "prefix",
    "threads",
    "quastDir",
    "email",
    "readsPath",
    "kmer",
    "overlapper",
    "minReadLength",
    "partition",
    "assemblerModule",
    "quastModule",
    "quastScript",
    "aggregatorModule",
];

/// The sweep-varying parameters, in expansion order (outer to inner).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AxisKind {
    Kmer,
    Overlapper,
    MinReadLength,
}

impl AxisKind {
    pub const ALL: [AxisKind; 3] = [Self::Kmer, Self::Overlapper, Self::MinReadLength];

    pub fn config_key(self) -> &'static str {
        match self {
            Self::Kmer => "kmer",
            Self::Overlapper => "overlapper",
            Self::MinReadLength => "minReadLength",
        }
    }

    /// Job-name suffix code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Kmer => "KM",
            Self::Overlapper => "OL",
            Self::MinReadLength => "RL",
        }
    }

    /// smartdenovo.pl option carrying this axis.
    pub fn assembler_flag(self) -> &'static str {
        match self {
            Self::Kmer => "-k",
            Self::Overlapper => "-e",
            Self::MinReadLength => "-J",
        }
    }
}

/// One sweep axis. `Undeclared` still contributes a single point to the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axis {
    Undeclared,
    Declared(Vec<String>),
}

impl Axis {
    fn resolve(kind: AxisKind, values: Option<&[String]>) -> Result<Self, ConfigError> {
        let Some(values) = values else {
            return Ok(Self::Undeclared);
        };
        if values.len() == 1 && values[0].is_empty() {
            return Ok(Self::Undeclared);
        }
        if values.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyAxisValue {
                key: kind.config_key(),
            });
        }
        for value in values {
            validate_name_fragment(kind.config_key(), value)?;
        }
        Ok(Self::Declared(values.to_vec()))
    }

    pub fn is_declared(&self) -> bool {
        matches!(self, Self::Declared(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Undeclared => 1,
            Self::Declared(values) => values.len(),
        }
    }

    pub fn points(&self) -> Vec<Option<&str>> {
        match self {
            Self::Undeclared => vec![None],
            Self::Declared(values) => values.iter().map(|value| Some(value.as_str())).collect(),
        }
    }
}

/// Cluster environment the generated scripts rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub partition: String,
    pub assembler_module: String,
    pub quast_module: String,
    pub quast_script: String,
    pub aggregator_module: Option<String>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            partition: DEFAULT_PARTITION.to_string(),
            assembler_module: DEFAULT_ASSEMBLER_MODULE.to_string(),
            quast_module: DEFAULT_QUAST_MODULE.to_string(),
            quast_script: DEFAULT_QUAST_SCRIPT.to_string(),
            aggregator_module: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub prefix: String,
    pub reads_path: String,
    pub threads: Option<u32>,
    pub email: Option<String>,
    pub quast_dir: String,
    pub kmer: Axis,
    pub overlapper: Axis,
    pub min_read_length: Axis,
    pub toolchain: Toolchain,
}

impl SweepConfig {
    pub fn from_params(params: &ParameterMap) -> Result<Self, ConfigError> {
        for key in params.keys() {
            if !KNOWN_KEYS.contains(&key) {
                warn!(key = %key, "ignoring unknown configuration key");
            }
        }

        let prefix = unique_value(params, "prefix").ok_or(ConfigError::MissingKey("prefix"))?;
        validate_name_fragment("prefix", &prefix)?;
        let reads_path =
            unique_value(params, "readsPath").ok_or(ConfigError::MissingKey("readsPath"))?;

        let threads = unique_value(params, "threads")
            .map(|value| match value.parse::<u32>() {
                Ok(count) if count > 0 => Ok(count),
                _ => Err(ConfigError::InvalidValue {
                    key: "threads".to_string(),
                    value,
                    reason: "expected a positive integer",
                }),
            })
            .transpose()?;

        let quast_dir =
            unique_value(params, "quastDir").unwrap_or_else(|| DEFAULT_QUAST_DIR.to_string());

        let defaults = Toolchain::default();
        let toolchain = Toolchain {
            partition: unique_value(params, "partition").unwrap_or(defaults.partition),
            assembler_module: unique_value(params, "assemblerModule")
                .unwrap_or(defaults.assembler_module),
            quast_module: unique_value(params, "quastModule").unwrap_or(defaults.quast_module),
            quast_script: unique_value(params, "quastScript").unwrap_or(defaults.quast_script),
            aggregator_module: unique_value(params, "aggregatorModule"),
        };

        let config = Self {
            prefix,
            reads_path,
            threads,
            email: unique_value(params, "email"),
            quast_dir,
            kmer: Axis::resolve(AxisKind::Kmer, params.get("kmer"))?,
            overlapper: Axis::resolve(AxisKind::Overlapper, params.get("overlapper"))?,
            min_read_length: Axis::resolve(AxisKind::MinReadLength, params.get("minReadLength"))?,
            toolchain,
        };
        config.combination_count()?;
        Ok(config)
    }

    pub fn axis(&self, kind: AxisKind) -> &Axis {
        match kind {
            AxisKind::Kmer => &self.kmer,
            AxisKind::Overlapper => &self.overlapper,
            AxisKind::MinReadLength => &self.min_read_length,
        }
    }

    /// Size of the Cartesian product, refused beyond `MAX_COMBINATIONS`.
    pub fn combination_count(&self) -> Result<usize, ConfigError> {
        AxisKind::ALL
            .iter()
            .try_fold(1_usize, |count, kind| count.checked_mul(self.axis(*kind).len()))
            .filter(|count| *count <= MAX_COMBINATIONS)
            .ok_or(ConfigError::SweepTooLarge {
                limit: MAX_COMBINATIONS,
            })
    }
}

/// First value of a unique-value key; absent or empty counts as unset.
fn unique_value(params: &ParameterMap, key: &str) -> Option<String> {
    let values = params.get(key)?;
    if values.len() > 1 {
        warn!(key = %key, count = values.len(), "only the first value is used");
    }
    values
        .first()
        .filter(|value| !value.is_empty())
        .cloned()
}

/// Prefix and axis values end up in file names and unquoted shell words.
fn validate_name_fragment(key: &str, value: &str) -> Result<(), ConfigError> {
    let allowed = |character: char| character.is_ascii_alphanumeric() || "._+-".contains(character);
    if !value.chars().all(allowed) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "only ASCII letters, digits and '.', '_', '+', '-' are allowed",
        });
    }
    Ok(())
}
