//! Port script loading.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bess_port::{is_base_driver, PortConfig, BUILTIN_DRIVERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or checking a port script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid script: {0}")]
    Invalid(String),
}

/// One port to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Driver name (e.g. "PMDPort").
    pub driver: String,

    /// Name hint and driver options.
    #[serde(flatten)]
    pub config: PortConfig,
}

/// A list of ports, created in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortScript {
    #[serde(default)]
    pub ports: Vec<PortSpec>,
}

impl PortScript {
    /// Parses a script from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reads and parses a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ScriptError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects scripts the engine would certainly refuse.
    ///
    /// Only the built-in drivers are accepted. Driver options are not
    /// looked at.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.ports.is_empty() {
            return Err(ScriptError::Invalid("no ports declared".to_string()));
        }

        let mut names = HashSet::new();
        for (idx, spec) in self.ports.iter().enumerate() {
            if spec.driver.is_empty() {
                return Err(ScriptError::Invalid(format!(
                    "port #{} has an empty driver",
                    idx
                )));
            }
            if is_base_driver(&spec.driver) {
                return Err(ScriptError::Invalid(format!(
                    "port #{} uses the abstract driver '{}'",
                    idx, spec.driver
                )));
            }
            if !BUILTIN_DRIVERS.contains(&spec.driver.as_str()) {
                return Err(ScriptError::Invalid(format!(
                    "port #{} uses unknown driver '{}' (expected one of {})",
                    idx,
                    spec.driver,
                    BUILTIN_DRIVERS.join(", ")
                )));
            }
            if let Some(name) = &spec.config.name {
                if !names.insert(name.as_str()) {
                    return Err(ScriptError::Invalid(format!(
                        "port name '{}' declared twice",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}
