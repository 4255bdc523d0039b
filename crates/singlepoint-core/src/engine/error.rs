use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::params::{ConfigurationError, ParamLoadError};
use crate::core::io::data::DataFileError;
use crate::core::models::system::TopologyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("Invalid topology: {source}")]
    Topology {
        #[from]
        source: TopologyError,
    },

    #[error("Failed to read data file: {source}")]
    DataFile {
        #[from]
        source: DataFileError,
    },

    #[error("Failed to load force-field settings: {source}")]
    ParamLoad {
        #[from]
        source: ParamLoadError,
    },

    #[error("Incomplete run configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
