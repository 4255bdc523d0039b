use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// How candidate pairs are enumerated before the cutoff test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborStrategy {
    /// Spatial binning with cells at least one cutoff wide.
    #[default]
    CellList,
    /// Every unordered pair.
    AllPairs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    pub neighbor_strategy: NeighborStrategy,
    pub compute_forces: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            neighbor_strategy: NeighborStrategy::CellList,
            compute_forces: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub data_path: PathBuf,
    pub forcefield_path: PathBuf,
    pub options: EvaluatorOptions,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    data_path: Option<PathBuf>,
    forcefield_path: Option<PathBuf>,
    neighbor_strategy: Option<NeighborStrategy>,
    compute_forces: Option<bool>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_path(mut self, path: PathBuf) -> Self {
        self.data_path = Some(path);
        self
    }
    pub fn forcefield_path(mut self, path: PathBuf) -> Self {
        self.forcefield_path = Some(path);
        self
    }
    pub fn neighbor_strategy(mut self, strategy: NeighborStrategy) -> Self {
        self.neighbor_strategy = Some(strategy);
        self
    }
    pub fn compute_forces(mut self, enabled: bool) -> Self {
        self.compute_forces = Some(enabled);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let defaults = EvaluatorOptions::default();
        Ok(EvaluationConfig {
            data_path: self
                .data_path
                .ok_or(ConfigError::MissingParameter("data_path"))?,
            forcefield_path: self
                .forcefield_path
                .ok_or(ConfigError::MissingParameter("forcefield_path"))?,
            options: EvaluatorOptions {
                neighbor_strategy: self
                    .neighbor_strategy
                    .unwrap_or(defaults.neighbor_strategy),
                compute_forces: self.compute_forces.unwrap_or(defaults.compute_forces),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_both_paths() {
        let result = EvaluationConfigBuilder::new()
            .forcefield_path(PathBuf::from("ff.toml"))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("data_path")));

        let result = EvaluationConfigBuilder::new()
            .data_path(PathBuf::from("system.data"))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("forcefield_path")));
    }

    #[test]
    fn builder_fills_default_options() {
        let config = EvaluationConfigBuilder::new()
            .data_path(PathBuf::from("system.data"))
            .forcefield_path(PathBuf::from("ff.toml"))
            .build()
            .unwrap();
        assert_eq!(config.options, EvaluatorOptions::default());
        assert_eq!(config.options.neighbor_strategy, NeighborStrategy::CellList);
        assert!(config.options.compute_forces);
    }

    #[test]
    fn builder_applies_explicit_options() {
        let config = EvaluationConfigBuilder::new()
            .data_path(PathBuf::from("system.data"))
            .forcefield_path(PathBuf::from("ff.toml"))
            .neighbor_strategy(NeighborStrategy::AllPairs)
            .compute_forces(false)
            .build()
            .unwrap();
        assert_eq!(config.options.neighbor_strategy, NeighborStrategy::AllPairs);
        assert!(!config.options.compute_forces);
    }
}
