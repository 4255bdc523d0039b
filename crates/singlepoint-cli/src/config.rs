use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use singlepoint::engine::config::{self as core_config, NeighborStrategy};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInputConfig {
    data: Option<PathBuf>,
    forcefield: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialEvaluationConfig {
    #[serde(rename = "neighbor-strategy")]
    neighbor_strategy: Option<NeighborStrategy>,
    #[serde(rename = "compute-forces")]
    compute_forces: Option<bool>,
}

/// Run configuration as read from a TOML file, before command-line overrides.
///
/// Relative input paths are resolved against the directory of the file they came from.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    input: Option<PartialInputConfig>,
    evaluation: Option<PartialEvaluationConfig>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<core_config::EvaluationConfig> {
        self.apply_set_values(&args.set_values)?;

        let input = self.input.take().unwrap_or_default();
        let evaluation = self.evaluation.take().unwrap_or_default();

        let resolve = |cli: Option<&PathBuf>,
                       file: Option<PathBuf>,
                       kind: &str|
         -> Result<PathBuf> {
            let path = match (cli, file) {
                (Some(path), _) => path.clone(),
                (None, Some(path)) => match &self.base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path,
                },
                (None, None) => {
                    return Err(CliError::Config(format!(
                        "A value for '{}' is required either in the config file or via CLI argument.",
                        kind
                    )));
                }
            };
            if !path.exists() {
                return Err(CliError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Provided path does not exist: {}", path.display()),
                )));
            }
            Ok(path)
        };

        let data_path = resolve(args.data.as_ref(), input.data, "input.data")?;
        let forcefield_path =
            resolve(args.forcefield.as_ref(), input.forcefield, "input.forcefield")?;

        let mut builder = core_config::EvaluationConfigBuilder::new()
            .data_path(data_path)
            .forcefield_path(forcefield_path);

        if let Some(strategy) = args
            .neighbor
            .map(NeighborStrategy::from)
            .or(evaluation.neighbor_strategy)
        {
            builder = builder.neighbor_strategy(strategy);
        }
        if args.no_forces {
            builder = builder.compute_forces(false);
        } else if let Some(enabled) = evaluation.compute_forces {
            builder = builder.compute_forces(enabled);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "input.data" => {
                    self.input.get_or_insert_with(Default::default).data =
                        Some(PathBuf::from(value_str));
                }
                "input.forcefield" => {
                    self.input.get_or_insert_with(Default::default).forcefield =
                        Some(PathBuf::from(value_str));
                }
                "evaluation.neighbor-strategy" => {
                    let strategy = match value_str {
                        "cell-list" => NeighborStrategy::CellList,
                        "all-pairs" => NeighborStrategy::AllPairs,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid neighbor strategy for {}: {} (expected 'cell-list' or 'all-pairs')",
                                key, value_str
                            )));
                        }
                    };
                    self.evaluation
                        .get_or_insert_with(Default::default)
                        .neighbor_strategy = Some(strategy);
                }
                "evaluation.compute-forces" => {
                    self.evaluation
                        .get_or_insert_with(Default::default)
                        .compute_forces = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
