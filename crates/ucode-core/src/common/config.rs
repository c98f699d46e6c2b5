//! Workflow configuration.
//!
//! Every path the tasks read or write is named here, relative paths being
//! resolved against `modelWorkspace`. Missing keys fall back to the file
//! names and geometry the UCODE exercises have always used.

use super::constants::{
    DEFAULT_EXPECTED_RUNTIME, DEFAULT_FACIES_PDATA_FILE, DEFAULT_HOB_OUTPUT_FILE,
    DEFAULT_JIF_FILE, DEFAULT_MODEL_SUMMARY_FILE, DEFAULT_OBSERVATION_DATA_FILE,
    DEFAULT_OBSERVATION_GROUP, DEFAULT_PDATA_FILE, DEFAULT_RUNNER_BATCH_FILE,
    DEFAULT_RUNNER_TABLE_FILE, FACIES_UMBRELLA_GROUP, FACIES_UMBRELLA_LITHOLOGIES,
    GHB_CONDUCTIVITY_PARAMETER, RIVER_CONDUCTIVITY_PARAMETER,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ucode-prep.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    #[serde(default = "default_workspace")]
    pub model_workspace: PathBuf,
    #[serde(default)]
    pub parameters: Option<ParameterConfig>,
    #[serde(default)]
    pub observations: Option<ObservationConfig>,
    #[serde(default)]
    pub parallel: Option<ParallelConfig>,
    #[serde(default)]
    pub model: Option<ModelConfig>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            model_workspace: default_workspace(),
            parameters: None,
            observations: None,
            parallel: None,
            model: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterConfig {
    pub zone_table: PathBuf,
    /// Long-form CSVs (`GroupName,ParamName,StartValue`) appended after the melt.
    #[serde(default)]
    pub extra_parameters: Vec<PathBuf>,
    #[serde(default = "default_pdata_file")]
    pub output: PathBuf,
    #[serde(default)]
    pub facies: Option<FaciesConfig>,
}

impl ParameterConfig {
    pub fn new(zone_table: impl Into<PathBuf>) -> Self {
        Self {
            zone_table: zone_table.into(),
            extra_parameters: Vec::new(),
            output: default_pdata_file(),
            facies: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedZonePolicy {
    #[default]
    Exclude,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaciesConfig {
    #[serde(default = "default_facies_pdata_file")]
    pub output: PathBuf,
    #[serde(default)]
    pub unmatched_zones: UnmatchedZonePolicy,
    #[serde(default = "default_umbrella_group")]
    pub umbrella_group: String,
    #[serde(default = "default_umbrella_lithologies")]
    pub umbrella_lithologies: Vec<String>,
}

impl Default for FaciesConfig {
    fn default() -> Self {
        Self {
            output: default_facies_pdata_file(),
            unmatched_zones: UnmatchedZonePolicy::default(),
            umbrella_group: default_umbrella_group(),
            umbrella_lithologies: default_umbrella_lithologies(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationConfig {
    #[serde(default = "default_hob_output")]
    pub hob_output: PathBuf,
    #[serde(default = "default_jif_file")]
    pub index_file: PathBuf,
    #[serde(default = "default_observation_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_observation_group")]
    pub group_name: String,
    #[serde(default)]
    pub include_statistics: bool,
    #[serde(default)]
    pub default_statistic: Option<f64>,
    #[serde(default)]
    pub default_stat_flag: Option<String>,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            hob_output: default_hob_output(),
            index_file: default_jif_file(),
            data_file: default_observation_data_file(),
            group_name: default_observation_group(),
            include_statistics: false,
            default_statistic: None,
            default_stat_flag: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelConfig {
    /// Requested runner count; capped at one less than the CPU count.
    #[serde(default)]
    pub nodes: Option<usize>,
    #[serde(default = "default_expected_runtime")]
    pub expected_runtime: f64,
    #[serde(default = "default_runner_batch_file")]
    pub batch_file: PathBuf,
    #[serde(default = "default_runner_table_file")]
    pub table_file: PathBuf,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            nodes: None,
            expected_runtime: default_expected_runtime(),
            batch_file: default_runner_batch_file(),
            table_file: default_runner_table_file(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelGrid {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
    #[serde(default = "default_stress_periods")]
    pub nper: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMultiplier {
    /// 1-based model layer.
    pub layer: usize,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryGeometry {
    pub parameter: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    pub executable: PathBuf,
    pub name_file: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub grid: ModelGrid,
    pub parameter_table: PathBuf,
    #[serde(default = "default_column_multiplier")]
    pub multiplier: Option<ColumnMultiplier>,
    #[serde(default = "default_river_geometry")]
    pub river: Option<BoundaryGeometry>,
    #[serde(default = "default_ghb_geometry")]
    pub ghb: Option<BoundaryGeometry>,
    #[serde(default)]
    pub simulator: Option<SimulatorConfig>,
    #[serde(default = "default_model_summary_file")]
    pub summary_file: PathBuf,
}

impl ModelConfig {
    pub fn new(grid: ModelGrid, parameter_table: impl Into<PathBuf>) -> Self {
        Self {
            grid,
            parameter_table: parameter_table.into(),
            multiplier: default_column_multiplier(),
            river: default_river_geometry(),
            ghb: default_ghb_geometry(),
            simulator: None,
            summary_file: default_model_summary_file(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowConfigError {
    #[error("failed to read workflow config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse workflow config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_workflow_config(
    config_path: impl AsRef<Path>,
) -> Result<WorkflowConfig, WorkflowConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| WorkflowConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| WorkflowConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_pdata_file() -> PathBuf {
    PathBuf::from(DEFAULT_PDATA_FILE)
}

fn default_facies_pdata_file() -> PathBuf {
    PathBuf::from(DEFAULT_FACIES_PDATA_FILE)
}

fn default_umbrella_group() -> String {
    FACIES_UMBRELLA_GROUP.to_string()
}

fn default_umbrella_lithologies() -> Vec<String> {
    FACIES_UMBRELLA_LITHOLOGIES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn default_hob_output() -> PathBuf {
    PathBuf::from(DEFAULT_HOB_OUTPUT_FILE)
}

fn default_jif_file() -> PathBuf {
    PathBuf::from(DEFAULT_JIF_FILE)
}

fn default_observation_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_OBSERVATION_DATA_FILE)
}

fn default_observation_group() -> String {
    DEFAULT_OBSERVATION_GROUP.to_string()
}

fn default_expected_runtime() -> f64 {
    DEFAULT_EXPECTED_RUNTIME
}

fn default_runner_batch_file() -> PathBuf {
    PathBuf::from(DEFAULT_RUNNER_BATCH_FILE)
}

fn default_runner_table_file() -> PathBuf {
    PathBuf::from(DEFAULT_RUNNER_TABLE_FILE)
}

fn default_stress_periods() -> usize {
    1
}

fn default_column_multiplier() -> Option<ColumnMultiplier> {
    Some(ColumnMultiplier {
        layer: 2,
        start: 1.0,
        end: 9.0,
    })
}

fn default_river_geometry() -> Option<BoundaryGeometry> {
    Some(BoundaryGeometry {
        parameter: RIVER_CONDUCTIVITY_PARAMETER.to_string(),
        length: 1000.0,
        width: 10.0,
        thickness: 10.0,
    })
}

fn default_ghb_geometry() -> Option<BoundaryGeometry> {
    Some(BoundaryGeometry {
        parameter: GHB_CONDUCTIVITY_PARAMETER.to_string(),
        length: 1000.0,
        width: 50.0,
        thickness: 1000.0,
    })
}

fn default_model_summary_file() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_SUMMARY_FILE)
}
