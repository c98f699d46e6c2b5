//! MODFLOW layer-property and boundary configuration from a parameter table.
//!
//! The groundwater engine stays external: this module writes LPF arrays as
//! free-format external files, summarizes the package settings in JSON and
//! optionally launches the configured simulator.

mod boundary;
mod layers;
mod simulator;

pub use boundary::BoundaryConductance;
pub use layers::{LayerProperties, render_external_array};
pub use simulator::run_simulator;

use super::TaskExecutor;
use super::pdata::read_parameter_table;
use super::serialization::write_task_artifact;
use crate::common::config::{ModelConfig, ModelGrid};
use crate::common::constants::LPF_IPAKCB;
use crate::domain::{TaskArtifact, TaskRequest, UcodeError, UcodeResult, WorkflowTask};
use faer::Mat;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LpfFlags {
    pub layvka: i32,
    pub chani: i32,
    pub hani: i32,
    pub laytyp: i32,
    pub laywet: i32,
    pub ipakcb: i32,
}

impl Default for LpfFlags {
    fn default() -> Self {
        Self {
            layvka: 1,
            chani: 0,
            hani: 1,
            laytyp: 0,
            laywet: 0,
            ipakcb: LPF_IPAKCB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerArrayFiles {
    pub layer: usize,
    pub hk: PathBuf,
    pub vka: PathBuf,
    pub vkcb: PathBuf,
}

impl LayerArrayFiles {
    pub fn for_layer(layer: usize) -> Self {
        Self {
            layer,
            hk: PathBuf::from(format!("hk_layer{}.ref", layer)),
            vka: PathBuf::from(format!("vka_layer{}.ref", layer)),
            vkcb: PathBuf::from(format!("vkcb_layer{}.ref", layer)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPackageSummary {
    pub grid: ModelGrid,
    pub lpf: LpfFlags,
    pub arrays: Vec<LayerArrayFiles>,
    pub river: Option<BoundaryConductance>,
    pub ghb: Option<BoundaryConductance>,
}

impl ModelPackageSummary {
    pub fn to_json(&self) -> UcodeResult<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(|source| {
            UcodeError::internal(
                "SYS.MODEL_SUMMARY",
                format!("failed to serialize model summary: {}", source),
            )
        })?;
        json.push('\n');
        Ok(json)
    }
}

#[derive(Debug, Clone)]
pub struct ModelTask {
    config: ModelConfig,
    run_simulator: bool,
}

impl ModelTask {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            run_simulator: false,
        }
    }

    pub fn with_simulator_run(mut self, run_simulator: bool) -> Self {
        self.run_simulator = run_simulator;
        self
    }

    /// Builds the layer arrays and boundary conductances without touching disk
    /// beyond reading the parameter table.
    pub fn configure(
        &self,
        request: &TaskRequest,
    ) -> UcodeResult<(LayerProperties, ModelPackageSummary)> {
        let table = read_parameter_table(&request.resolve(&self.config.parameter_table))?;
        let grid = self.config.grid;

        let mut layers = LayerProperties::from_parameters(&table, grid)?;
        if let Some(multiplier) = &self.config.multiplier {
            layers.apply_column_multiplier(multiplier)?;
        }

        let river = self
            .config
            .river
            .as_ref()
            .map(|geometry| BoundaryConductance::from_parameters(&table, geometry, grid.nper))
            .transpose()?;
        let ghb = self
            .config
            .ghb
            .as_ref()
            .map(|geometry| BoundaryConductance::from_parameters(&table, geometry, grid.nper))
            .transpose()?;

        let summary = ModelPackageSummary {
            grid,
            lpf: LpfFlags::default(),
            arrays: (1..=grid.nlay).map(LayerArrayFiles::for_layer).collect(),
            river,
            ghb,
        };
        Ok((layers, summary))
    }
}

impl TaskExecutor for ModelTask {
    fn execute(&self, request: &TaskRequest) -> UcodeResult<Vec<TaskArtifact>> {
        if request.task != WorkflowTask::Model {
            return Err(UcodeError::input_validation(
                "INPUT.MODEL_TASK",
                format!("MODEL task expects MODEL, got {}", request.task),
            ));
        }

        let (layers, summary) = self.configure(request)?;
        let mut artifacts = Vec::with_capacity(summary.arrays.len() * 3 + 1);
        for files in &summary.arrays {
            let arrays: [(&PathBuf, Option<&Mat<f64>>); 3] = [
                (&files.hk, layers.hk(files.layer)),
                (&files.vka, layers.vka(files.layer)),
                (&files.vkcb, layers.vkcb(files.layer)),
            ];
            for (path, array) in arrays {
                let array = array.ok_or_else(|| {
                    UcodeError::internal(
                        "SYS.MODEL_LAYER",
                        format!("layer {} has no array for '{}'", files.layer, path.display()),
                    )
                })?;
                write_task_artifact(
                    &request.resolve(path),
                    &render_external_array(array),
                    "IO.MODEL_ARRAY_WRITE",
                )?;
                artifacts.push(TaskArtifact::new(path));
            }
        }

        write_task_artifact(
            &request.resolve(&self.config.summary_file),
            &summary.to_json()?,
            "IO.MODEL_SUMMARY_WRITE",
        )?;
        artifacts.push(TaskArtifact::new(&self.config.summary_file));

        if self.run_simulator {
            let simulator = self.config.simulator.as_ref().ok_or_else(|| {
                UcodeError::input_validation(
                    "INPUT.MODEL_SIMULATOR",
                    "simulator run requested but no simulator is configured",
                )
            })?;
            run_simulator(simulator, &request.workspace)?;
        }

        tracing::info!(
            layers = summary.grid.nlay,
            artifacts = artifacts.len(),
            "prepared MODFLOW layer and boundary configuration"
        );
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::ModelTask;
    use crate::common::config::{ModelConfig, ModelGrid};
    use crate::domain::{TaskRequest, WorkflowTask};
    use crate::modules::TaskExecutor;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    const PARAMETERS: &str = "layer,GroupName,ParamName,StartValue\n\
        1,hk,hk_1,1e-4\n1,vani,vani_1,10\n1,vkcb,vkcb_1,1e-8\n\
        2,hk,hk_2,2e-4\n2,vani,vani_2,5\n2,vkcb,vkcb_2,1e-9\n\
        ,riv,k_rb,1e-5\n,GHB,hk_hillside,2e-6\n";

    fn config() -> ModelConfig {
        ModelConfig::new(
            ModelGrid {
                nlay: 2,
                nrow: 2,
                ncol: 3,
                nper: 2,
            },
            "model_parameters.csv",
        )
    }

    #[test]
    fn execute_writes_arrays_and_summary() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(temp.path().join("model_parameters.csv"), PARAMETERS)
            .expect("parameters should be written");

        let request = TaskRequest::new(WorkflowTask::Model, temp.path());
        let artifacts = ModelTask::new(config())
            .execute(&request)
            .expect("model task should succeed");
        assert_eq!(artifacts.len(), 7);

        let hk2 = fs::read_to_string(temp.path().join("hk_layer2.ref")).expect("hk array");
        let first_row: Vec<f64> = hk2
            .lines()
            .next()
            .expect("first row")
            .split_whitespace()
            .map(|token| token.parse().expect("numeric field"))
            .collect();
        assert_eq!(first_row.len(), 3);
        assert!((first_row[0] - 2.0e-4).abs() < 1.0e-12);
        assert!((first_row[2] - 1.8e-3).abs() < 1.0e-12);

        let summary: Value = serde_json::from_str(
            &fs::read_to_string(temp.path().join("model_packages.json")).expect("summary"),
        )
        .expect("summary should be JSON");
        assert_eq!(summary["lpf"]["layvka"], 1);
        assert_eq!(summary["lpf"]["ipakcb"], 53);
        assert_eq!(summary["arrays"][1]["vkcb"], "vkcb_layer2.ref");
        assert_eq!(summary["river"]["periods"].as_array().map(Vec::len), Some(2));
        let ghb = summary["ghb"]["conductance"].as_f64().expect("ghb conductance");
        assert!((ghb - 1.0e-4).abs() < 1.0e-15);
    }

    #[test]
    fn simulator_run_requires_configuration() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(temp.path().join("model_parameters.csv"), PARAMETERS)
            .expect("parameters should be written");
        let request = TaskRequest::new(WorkflowTask::Model, temp.path());
        let error = ModelTask::new(config())
            .with_simulator_run(true)
            .execute(&request)
            .expect_err("no simulator configured");
        assert_eq!(error.placeholder(), "INPUT.MODEL_SIMULATOR");
    }

    #[test]
    fn missing_boundary_parameter_fails_before_writing() {
        let temp = TempDir::new().expect("tempdir should be created");
        let without_ghb = PARAMETERS.replace(",GHB,hk_hillside,2e-6\n", "");
        fs::write(temp.path().join("model_parameters.csv"), without_ghb)
            .expect("parameters should be written");
        let request = TaskRequest::new(WorkflowTask::Model, temp.path());
        let error = ModelTask::new(config())
            .execute(&request)
            .expect_err("hk_hillside missing");
        assert!(error.message().contains("hk_hillside"));
        assert!(!temp.path().join("model_packages.json").exists());
    }
}
