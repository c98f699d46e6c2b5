mod parser;

pub use parser::parse_hob_output;

use super::TaskExecutor;
use super::serialization::{format_table_value, read_task_input, write_task_artifact};
use super::table::FixedWidthTable;
use crate::common::config::ObservationConfig;
use crate::common::constants::OBSERVATION_TABLE_LABEL;
use crate::domain::{
    ObservationTable, TaskArtifact, TaskRequest, UcodeError, UcodeResult, WorkflowTask,
};
use std::path::Path;

pub const OBSERVATION_COLUMN_LABELS: [&str; 3] = ["ObsName", "GroupName", "ObsValue"];
pub const STATISTIC_COLUMN_LABELS: [&str; 2] = ["Statistic", "StatFlag"];

/// UCODE `StandardFile` instruction: skip the HOB header line, read the
/// simulated equivalents from column 1, one per listed name.
pub fn render_jif(table: &ObservationTable) -> String {
    let mut out = String::from("jif @\n");
    out.push_str(&format!("StandardFile  1  1  {}\n", table.len()));
    for name in table.names() {
        out.push_str(name);
        out.push('\n');
    }
    out
}

pub fn observation_data_table(
    table: &ObservationTable,
    include_statistics: bool,
) -> UcodeResult<FixedWidthTable> {
    let mut columns = OBSERVATION_COLUMN_LABELS.to_vec();
    if include_statistics {
        columns.extend(STATISTIC_COLUMN_LABELS);
    }

    let mut data = FixedWidthTable::new(OBSERVATION_TABLE_LABEL, columns);
    for record in table.records() {
        let mut fields = vec![
            record.name.clone(),
            record.group.clone(),
            format_table_value(record.observed_value),
        ];
        if include_statistics {
            let (Some(statistic), Some(flag)) = (record.statistic, record.stat_flag.as_ref())
            else {
                return Err(UcodeError::input_validation(
                    "INPUT.OBS_STATISTIC",
                    format!(
                        "observation '{}' has no Statistic/StatFlag and no default is configured",
                        record.name
                    ),
                ));
            };
            fields.push(format_table_value(statistic));
            fields.push(flag.clone());
        }
        data.push_row(fields)?;
    }
    Ok(data)
}

/// Writes the `.jif` index and the `Observation_Data` table under `dir`,
/// listing names in the same order.
pub fn write_observation_files(
    dir: &Path,
    table: &ObservationTable,
    config: &ObservationConfig,
) -> UcodeResult<Vec<TaskArtifact>> {
    if table.is_empty() {
        return Err(UcodeError::input_validation(
            "INPUT.OBS_EMPTY",
            format!(
                "no observations to write for '{}'",
                dir.join(&config.hob_output).display()
            ),
        ));
    }

    let data = observation_data_table(table, config.include_statistics)?;
    write_task_artifact(&dir.join(&config.index_file), &render_jif(table), "IO.JIF_WRITE")?;
    write_task_artifact(&dir.join(&config.data_file), &data.render(), "IO.OBS_DATA_WRITE")?;
    Ok(vec![
        TaskArtifact::new(&config.index_file),
        TaskArtifact::new(&config.data_file),
    ])
}

/// Reads the HOB output listing and writes the paired `.jif` index and
/// `Observation_Data` table.
#[derive(Debug, Clone)]
pub struct ObservationTask {
    config: ObservationConfig,
}

impl ObservationTask {
    pub fn new(config: ObservationConfig) -> Self {
        Self { config }
    }

    pub fn load_observations(&self, request: &TaskRequest) -> UcodeResult<ObservationTable> {
        let path = request.resolve(&self.config.hob_output);
        let source = read_task_input(&path, "IO.HOB_READ")?;
        let mut table = parse_hob_output(&source, &self.config.group_name)
            .map_err(|error| error.in_file(path.display()))?;

        for record in table.records_mut() {
            if record.statistic.is_none() {
                record.statistic = self.config.default_statistic;
            }
            if record.stat_flag.is_none() {
                record.stat_flag = self.config.default_stat_flag.clone();
            }
        }
        Ok(table)
    }
}

impl TaskExecutor for ObservationTask {
    fn execute(&self, request: &TaskRequest) -> UcodeResult<Vec<TaskArtifact>> {
        if request.task != WorkflowTask::Observations {
            return Err(UcodeError::input_validation(
                "INPUT.OBS_TASK",
                format!("OBSERVATIONS task expects OBSERVATIONS, got {}", request.task),
            ));
        }

        let table = self.load_observations(request)?;
        let artifacts = write_observation_files(&request.workspace, &table, &self.config)?;
        tracing::info!(observations = table.len(), "prepared UCODE observation files");
        Ok(artifacts)
    }
}
