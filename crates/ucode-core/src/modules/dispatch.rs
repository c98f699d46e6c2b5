use super::TaskExecutor;
use super::model::ModelTask;
use super::observations::ObservationTask;
use super::parallel::ParallelTask;
use super::pdata::PdataTask;
use crate::common::config::WorkflowConfig;
use crate::domain::{TaskArtifact, TaskRequest, TaskResult, UcodeError, WorkflowTask};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskOptions {
    pub run_simulator: bool,
}

/// Whether `config` has a section for `task`. An empty section (`{}`) is
/// enough for observation and runner files, which default every setting.
pub fn task_configured(task: WorkflowTask, config: &WorkflowConfig) -> bool {
    match task {
        WorkflowTask::Pdata => config.parameters.is_some(),
        WorkflowTask::Observations => config.observations.is_some(),
        WorkflowTask::Parallel => config.parallel.is_some(),
        WorkflowTask::Model => config.model.is_some(),
    }
}

pub fn execute_task(
    config: &WorkflowConfig,
    request: &TaskRequest,
    options: TaskOptions,
) -> TaskResult<Vec<TaskArtifact>> {
    match request.task {
        WorkflowTask::Pdata => {
            let section = config
                .parameters
                .clone()
                .ok_or_else(|| missing_section(request.task, "parameters"))?;
            PdataTask::new(section).execute(request)
        }
        WorkflowTask::Observations => {
            ObservationTask::new(config.observations.clone().unwrap_or_default()).execute(request)
        }
        WorkflowTask::Parallel => {
            let parameter_count = match &config.parameters {
                Some(section) => {
                    let pdata_request =
                        TaskRequest::new(WorkflowTask::Pdata, request.workspace.clone());
                    Some(PdataTask::new(section.clone()).build_table(&pdata_request)?.0.len())
                }
                None => None,
            };
            ParallelTask::new(config.parallel.clone().unwrap_or_default())
                .with_parameter_count(parameter_count)
                .execute(request)
        }
        WorkflowTask::Model => {
            let section = config
                .model
                .clone()
                .ok_or_else(|| missing_section(request.task, "model"))?;
            ModelTask::new(section)
                .with_simulator_run(options.run_simulator)
                .execute(request)
        }
    }
}

fn missing_section(task: WorkflowTask, section: &str) -> UcodeError {
    UcodeError::input_validation(
        "INPUT.CONFIG_SECTION",
        format!("{} task needs a '{}' section in the workflow configuration", task, section),
    )
}
