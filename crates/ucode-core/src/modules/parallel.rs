//! Static dispatch files for UCODE parallel runners.
//!
//! Nothing here runs concurrently: the batch script and the
//! `Parallel_Runners` table are consumed later by UCODE and the runner
//! processes it launches.

use super::TaskExecutor;
use super::serialization::{format_table_value, write_task_artifact};
use super::table::FixedWidthTable;
use crate::common::config::ParallelConfig;
use crate::common::constants::RUNNER_TABLE_LABEL;
use crate::domain::{
    RunnerDescriptor, TaskArtifact, TaskRequest, UcodeError, UcodeResult, WorkflowTask,
};

pub const RUNNER_COLUMN_LABELS: [&str; 3] = ["RunnerName", "RunnerDir", "RunTime"];

/// `min(requested, available_cpus - 1)`, keeping at least one runner.
pub fn node_count(requested: usize, available_cpus: usize) -> usize {
    requested
        .min(available_cpus.saturating_sub(1))
        .max(1)
}

pub fn available_node_count(requested: usize) -> usize {
    node_count(requested, num_cpus::get())
}

/// Whole seconds print without a fractional part (`600`, not `600.0`).
pub fn format_runtime(seconds: f64) -> String {
    if seconds.fract() == 0.0 && seconds.abs() < 1.0e15 {
        format!("{}", seconds as i64)
    } else {
        format_table_value(seconds)
    }
}

pub fn runner_directory(index: usize) -> String {
    format!("r{:03}\\", index)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerPlan {
    runners: Vec<RunnerDescriptor>,
}

impl RunnerPlan {
    pub fn new(n_nodes: usize, expected_runtime: f64) -> UcodeResult<Self> {
        if n_nodes == 0 {
            return Err(UcodeError::input_validation(
                "INPUT.RUNNER_COUNT",
                "parallel runner count must be at least 1",
            ));
        }
        if !expected_runtime.is_finite() || expected_runtime <= 0.0 {
            return Err(UcodeError::input_validation(
                "INPUT.RUNNER_RUNTIME",
                format!(
                    "expected runtime must be a positive number of seconds, got {}",
                    expected_runtime
                ),
            ));
        }

        let runners = (0..n_nodes)
            .map(|index| RunnerDescriptor {
                name: format!("Runner{:03}", index),
                directory: runner_directory(index),
                run_time: expected_runtime,
            })
            .collect();
        Ok(Self { runners })
    }

    pub fn runners(&self) -> &[RunnerDescriptor] {
        &self.runners
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Windows batch script that walks the runner directories, launching one
    /// minimized runner in each.
    pub fn render_batch_script(&self) -> String {
        let mut out = String::new();
        for (index, runner) in self.runners.iter().enumerate() {
            if index == 0 {
                out.push_str(&format!("cd {}\n", runner.directory));
            } else {
                out.push_str(&format!("cd ..\\{}\n", runner.directory));
            }
            out.push_str(&format!("Start \"Runner {:03}\" /min runner\n", index));
        }
        out
    }

    pub fn descriptor_table(&self) -> UcodeResult<FixedWidthTable> {
        let mut table = FixedWidthTable::new(RUNNER_TABLE_LABEL, RUNNER_COLUMN_LABELS);
        for runner in &self.runners {
            table.push_row([
                runner.name.clone(),
                runner.directory.clone(),
                format_runtime(runner.run_time),
            ])?;
        }
        Ok(table)
    }
}

#[derive(Debug, Clone)]
pub struct ParallelTask {
    config: ParallelConfig,
    parameter_count: Option<usize>,
}

impl ParallelTask {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            config,
            parameter_count: None,
        }
    }

    /// Number of estimated parameters, used as the runner request when
    /// `nodes` is unset.
    pub fn with_parameter_count(mut self, parameter_count: Option<usize>) -> Self {
        self.parameter_count = parameter_count;
        self
    }

    pub fn plan(&self) -> UcodeResult<RunnerPlan> {
        let requested = self
            .config
            .nodes
            .or(self.parameter_count)
            .unwrap_or(usize::MAX);
        let nodes = available_node_count(requested);
        if self.config.nodes.is_some() && nodes < requested {
            tracing::warn!(
                requested,
                nodes,
                "capped parallel runners to leave one CPU free"
            );
        }
        RunnerPlan::new(nodes, self.config.expected_runtime)
    }
}

impl TaskExecutor for ParallelTask {
    fn execute(&self, request: &TaskRequest) -> UcodeResult<Vec<TaskArtifact>> {
        if request.task != WorkflowTask::Parallel {
            return Err(UcodeError::input_validation(
                "INPUT.PARALLEL_TASK",
                format!("PARALLEL task expects PARALLEL, got {}", request.task),
            ));
        }

        let plan = self.plan()?;
        write_task_artifact(
            &request.resolve(&self.config.batch_file),
            &plan.render_batch_script(),
            "IO.RUNNER_BATCH_WRITE",
        )?;
        write_task_artifact(
            &request.resolve(&self.config.table_file),
            &plan.descriptor_table()?.render(),
            "IO.RUNNER_TABLE_WRITE",
        )?;

        tracing::info!(runners = plan.len(), "prepared UCODE parallel runner files");
        Ok(vec![
            TaskArtifact::new(&self.config.batch_file),
            TaskArtifact::new(&self.config.table_file),
        ])
    }
}
