use super::CliError;
use super::commands::TaskArgs;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use ucode_core::common::config::{WorkflowConfig, WorkflowConfigError, load_workflow_config};
use ucode_core::domain::{TaskArtifact, TaskRequest, UcodeError, WorkflowTask};
use ucode_core::modules::{TaskOptions, execute_task};

pub(super) struct TaskContext {
    pub(super) config: WorkflowConfig,
    pub(super) workspace: PathBuf,
}

/// Starts logging, loads the workflow configuration and settles the model
/// workspace every task resolves its paths against.
pub(super) fn load_task_context(args: &TaskArgs) -> Result<TaskContext, CliError> {
    init_logging(args.verbose);

    let working_dir = current_working_dir().map_err(CliError::Task)?;
    let config_path = resolve_cli_path(&working_dir, &args.config);
    // Malformed JSON is bad input; an unreadable file stays an I/O failure.
    let config = match load_workflow_config(&config_path) {
        Err(error @ WorkflowConfigError::Parse { .. }) => {
            return Err(CliError::Task(UcodeError::input_validation(
                "INPUT.CONFIG_PARSE",
                error.to_string(),
            )));
        }
        result => result.with_context(|| {
            format!("failed to load workflow configuration '{}'", config_path.display())
        })?,
    };

    // A relative `modelWorkspace` is taken from the configuration file's directory.
    let workspace = match &args.workspace {
        Some(workspace) => resolve_cli_path(&working_dir, workspace),
        None => {
            let config_dir = config_path.parent().unwrap_or(working_dir.as_path());
            resolve_cli_path(config_dir, &config.model_workspace)
        }
    };
    tracing::debug!(
        config = %config_path.display(),
        workspace = %workspace.display(),
        "loaded workflow configuration"
    );

    Ok(TaskContext { config, workspace })
}

pub(super) fn run_task(
    context: &TaskContext,
    task: WorkflowTask,
    options: TaskOptions,
) -> Result<Vec<TaskArtifact>, CliError> {
    println!("Running {}...", task);
    let request = TaskRequest::new(task, &context.workspace);
    let artifacts = execute_task(&context.config, &request, options).map_err(CliError::Task)?;
    for artifact in &artifacts {
        println!("  wrote {}", artifact.relative_path.display());
    }
    println!("{} completed ({} artifacts).", task, artifacts.len());
    Ok(artifacts)
}

pub(super) fn current_working_dir() -> Result<PathBuf, UcodeError> {
    std::env::current_dir().map_err(|source| {
        UcodeError::io_system(
            "IO.CLI_CURRENT_DIR",
            format!("failed to read current working directory: {}", source),
        )
    })
}

pub(super) fn resolve_cli_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    // Ignored when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
