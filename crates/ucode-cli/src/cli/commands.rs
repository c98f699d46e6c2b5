use super::CliError;
use super::helpers::*;
use std::path::PathBuf;
use ucode_core::common::config::DEFAULT_CONFIG_FILE;
use ucode_core::domain::WorkflowTask;
use ucode_core::modules::{TaskOptions, task_configured};

#[derive(clap::Args)]
pub(super) struct TaskArgs {
    /// Workflow configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub(super) config: PathBuf,

    /// Model workspace, overriding `modelWorkspace` from the configuration
    #[arg(long)]
    pub(super) workspace: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long)]
    pub(super) verbose: bool,
}

#[derive(clap::Args)]
pub(super) struct ParallelArgs {
    #[command(flatten)]
    common: TaskArgs,

    /// Requested runner count, capped at one less than the available CPUs
    #[arg(long)]
    nodes: Option<usize>,

    /// Expected runtime of one model run in seconds
    #[arg(long)]
    runtime: Option<f64>,
}

#[derive(clap::Args)]
pub(super) struct ModelArgs {
    #[command(flatten)]
    common: TaskArgs,

    /// Run the configured simulator after writing the model files
    #[arg(long)]
    run: bool,
}

pub(super) fn run_pdata_command(args: TaskArgs) -> Result<i32, CliError> {
    let context = load_task_context(&args)?;
    run_task(&context, WorkflowTask::Pdata, TaskOptions::default())?;
    Ok(0)
}

pub(super) fn run_observations_command(args: TaskArgs) -> Result<i32, CliError> {
    let context = load_task_context(&args)?;
    run_task(&context, WorkflowTask::Observations, TaskOptions::default())?;
    Ok(0)
}

pub(super) fn run_parallel_command(args: ParallelArgs) -> Result<i32, CliError> {
    if args.nodes == Some(0) {
        return Err(CliError::Usage(
            "Invalid node count '0'; expected a positive integer.".to_string(),
        ));
    }

    let mut context = load_task_context(&args.common)?;
    let parallel = context.config.parallel.get_or_insert_with(Default::default);
    if args.nodes.is_some() {
        parallel.nodes = args.nodes;
    }
    if let Some(runtime) = args.runtime {
        parallel.expected_runtime = runtime;
    }

    run_task(&context, WorkflowTask::Parallel, TaskOptions::default())?;
    Ok(0)
}

pub(super) fn run_model_command(args: ModelArgs) -> Result<i32, CliError> {
    let context = load_task_context(&args.common)?;
    let options = TaskOptions {
        run_simulator: args.run,
    };
    run_task(&context, WorkflowTask::Model, options)?;
    Ok(0)
}

pub(super) fn run_all_command(args: ModelArgs) -> Result<i32, CliError> {
    let context = load_task_context(&args.common)?;
    let options = TaskOptions {
        run_simulator: args.run,
    };

    let mut completed = 0;
    for task in WorkflowTask::workflow_order(options.run_simulator) {
        if !task_configured(task, &context.config) {
            println!("Skipping {} (not configured).", task);
            continue;
        }
        run_task(&context, task, options)?;
        completed += 1;
    }
    println!("Completed {} workflow tasks.", completed);
    Ok(0)
}
