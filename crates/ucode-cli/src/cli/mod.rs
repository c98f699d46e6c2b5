mod commands;
mod helpers;

use clap::Parser;
use ucode_core::domain::UcodeError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let task_error = error.as_ucode_error();
            eprintln!("{}", task_error.diagnostic_line());
            eprintln!("{}", task_error.exit_line());
            task_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("ucode-prep".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    match Cli::try_parse_from(&full_args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "ucode-prep",
    version,
    about = "Prepare UCODE input files and MODFLOW configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Write the Parameter_Data table (and the facies variant when configured)
    Pdata(commands::TaskArgs),
    /// Write the observation index and Observation_Data table from HOB output
    Observations(commands::TaskArgs),
    /// Write the parallel runner batch script and Parallel_Runners table
    Parallel(commands::ParallelArgs),
    /// Write LPF arrays and boundary conductances, optionally running the simulator
    Model(commands::ModelArgs),
    /// Run every configured task in order
    All(commands::ModelArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Pdata(args) => commands::run_pdata_command(args),
        CliCommand::Observations(args) => commands::run_observations_command(args),
        CliCommand::Parallel(args) => commands::run_parallel_command(args),
        CliCommand::Model(args) => commands::run_model_command(args),
        CliCommand::All(args) => commands::run_all_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Task(UcodeError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_ucode_error(&self) -> UcodeError {
        match self {
            Self::Usage(message) => {
                UcodeError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Task(error) => error.clone(),
            Self::Internal(error) => UcodeError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
