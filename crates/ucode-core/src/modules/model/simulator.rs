use crate::common::config::SimulatorConfig;
use crate::domain::{UcodeError, UcodeResult};
use std::path::Path;
use std::process::Command;

const NORMAL_TERMINATION: &str = "normal termination";

/// Runs the external groundwater simulator on the configured name file from
/// inside the model workspace.
pub fn run_simulator(config: &SimulatorConfig, workspace: &Path) -> UcodeResult<()> {
    let mut command = Command::new(&config.executable);
    command.current_dir(workspace).arg(&config.name_file);

    tracing::info!(
        executable = %config.executable.display(),
        name_file = %config.name_file,
        "launching simulator"
    );
    let output = command.output().map_err(|source| {
        UcodeError::io_system(
            "IO.SIMULATOR_EXEC",
            format!(
                "failed to execute simulator '{}': {}",
                config.executable.display(),
                source
            ),
        )
    })?;

    if !output.status.success() {
        let status_text = output.status.code().map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit code {}", code),
        );
        return Err(UcodeError::computation(
            "RUN.SIMULATOR",
            format!(
                "simulator '{}' failed with {}",
                config.executable.display(),
                status_text
            ),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.to_ascii_lowercase().contains(NORMAL_TERMINATION) {
        return Err(UcodeError::computation(
            "RUN.SIMULATOR",
            format!(
                "simulator '{}' exited without reporting normal termination",
                config.executable.display()
            ),
        ));
    }
    Ok(())
}
