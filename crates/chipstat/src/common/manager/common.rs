use anyhow::Context;
use bstr::ByteSlice;
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::common::error::ChipstatError;

/// Fails with [`ChipstatError::MissingTool`] if `program` cannot be found in `PATH`.
pub fn check_tool_available(program: &str) -> crate::Result<PathBuf> {
    which::which(program).map_err(|_| ChipstatError::MissingTool(program.to_string()))
}

pub fn create_command(arguments: &[&str]) -> Command {
    let mut command = Command::new(arguments[0]);
    command.args(&arguments[1..]);
    command
}

pub fn check_command_output(output: Output) -> anyhow::Result<Output> {
    let status = output.status;
    if !status.success() {
        return Err(anyhow::anyhow!(
            "Exit code: {}\nStderr: {}\nStdout: {}",
            status.code().unwrap_or(-1),
            output.stderr.to_str_lossy().trim(),
            output.stdout.to_str_lossy().trim()
        ));
    }
    Ok(output)
}

/// Runs a command and returns its standard output.
/// This function is blocking.
pub fn run_command(arguments: &[&str]) -> anyhow::Result<String> {
    let program = arguments[0];
    log::debug!("Running command `{}`", arguments.join(" "));

    let output = create_command(arguments)
        .output()
        .with_context(|| format!("{program} start failed"))?;
    let output =
        check_command_output(output).with_context(|| format!("{program} execution failed"))?;
    Ok(output.stdout.to_str_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::{check_tool_available, run_command};
    use crate::common::error::ChipstatError;

    #[test]
    fn test_missing_tool() {
        let result = check_tool_available("chipstat-surely-missing-tool");
        assert!(matches!(
            result,
            Err(ChipstatError::MissingTool(name)) if name == "chipstat-surely-missing-tool"
        ));
    }

    #[test]
    fn test_run_command_stdout() {
        let output = run_command(&["echo", "W62F3"]).unwrap();
        assert_eq!(output.trim(), "W62F3");
    }

    #[test]
    fn test_run_command_failure() {
        let error = run_command(&["false"]).unwrap_err();
        assert_eq!(error.to_string(), "false execution failed");
    }
}
