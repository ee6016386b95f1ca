use std::process::Command;

use tracing::info;

use super::GateError;

/// Command the gate runs once every target is reachable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl GateCommand {
    /// Build from an argv-style list; the first element is the program
    pub fn from_argv(argv: Vec<String>) -> Result<Self, GateError> {
        let mut iter = argv.into_iter();
        let program = iter.next().ok_or(GateError::NoCommand)?;

        Ok(Self {
            program,
            args: iter.collect(),
        })
    }
}

/// Starts the gated command
pub trait Launcher: Send + Sync {
    /// Run the command, returning its exit code
    fn launch(&self, command: &GateCommand) -> Result<i32, GateError>;
}

/// Replaces the current process with the command on Unix, so the
/// entrypoint's PID and signals belong to the command; elsewhere it spawns
/// the command and forwards its exit code.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecLauncher;

impl Launcher for ExecLauncher {
    #[cfg(unix)]
    fn launch(&self, command: &GateCommand) -> Result<i32, GateError> {
        use std::os::unix::process::CommandExt;

        info!(program = %command.program, args = ?command.args, "Executing command");

        // exec only returns on failure
        let source = Command::new(&command.program).args(&command.args).exec();

        Err(GateError::Spawn {
            program: command.program.clone(),
            source,
        })
    }

    #[cfg(not(unix))]
    fn launch(&self, command: &GateCommand) -> Result<i32, GateError> {
        info!(program = %command.program, args = ?command.args, "Spawning command");

        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .map_err(|source| GateError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_argv() {
        let cmd = GateCommand::from_argv(vec![
            "sh".to_string(),
            "./scripts/start.sh".to_string(),
        ])
        .unwrap();

        assert_eq!(cmd.program, "sh");
        assert_eq!(cmd.args, vec!["./scripts/start.sh".to_string()]);
    }

    #[test]
    fn test_command_requires_program() {
        assert!(matches!(
            GateCommand::from_argv(vec![]),
            Err(GateError::NoCommand)
        ));
    }

    #[test]
    fn test_exec_missing_program_fails() {
        let cmd = GateCommand::from_argv(vec!["/nonexistent/facility-binary".to_string()]).unwrap();
        let err = ExecLauncher.launch(&cmd).unwrap_err();

        assert!(matches!(err, GateError::Spawn { .. }));
    }
}
