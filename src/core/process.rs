//! External process execution.
//!
//! Every git, make and terraform call goes through a `CommandRunner`. The
//! runner blocks until the process exits; output never reaches our own
//! stdout/stderr, it is either written to a log file or discarded.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, ProcessFailedDetails, Result};

/// Environment variable terraform reads its CLI config file from.
pub const TF_CLI_CONFIG_FILE: &str = "TF_CLI_CONFIG_FILE";

/// Where combined stdout and stderr of a process go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Truncate-or-create the file and write both streams into it.
    File(PathBuf),
    Null,
}

/// One external command: program, arguments, working directory, output and
/// an optional extra environment variable on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub output: OutputTarget,
    pub env: Option<(String, String)>,
}

impl Invocation {
    /// Build from an argv whose first element is the program.
    pub fn new(argv: &[&str], dir: impl AsRef<Path>) -> Self {
        let (program, args) = argv.split_first().map_or(("", &[][..]), |(p, a)| (*p, a));
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            dir: dir.as_ref().to_path_buf(),
            output: OutputTarget::Null,
            env: None,
        }
    }

    pub fn log_to(mut self, path: impl AsRef<Path>) -> Self {
        self.output = OutputTarget::File(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env = Some((key.into(), value.into()));
        self
    }

    /// Point terraform at a specific CLI config file.
    pub fn with_tf_cli_config(self, terraformrc: &str) -> Self {
        self.with_env(TF_CLI_CONFIG_FILE, terraformrc)
    }

    /// Rendered command line, for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn log_path(&self) -> Option<String> {
        match &self.output {
            OutputTarget::File(path) => Some(path.to_string_lossy().to_string()),
            OutputTarget::Null => None,
        }
    }

    /// Build the `std::process::Command` without stdio wiring.
    ///
    /// The inherited environment is left untouched unless an overlay is set.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.dir);
        if let Some((key, value)) = &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Runs invocations to completion. The seam for stubbing external tools.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        let mut cmd = invocation.to_command();
        cmd.stdin(Stdio::null());

        match &invocation.output {
            OutputTarget::File(path) => {
                let file = File::create(path).map_err(|e| {
                    Error::internal_io(
                        e.to_string(),
                        Some(format!("open log file {}", path.display())),
                    )
                })?;
                let stderr = file.try_clone().map_err(|e| {
                    Error::internal_io(
                        e.to_string(),
                        Some(format!("clone log file {}", path.display())),
                    )
                })?;
                cmd.stdout(Stdio::from(file)).stderr(Stdio::from(stderr));
            }
            OutputTarget::Null => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        let status = cmd
            .status()
            .map_err(|e| Error::process_spawn_failed(invocation.display(), e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::process_failed(ProcessFailedDetails {
                command: invocation.display(),
                dir: invocation.dir.to_string_lossy().to_string(),
                exit_code: status.code(),
                log_path: invocation.log_path(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn has_env(cmd: &Command, key: &str) -> bool {
        cmd.get_envs().any(|(k, _)| k == OsStr::new(key))
    }

    #[test]
    fn invocation_splits_program_and_args() {
        let inv = Invocation::new(&["terraform", "apply", "--auto-approve"], "/tf");
        assert_eq!(inv.program, "terraform");
        assert_eq!(inv.args, vec!["apply", "--auto-approve"]);
        assert_eq!(inv.display(), "terraform apply --auto-approve");
    }

    #[test]
    fn to_command_sets_working_dir() {
        let inv = Invocation::new(&["terraform", "plan"], "/tf/config");
        let cmd = inv.to_command();
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tf/config")));
    }

    #[test]
    fn overlay_adds_tf_cli_config_file() {
        let inv = Invocation::new(&["terraform", "plan"], ".").with_tf_cli_config("/x/.terraformrc");
        let cmd = inv.to_command();

        let value = cmd
            .get_envs()
            .find(|(k, _)| *k == OsStr::new(TF_CLI_CONFIG_FILE))
            .and_then(|(_, v)| v);
        assert_eq!(value, Some(OsStr::new("/x/.terraformrc")));
    }

    #[test]
    fn plain_invocation_does_not_override_environment() {
        let cmd = Invocation::new(&["terraform", "init"], ".").to_command();
        assert!(!has_env(&cmd, TF_CLI_CONFIG_FILE));
        assert_eq!(cmd.get_envs().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_writes_both_streams_to_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("out.log");
        let inv = Invocation::new(&["sh", "-c", "echo out; echo err 1>&2"], dir.path()).log_to(&log);

        SystemRunner.run(&inv).unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.contains("out"));
        assert!(content.contains("err"));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_passes_overlay_to_child() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("env.log");
        let inv = Invocation::new(&["sh", "-c", "echo $TF_CLI_CONFIG_FILE"], dir.path())
            .log_to(&log)
            .with_tf_cli_config("/etc/custom.tfrc");

        SystemRunner.run(&inv).unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert_eq!(content.trim(), "/etc/custom.tfrc");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail.log");
        let inv = Invocation::new(&["sh", "-c", "exit 3"], dir.path()).log_to(&log);

        let err = SystemRunner.run(&inv).unwrap_err();
        assert_eq!(err.code.as_str(), "process.failed");
        assert_eq!(err.details["exitCode"], 3);
        assert_eq!(err.details["logPath"], log.to_string_lossy().to_string());
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let inv = Invocation::new(&["nonexistent_command_xyz"], ".");
        let err = SystemRunner.run(&inv).unwrap_err();
        assert_eq!(err.code.as_str(), "process.spawn_failed");
    }
}
