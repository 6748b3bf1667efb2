//! Terraform invocations used by a benchmark run.
//!
//! `init` runs with the inherited environment. Destroy and the timed command
//! export `TF_CLI_CONFIG_FILE` so terraform picks up the sideloaded provider.

use std::path::Path;

use crate::config::TfCommand;
use crate::process::Invocation;

#[derive(Debug, Clone, Copy)]
pub struct Terraform<'a> {
    config_dir: &'a str,
    terraformrc: &'a str,
}

impl<'a> Terraform<'a> {
    pub fn new(config_dir: &'a str, terraformrc: &'a str) -> Self {
        Self {
            config_dir,
            terraformrc,
        }
    }

    pub fn init(&self, log: &Path) -> Invocation {
        Invocation::new(TfCommand::Init.argv(), self.config_dir).log_to(log)
    }

    pub fn destroy(&self, log: &Path) -> Invocation {
        self.with_overrides(TfCommand::Destroy, log)
    }

    pub fn benchmark(&self, command: TfCommand, log: &Path) -> Invocation {
        self.with_overrides(command, log)
    }

    fn with_overrides(&self, command: TfCommand, log: &Path) -> Invocation {
        Invocation::new(command.argv(), self.config_dir)
            .log_to(log)
            .with_tf_cli_config(self.terraformrc)
    }
}
