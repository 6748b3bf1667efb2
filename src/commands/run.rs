use clap::Args;
use std::path::PathBuf;

use tfbench::bench::{self, RunSummary};
use tfbench::config::{BenchConfig, LogLevel, TfCommand, DEFAULT_TERRAFORMRC, DEFAULT_TF_CONFIG_DIR};

use crate::commands::CmdResult;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// JSON config file (camelCase keys). Flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Terraform command to benchmark: plan, apply, init or destroy
    #[arg(short, long)]
    pub command: Option<TfCommand>,

    /// Commit hash, tag or branch to benchmark (repeatable, run in order)
    #[arg(short = 'r', long = "reference", value_name = "REF")]
    pub references: Vec<String>,

    /// Path to the local provider checkout
    #[arg(long, value_name = "DIR")]
    pub project_path: Option<String>,

    /// Terraform CLI config file exported as TF_CLI_CONFIG_FILE [default: ./.terraformrc]
    #[arg(long = "terraformrc", value_name = "FILE")]
    pub terraform_rc_file_path: Option<String>,

    /// Directory with the terraform configuration to run against [default: .]
    #[arg(long, value_name = "DIR")]
    pub tf_config_dir: Option<String>,

    /// Root directory for logs and results [default: output]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Do not ask before destructive operations
    #[arg(long)]
    pub skip_confirmation: bool,

    /// Progress verbosity: quiet, info or debug
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Branch to check out again after building each other reference
    #[arg(long, value_name = "BRANCH")]
    pub restore_branch: Option<String>,

    /// Seconds to wait after each destroy
    #[arg(long, value_name = "SECONDS")]
    pub settle_seconds: Option<u64>,
}

impl RunArgs {
    /// Merge the config file (if any) with flags. Flags win.
    pub fn into_config(self) -> tfbench::Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };

        if self.command.is_some() {
            config.command = self.command;
        }
        if !self.references.is_empty() {
            config.references = self.references;
        }
        if let Some(path) = self.project_path {
            config.project_path = path;
        }
        if let Some(path) = self.terraform_rc_file_path {
            config.terraform_rc_file_path = path;
        }
        if let Some(dir) = self.tf_config_dir {
            config.tf_config_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if self.skip_confirmation {
            config.skip_destroy_confirmation = true;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.restore_branch.is_some() {
            config.restore_branch = self.restore_branch;
        }
        if let Some(seconds) = self.settle_seconds {
            config.settle_seconds = seconds;
        }

        // The CLI falls back to the conventional locations; validation still
        // requires them to exist.
        if config.terraform_rc_file_path.trim().is_empty() {
            config.terraform_rc_file_path = DEFAULT_TERRAFORMRC.to_string();
        }
        if config.tf_config_dir.trim().is_empty() {
            config.tf_config_dir = DEFAULT_TF_CONFIG_DIR.to_string();
        }

        config.expand_paths()?;
        Ok(config)
    }
}

pub fn run(args: RunArgs) -> CmdResult<RunSummary> {
    bench::run(args.into_config()?)
}
