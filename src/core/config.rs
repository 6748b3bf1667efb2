//! Benchmark configuration: the terraform command under test, the references
//! to benchmark, and where everything lives on disk.
//!
//! A `BenchConfig` is validated once, defaulted once, and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::{io, validation};

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_TERRAFORMRC: &str = "./.terraformrc";
pub const DEFAULT_TF_CONFIG_DIR: &str = ".";

// === Terraform command ===

/// The terraform subcommand being timed across references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TfCommand {
    Plan,
    Apply,
    Init,
    Destroy,
}

impl TfCommand {
    pub const ALL: [TfCommand; 4] = [
        TfCommand::Plan,
        TfCommand::Apply,
        TfCommand::Init,
        TfCommand::Destroy,
    ];

    /// Full argument vector, program first.
    pub fn argv(&self) -> &'static [&'static str] {
        match self {
            TfCommand::Plan => &["terraform", "plan"],
            TfCommand::Apply => &["terraform", "apply", "--auto-approve"],
            TfCommand::Init => &["terraform", "init"],
            TfCommand::Destroy => &["terraform", "destroy", "--auto-approve"],
        }
    }

    /// Read-only commands never touch state: no confirmation, no destroy before each run.
    pub fn is_read_only(&self) -> bool {
        matches!(self, TfCommand::Plan)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TfCommand::Plan => "plan",
            TfCommand::Apply => "apply",
            TfCommand::Init => "init",
            TfCommand::Destroy => "destroy",
        }
    }
}

impl fmt::Display for TfCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

impl FromStr for TfCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        TfCommand::ALL
            .into_iter()
            .find(|command| command.name() == normalized)
            .ok_or_else(|| {
                Error::config_invalid_value(
                    "command",
                    Some(s.to_string()),
                    format!("unrecognized terraform command '{}'", s),
                )
                .with_hint("Use one of: plan, apply, init, destroy")
            })
    }
}

// === Log level ===

/// Verbosity of progress logging. Ordered: `Quiet < Info < Debug`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quiet" => Ok(LogLevel::Quiet),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(Error::config_invalid_value(
                "logLevel",
                Some(s.to_string()),
                format!("unrecognized log level '{}'", s),
            )
            .with_hint("Use one of: quiet, info, debug")),
        }
    }
}

// === Configuration ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenchConfig {
    /// Terraform command to time.
    pub command: Option<TfCommand>,

    /// Commit hashes, tags, or branches, benchmarked in this order.
    pub references: Vec<String>,

    /// Path to the local provider checkout.
    pub project_path: String,

    /// Skip the interactive prompt before destructive operations.
    pub skip_destroy_confirmation: bool,

    pub log_level: LogLevel,

    /// Terraform CLI config file exported as `TF_CLI_CONFIG_FILE` (defaults to `./.terraformrc`).
    pub terraform_rc_file_path: String,

    /// Root of generated logs and results (defaults to `output`).
    pub output_dir: String,

    /// Directory holding the terraform configuration to run against (defaults to `.`).
    pub tf_config_dir: String,

    /// Branch to check out again after building any other reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_branch: Option<String>,

    /// Pause after each destroy before switching versions.
    pub settle_seconds: u64,
}

impl BenchConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_file(path, "read config")?;
        serde_json::from_str(&content)
            .map_err(|e| Error::config_invalid_json(path.to_string_lossy(), e))
    }

    /// Check every required field in order. Performs existence checks only.
    pub fn validate(&self) -> Result<()> {
        if self.command.is_none() {
            return Err(Error::config_missing_key("command")
                .with_hint("Use one of: plan, apply, init, destroy"));
        }
        validation::require_non_empty_vec(&self.references, "references")?;
        validation::require_non_empty(&self.project_path, "projectPath")?;
        validation::require_existing_path(&self.terraform_rc_file_path, "terraformRcFilePath")?;
        validation::require_existing_path(&self.tf_config_dir, "tfConfigDir")?;
        Ok(())
    }

    /// Fill empty fields with conventional values. Never overwrites a set field.
    pub fn apply_defaults(&mut self) {
        fill_if_empty(&mut self.output_dir, DEFAULT_OUTPUT_DIR);
        fill_if_empty(&mut self.terraform_rc_file_path, DEFAULT_TERRAFORMRC);
        fill_if_empty(&mut self.tf_config_dir, DEFAULT_TF_CONFIG_DIR);
    }

    /// Trim, validate, then default. Defaults are never applied to an invalid
    /// config.
    ///
    /// The terraformrc path ends up absolute: terraform runs in `tf_config_dir`
    /// and must see the same file that was validated.
    pub fn prepare(mut self) -> Result<Self> {
        self.trim_paths();
        self.validate()?;
        self.apply_defaults();
        self.terraform_rc_file_path =
            absolute(&self.terraform_rc_file_path, "terraformRcFilePath")?;
        Ok(self)
    }

    fn trim_paths(&mut self) {
        for field in [
            &mut self.project_path,
            &mut self.terraform_rc_file_path,
            &mut self.output_dir,
            &mut self.tf_config_dir,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }

    /// Expand `~` and `$VAR` in every path field.
    pub fn expand_paths(&mut self) -> Result<()> {
        expand(&mut self.project_path, "projectPath")?;
        expand(&mut self.terraform_rc_file_path, "terraformRcFilePath")?;
        expand(&mut self.output_dir, "outputDir")?;
        expand(&mut self.tf_config_dir, "tfConfigDir")?;
        Ok(())
    }

    /// The validated command. Only meaningful after `validate`.
    pub fn tf_command(&self) -> Result<TfCommand> {
        self.command
            .ok_or_else(|| Error::config_missing_key("command"))
    }
}

fn fill_if_empty(field: &mut String, default: &str) {
    if field.trim().is_empty() {
        *field = default.to_string();
    }
}

fn absolute(path: &str, key: &str) -> Result<String> {
    std::fs::canonicalize(path)
        .map(|p| p.to_string_lossy().to_string())
        .map_err(|_| Error::config_path_not_found(key, path))
}

fn expand(field: &mut String, key: &str) -> Result<()> {
    if field.is_empty() {
        return Ok(());
    }
    let expanded = shellexpand::full(field.as_str())
        .map_err(|e| Error::config_invalid_value(key, Some(field.clone()), e.to_string()))?
        .into_owned();
    *field = expanded;
    Ok(())
}
