//! Benchmark run orchestration.
//!
//! A run walks a fixed sequence:
//!
//! 1. validate and default the configuration
//! 2. create the output skeleton (`logs/`, `performance/`, empty log files)
//! 3. `terraform init` once, logged to `init.log`
//! 4. ask for confirmation once, unless skipped or the command is read-only
//! 5. for each reference, in order: destroy (skipped for read-only commands),
//!    switch the provider version, then time the benchmark command
//! 6. write every record to `data.json` in one step
//!
//! Any failure aborts the run immediately. Records gathered before the failure
//! are discarded, so `data.json` only ever exists after a complete run.

use chrono::Utc;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{BenchConfig, TfCommand};
use crate::confirm;
use crate::error::{Result, Stage};
use crate::layout::OutputLayout;
use crate::logging;
use crate::process::{CommandRunner, SystemRunner};
use crate::results::{self, ResultRecord};
use crate::switcher::VersionSwitcher;
use crate::terraform::Terraform;

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub command: TfCommand,
    pub results_path: PathBuf,
    pub records: Vec<ResultRecord>,
    pub total_duration: f64,
    pub started_at: String,
    pub finished_at: String,
}

/// A prepared benchmark: validated configuration, resolved layout, a runner
/// for external commands and an input source for the confirmation prompt.
pub struct Benchmark<R: CommandRunner = SystemRunner> {
    config: BenchConfig,
    command: TfCommand,
    layout: OutputLayout,
    runner: R,
    input: Box<dyn BufRead>,
    prompt_output: Box<dyn Write>,
}

impl Benchmark<SystemRunner> {
    /// Validate and default `config`. Nothing touches the filesystem yet.
    pub fn new(config: BenchConfig) -> Result<Self> {
        let config = config.prepare().map_err(|e| e.at_stage(Stage::Validation))?;
        let command = config.tf_command()?;
        let layout = OutputLayout::resolve(&config.output_dir);

        Ok(Self {
            config,
            command,
            layout,
            runner: SystemRunner,
            input: Box::new(io::BufReader::new(io::stdin())),
            prompt_output: Box::new(io::stderr()),
        })
    }
}

impl<R: CommandRunner> Benchmark<R> {
    pub fn with_runner<T: CommandRunner>(self, runner: T) -> Benchmark<T> {
        Benchmark {
            config: self.config,
            command: self.command,
            layout: self.layout,
            runner,
            input: self.input,
            prompt_output: self.prompt_output,
        }
    }

    /// Read the confirmation answer from `input` and write the prompt to `output`.
    pub fn with_prompt(
        mut self,
        input: impl BufRead + 'static,
        output: impl Write + 'static,
    ) -> Self {
        self.input = Box::new(input);
        self.prompt_output = Box::new(output);
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Execute the whole run with logging scoped to the configured level.
    pub fn run(&mut self) -> Result<RunSummary> {
        let level = self.config.log_level;
        logging::with_level(level, || self.execute())
    }

    fn execute(&mut self) -> Result<RunSummary> {
        let started_at = Utc::now().to_rfc3339();
        tracing::info!(
            "Starting benchmark of '{}' with {} references",
            self.command,
            self.config.references.len()
        );

        tracing::info!("🏗️ Creating output directories");
        self.layout
            .prepare(&self.config.references)
            .map_err(|e| e.at_stage(Stage::Setup))?;

        let terraform = Terraform::new(
            &self.config.tf_config_dir,
            &self.config.terraform_rc_file_path,
        );

        tracing::info!(
            "Running terraform init in directory {}",
            self.config.tf_config_dir
        );
        self.runner
            .run(&terraform.init(&self.layout.init_log))
            .map_err(|e| e.at_stage(Stage::Init))?;

        if confirm::should_skip(&self.config) {
            tracing::debug!("Skipping destructive operation confirmation");
        } else {
            confirm::confirm(self.input.as_mut(), self.prompt_output.as_mut())
                .map_err(|e| e.at_stage(Stage::Confirmation))?;
        }

        let switcher = VersionSwitcher::new(&self.runner, &self.config.project_path)
            .restoring(self.config.restore_branch.clone());
        let total = self.config.references.len();
        let mut records = Vec::with_capacity(total);

        for (i, reference) in self.config.references.iter().enumerate() {
            tracing::info!(
                "Starting benchmark for reference {} ({}/{})",
                reference,
                i + 1,
                total
            );

            if self.command.is_read_only() {
                tracing::debug!("Skipping destroy for read-only command");
            } else {
                tracing::info!(
                    "🔥 Running terraform destroy in directory {}",
                    self.config.tf_config_dir
                );
                self.runner
                    .run(&terraform.destroy(&self.layout.destroy_log))
                    .map_err(|e| e.at_stage(Stage::Destroy))?;
                tracing::info!("🔥 Destroy successful");

                if self.config.settle_seconds > 0 {
                    tracing::debug!("Sleeping for {} seconds", self.config.settle_seconds);
                    std::thread::sleep(Duration::from_secs(self.config.settle_seconds));
                }
            }

            switcher
                .switch_to(reference)
                .map_err(|e| e.at_stage(Stage::Switch))?;

            let log = self.layout.reference_log(reference);
            tracing::info!(
                "⌛️ Running {} for version {} in directory {}",
                self.command,
                reference,
                self.config.tf_config_dir
            );
            let start = Instant::now();
            self.runner
                .run(&terraform.benchmark(self.command, &log))
                .map_err(|e| e.at_stage(Stage::Command))?;
            let duration = start.elapsed().as_secs_f64();

            tracing::info!("Completed reference {} in {:.2} seconds", reference, duration);
            records.push(ResultRecord {
                version: reference.clone(),
                duration,
            });
        }

        results::write_results(&self.layout.results_file, &records)
            .map_err(|e| e.at_stage(Stage::Persist))?;

        let total_duration: f64 = records.iter().map(|r| r.duration).sum();
        tracing::info!(
            "Benchmark completed successfully: {} references in {:.2} seconds",
            records.len(),
            total_duration
        );

        Ok(RunSummary {
            command: self.command,
            results_path: self.layout.results_file.clone(),
            records,
            total_duration,
            started_at,
            finished_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Validate `config` and run it against the real toolchain.
pub fn run(config: BenchConfig) -> Result<RunSummary> {
    Benchmark::new(config)?.run()
}
