//! Switch the provider checkout to a reference and sideload the build.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::process::{CommandRunner, Invocation};

const SIDELOAD_TARGET: &str = "sideload";

/// Checks out references in the provider repository and installs them with `make sideload`.
pub struct VersionSwitcher<'r, R: CommandRunner> {
    runner: &'r R,
    project_path: PathBuf,
    restore_branch: Option<String>,
}

impl<'r, R: CommandRunner> VersionSwitcher<'r, R> {
    pub fn new(runner: &'r R, project_path: impl AsRef<Path>) -> Self {
        Self {
            runner,
            project_path: project_path.as_ref().to_path_buf(),
            restore_branch: None,
        }
    }

    /// After building any reference other than `branch`, check `branch` out again.
    pub fn restoring(mut self, branch: Option<String>) -> Self {
        self.restore_branch = branch.filter(|b| !b.trim().is_empty());
        self
    }

    /// Check out `reference` and sideload it. No rollback on failure.
    pub fn switch_to(&self, reference: &str) -> Result<()> {
        tracing::info!(
            "Checking out reference {} in {}",
            reference,
            self.project_path.display()
        );
        self.checkout(reference)
            .map_err(|e| Error::switch_checkout_failed(reference, e))?;

        tracing::info!("Running make {} in {}", SIDELOAD_TARGET, self.project_path.display());
        self.runner
            .run(&Invocation::new(&["make", SIDELOAD_TARGET], &self.project_path))
            .map_err(|e| Error::switch_build_failed(reference, e))?;

        if let Some(branch) = self.restore_branch.as_deref() {
            if branch != reference {
                tracing::debug!("Checking out {} after sideload", branch);
                self.checkout(branch)
                    .map_err(|e| Error::switch_restore_failed(branch, e))?;
            }
        }

        Ok(())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.runner.run(&Invocation::new(
            &["git", "checkout", reference],
            &self.project_path,
        ))
    }
}
