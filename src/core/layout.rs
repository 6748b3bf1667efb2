//! Output layout derived from the configured output directory.
//!
//! ```text
//! <output_dir>/
//!   logs/
//!     <reference with '.' replaced by '_'>.log
//!     destroy.log
//!     init.log
//!   performance/
//!     data.json
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::io;

pub const LOGS_DIR_NAME: &str = "logs";
pub const PERFORMANCE_DIR_NAME: &str = "performance";
pub const DESTROY_LOG_FILE_NAME: &str = "destroy.log";
pub const INIT_LOG_FILE_NAME: &str = "init.log";
pub const RESULTS_FILE_NAME: &str = "data.json";

/// Every path a run writes to, computed once from the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub logs_dir: PathBuf,
    pub performance_dir: PathBuf,
    pub destroy_log: PathBuf,
    pub init_log: PathBuf,
    pub results_file: PathBuf,
}

impl OutputLayout {
    pub fn resolve(output_dir: impl AsRef<Path>) -> Self {
        let root = output_dir.as_ref().to_path_buf();
        let logs_dir = root.join(LOGS_DIR_NAME);
        let performance_dir = root.join(PERFORMANCE_DIR_NAME);

        Self {
            destroy_log: logs_dir.join(DESTROY_LOG_FILE_NAME),
            init_log: logs_dir.join(INIT_LOG_FILE_NAME),
            results_file: performance_dir.join(RESULTS_FILE_NAME),
            root,
            logs_dir,
            performance_dir,
        }
    }

    /// Log file receiving the benchmark command output for `reference`.
    pub fn reference_log(&self, reference: &str) -> PathBuf {
        self.logs_dir.join(log_file_name(reference))
    }

    /// Create the directory skeleton and empty log files for a run.
    ///
    /// Safe to repeat: directories may already exist and logs are truncated.
    /// A results file left by an earlier run is removed, so only a completed
    /// run leaves `data.json` behind.
    pub fn prepare(&self, references: &[String]) -> Result<()> {
        io::ensure_dir(&self.logs_dir)?;
        io::ensure_dir(&self.performance_dir)?;

        for reference in references {
            io::truncate_file(&self.reference_log(reference))?;
        }
        io::truncate_file(&self.destroy_log)?;
        io::truncate_file(&self.init_log)?;
        io::remove_file_if_exists(&self.results_file)?;

        Ok(())
    }
}

/// Map a reference to its log filename: every `.` becomes `_`.
///
/// No other characters are escaped, so a reference containing `/` lands in a
/// subdirectory of `logs/` that does not exist.
pub fn log_file_name(reference: &str) -> String {
    format!("{}.log", reference.replace('.', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_derives_all_paths() {
        let layout = OutputLayout::resolve("test-output");

        assert_eq!(layout.logs_dir, Path::new("test-output/logs"));
        assert_eq!(layout.performance_dir, Path::new("test-output/performance"));
        assert_eq!(layout.destroy_log, Path::new("test-output/logs/destroy.log"));
        assert_eq!(layout.init_log, Path::new("test-output/logs/init.log"));
        assert_eq!(
            layout.results_file,
            Path::new("test-output/performance/data.json")
        );
    }

    #[test]
    fn resolve_is_deterministic() {
        assert_eq!(OutputLayout::resolve("output"), OutputLayout::resolve("output"));
    }

    #[test]
    fn output_dir_only_changes_the_prefix() {
        let a = OutputLayout::resolve("a");
        let b = OutputLayout::resolve("some/other/root");

        let pairs = [
            (&a.logs_dir, &b.logs_dir),
            (&a.performance_dir, &b.performance_dir),
            (&a.destroy_log, &b.destroy_log),
            (&a.init_log, &b.init_log),
            (&a.results_file, &b.results_file),
        ];
        for (left, right) in pairs {
            assert_eq!(
                left.strip_prefix(&a.root).unwrap(),
                right.strip_prefix(&b.root).unwrap()
            );
        }
        assert_eq!(
            a.reference_log("v1.0.0").strip_prefix(&a.root).unwrap(),
            b.reference_log("v1.0.0").strip_prefix(&b.root).unwrap()
        );
    }

    #[test]
    fn log_file_name_replaces_dots() {
        assert_eq!(log_file_name("v1.66.0"), "v1_66_0.log");
        assert_eq!(log_file_name("main"), "main.log");
        assert_eq!(log_file_name("abc1234"), "abc1234.log");
        assert_eq!(log_file_name("feature.branch"), "feature_branch.log");
    }

    #[test]
    fn reference_log_lives_under_logs_dir() {
        let layout = OutputLayout::resolve("/test");
        assert_eq!(
            layout.reference_log("v1.66.0"),
            Path::new("/test/logs/v1_66_0.log")
        );
    }

    #[test]
    fn prepare_creates_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::resolve(dir.path().join("test-output"));
        let references = vec![
            "v1.0.0".to_string(),
            "main".to_string(),
            "feature.branch".to_string(),
        ];

        layout.prepare(&references).unwrap();
        layout.prepare(&references).unwrap();

        assert!(layout.logs_dir.is_dir());
        assert!(layout.performance_dir.is_dir());
        for name in [
            "v1_0_0.log",
            "main.log",
            "feature_branch.log",
            "destroy.log",
            "init.log",
        ] {
            assert!(layout.logs_dir.join(name).is_file(), "{} missing", name);
        }
        assert!(!layout.results_file.exists());
    }

    #[test]
    fn prepare_removes_stale_results() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::resolve(dir.path());
        std::fs::create_dir_all(&layout.performance_dir).unwrap();
        std::fs::write(&layout.results_file, "[]").unwrap();

        layout.prepare(&["main".to_string()]).unwrap();

        assert!(!layout.results_file.exists());
    }
}
