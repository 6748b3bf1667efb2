//! Benchmark Terraform commands across versions of a locally built provider.
//!
//! ```ignore
//! let config = tfbench::BenchConfig {
//!     command: Some(tfbench::TfCommand::Plan),
//!     references: vec!["v1.66.0".into(), "main".into()],
//!     project_path: "/src/terraform-provider-example".into(),
//!     terraform_rc_file_path: "./.terraformrc".into(),
//!     tf_config_dir: ".".into(),
//!     ..Default::default()
//! };
//! let summary = tfbench::bench::run(config)?;
//! ```

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `tfbench::config` instead of `tfbench::core::config`
pub use crate::core::*;
pub use crate::utils::*;
