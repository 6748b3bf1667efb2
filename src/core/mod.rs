// Public modules
pub mod bench;
pub mod config;
pub mod confirm;
pub mod error;
pub mod layout;
pub mod logging;
pub mod process;
pub mod results;
pub mod switcher;
pub mod terraform;

// Re-export common types for convenience
pub use bench::{Benchmark, RunSummary};
pub use config::{BenchConfig, LogLevel, TfCommand};
pub use error::{Error, ErrorCode, Result, Stage};
pub use results::ResultRecord;
