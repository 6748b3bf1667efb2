use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;

use tempfile::TempDir;
use tfbench::error::ProcessFailedDetails;
use tfbench::process::{CommandRunner, Invocation};
use tfbench::{BenchConfig, Error, LogLevel, Result, TfCommand};

/// Records every invocation and succeeds instantly, optionally failing the
/// `occurrence`-th call whose command line equals `line`.
#[derive(Default)]
pub struct StubRunner {
    pub calls: RefCell<Vec<Invocation>>,
    failure: Option<(String, usize)>,
}

impl StubRunner {
    pub fn failing_on(line: &str, occurrence: usize) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failure: Some((line.to_string(), occurrence)),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::display).collect()
    }

    pub fn find(&self, line: &str) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|inv| inv.display() == line)
            .cloned()
            .collect()
    }
}

impl CommandRunner for StubRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        let line = invocation.display();
        self.calls.borrow_mut().push(invocation.clone());

        if let Some((fail_line, occurrence)) = &self.failure {
            let seen = self
                .calls
                .borrow()
                .iter()
                .filter(|inv| inv.display() == *fail_line)
                .count();
            if line == *fail_line && seen == *occurrence {
                return Err(Error::process_failed(ProcessFailedDetails {
                    command: line,
                    dir: invocation.dir.to_string_lossy().to_string(),
                    exit_code: Some(1),
                    log_path: None,
                }));
            }
        }
        Ok(())
    }
}

/// Prompt output that stays readable after being handed to a `Benchmark`.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A scratch workspace with an existing terraformrc and config dir.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_dir(tempfile::tempdir().unwrap())
    }

    /// Workspace under the current directory, so its paths are relative.
    pub fn relative() -> Self {
        Self::with_dir(tempfile::tempdir_in(".").unwrap())
    }

    fn with_dir(dir: TempDir) -> Self {
        fs::write(dir.path().join(".terraformrc"), "provider_installation {}").unwrap();
        fs::create_dir_all(dir.path().join("tf")).unwrap();
        Self { dir }
    }

    pub fn path(&self, rel: &str) -> String {
        self.dir.path().join(rel).to_string_lossy().to_string()
    }

    pub fn config(&self, command: TfCommand, references: &[&str]) -> BenchConfig {
        BenchConfig {
            command: Some(command),
            references: references.iter().map(|r| r.to_string()).collect(),
            project_path: self.path("provider"),
            log_level: LogLevel::Quiet,
            terraform_rc_file_path: self.path(".terraformrc"),
            output_dir: self.path("output"),
            tf_config_dir: self.path("tf"),
            ..Default::default()
        }
    }
}
