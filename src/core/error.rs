use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigMissingKey,
    ConfigInvalidJson,
    ConfigInvalidValue,
    ConfigPathNotFound,

    ConfirmationDeclined,
    ConfirmationInputFailed,

    ProcessSpawnFailed,
    ProcessFailed,

    SwitchCheckoutFailed,
    SwitchBuildFailed,
    SwitchRestoreFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigMissingKey => "config.missing_key",
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ConfigPathNotFound => "config.path_not_found",

            ErrorCode::ConfirmationDeclined => "confirmation.declined",
            ErrorCode::ConfirmationInputFailed => "confirmation.input_failed",

            ErrorCode::ProcessSpawnFailed => "process.spawn_failed",
            ErrorCode::ProcessFailed => "process.failed",

            ErrorCode::SwitchCheckoutFailed => "switch.checkout_failed",
            ErrorCode::SwitchBuildFailed => "switch.build_failed",
            ErrorCode::SwitchRestoreFailed => "switch.restore_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

/// Orchestration stage an error surfaced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Validation,
    Setup,
    Init,
    Confirmation,
    Destroy,
    Switch,
    Command,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Setup => "setup",
            Stage::Init => "init",
            Stage::Confirmation => "confirmation",
            Stage::Destroy => "destroy",
            Stage::Switch => "reference switch",
            Stage::Command => "command execution",
            Stage::Persist => "persistence",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMissingKeyDetails {
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNotFoundDetails {
    pub key: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFailedDetails {
    pub command: String,
    pub dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub stage: Option<Stage>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stage {
            Some(stage) => write!(f, "{} failed: {}", stage, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            stage: None,
        }
    }

    // === Configuration ===

    pub fn config_missing_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::ConfigMissingKey,
            format!("{} is required", key),
            to_details(ConfigMissingKeyDetails { key }),
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::ConfigInvalidValue,
            problem.clone(),
            to_details(ConfigInvalidValueDetails {
                key: key.into(),
                value,
                problem,
            }),
        )
    }

    pub fn config_path_not_found(key: impl Into<String>, path: impl Into<String>) -> Self {
        let key = key.into();
        let path = path.into();
        Self::new(
            ErrorCode::ConfigPathNotFound,
            format!("{} does not exist at {}", key, path),
            to_details(PathNotFoundDetails { key, path }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ConfigInvalidJson,
            format!("Invalid JSON in configuration file {}", path),
            serde_json::json!({ "path": path, "error": err.to_string() }),
        )
    }

    // === Confirmation ===

    pub fn confirmation_declined(answer: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfirmationDeclined,
            "operation cancelled by user",
            serde_json::json!({ "answer": answer.into() }),
        )
        .with_hint("Pass --skip-confirmation to run without the interactive prompt")
    }

    pub fn confirmation_input_failed(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfirmationInputFailed,
            "failed to read user input",
            to_details(InternalErrorDetails {
                error: error.into(),
                context: Some("read confirmation".to_string()),
            }),
        )
    }

    // === External processes ===

    pub fn process_spawn_failed(command: impl Into<String>, error: impl Into<String>) -> Self {
        let command = command.into();
        Self::new(
            ErrorCode::ProcessSpawnFailed,
            format!("failed to start {}", command),
            serde_json::json!({ "command": command, "error": error.into() }),
        )
    }

    pub fn process_failed(details: ProcessFailedDetails) -> Self {
        let message = match details.exit_code {
            Some(code) => format!("{} exited with status {}", details.command, code),
            None => format!("{} was terminated by a signal", details.command),
        };
        let hint = details
            .log_path
            .as_ref()
            .map(|path| format!("See {} for the command output", path));
        let err = Self::new(ErrorCode::ProcessFailed, message, to_details(details));
        match hint {
            Some(hint) => err.with_hint(hint),
            None => err,
        }
    }

    pub fn switch_checkout_failed(reference: &str, cause: Error) -> Self {
        Self::switch_failed(ErrorCode::SwitchCheckoutFailed, "checkout failed", reference, cause)
    }

    pub fn switch_build_failed(reference: &str, cause: Error) -> Self {
        Self::switch_failed(
            ErrorCode::SwitchBuildFailed,
            "build/install failed",
            reference,
            cause,
        )
    }

    pub fn switch_restore_failed(branch: &str, cause: Error) -> Self {
        Self::switch_failed(
            ErrorCode::SwitchRestoreFailed,
            "restore checkout failed",
            branch,
            cause,
        )
    }

    fn switch_failed(code: ErrorCode, what: &str, reference: &str, cause: Error) -> Self {
        Self::new(
            code,
            format!("{} for {}: {}", what, reference, cause.message),
            serde_json::json!({
                "reference": reference,
                "cause": cause.code.as_str(),
                "causeDetails": cause.details,
            }),
        )
    }

    // === Internal ===

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(context) => format!("{}: {}", context, error),
            None => error.clone(),
        };
        Self::new(
            ErrorCode::InternalIoError,
            message,
            to_details(InternalErrorDetails { error, context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// Tag the error with the stage it surfaced from. An inner stage wins.
    pub fn at_stage(mut self, stage: Stage) -> Self {
        if self.stage.is_none() {
            self.stage = Some(stage);
        }
        self
    }
}
