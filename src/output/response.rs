//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use serde::Serialize;
use tfbench::error::Hint;
use tfbench::{Error, ErrorCode, Result, Stage};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.to_string(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
                stage: err.stage,
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Print the envelope for `result` and return the process exit code.
pub fn print_result<T: Serialize>(result: Result<T>) -> i32 {
    let (printed, exit_code) = match result {
        Ok(data) => (print_response(&CliResponse::success(data)), 0),
        Err(err) => (
            print_response(&CliResponse::<()>::from_error(&err)),
            exit_code_for_error(err.code),
        ),
    };
    match printed {
        Ok(()) => exit_code,
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigMissingKey
        | ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ConfigPathNotFound => 2,

        ErrorCode::ConfirmationDeclined | ErrorCode::ConfirmationInputFailed => 3,

        ErrorCode::ProcessSpawnFailed
        | ErrorCode::ProcessFailed
        | ErrorCode::SwitchCheckoutFailed
        | ErrorCode::SwitchBuildFailed
        | ErrorCode::SwitchRestoreFailed => 20,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_carries_code_stage_and_hints() {
        let err = Error::confirmation_declined("no").at_stage(Stage::Confirmation);
        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

        assert!(json.contains("\"success\": false"));
        assert!(json.contains("\"code\": \"confirmation.declined\""));
        assert!(json.contains("\"stage\": \"confirmation\""));
        assert!(json.contains("confirmation failed: operation cancelled by user"));
        assert!(json.contains("--skip-confirmation"));
    }

    #[test]
    fn success_envelope_omits_error() {
        let json = CliResponse::success(serde_json::json!({ "ok": 1 }))
            .to_json()
            .unwrap();
        assert!(json.contains("\"success\": true"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn exit_codes_group_by_taxonomy() {
        assert_eq!(exit_code_for_error(ErrorCode::ConfigPathNotFound), 2);
        assert_eq!(exit_code_for_error(ErrorCode::ConfirmationDeclined), 3);
        assert_eq!(exit_code_for_error(ErrorCode::SwitchBuildFailed), 20);
        assert_eq!(exit_code_for_error(ErrorCode::InternalIoError), 1);
    }
}
