//! CLI response formatting and output.
//!
//! Provides the JSON envelope, printing, and exit code mapping shared by
//! both binaries. Successful payloads go to stdout, errors to stderr.

use crate::error::{Error, ErrorCode, Hint, Result};
use serde::Serialize;
use std::io::{self, Write};

/// Command result: payload plus process exit code.
pub type CmdResult<T> = Result<(T, i32)>;

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
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":{{"code":"internal.unexpected","message":"Failed to serialize response: {}"}}}}"#,
                e
            )
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
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn write_payload(mut handle: impl Write, payload: &str) {
    // Broken pipes (e.g. `| head`) are not worth reporting.
    let _ = writeln!(handle, "{}", payload);
}

pub fn print_success<T: Serialize>(data: T) {
    let payload = CliResponse::success(data).to_json();
    write_payload(io::stdout().lock(), &payload);
}

pub fn print_error(err: &Error) {
    let payload = CliResponse::<()>::from_error(err).to_json();
    write_payload(io::stderr().lock(), &payload);
}

pub fn print_json_result(result: Result<serde_json::Value>) {
    match result {
        Ok(data) => print_success(data),
        Err(err) => print_error(&err),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: CmdResult<T>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_unexpected(format!(
                    "Failed to serialize response: {}",
                    err
                ))),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ValidationMissingArgument
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::VersionInvalidFormat => 2,

        ErrorCode::FileAccessFailed
        | ErrorCode::XmlParseFailed
        | ErrorCode::InternalUnexpected => 1,
    }
}

pub fn exit_code_to_u8(code: i32) -> u8 {
    code.clamp(0, 255) as u8
}
