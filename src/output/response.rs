//! CLI response formatting and output.
//!
//! Provides the JSON envelope, the plain-text diff log, and exit code mapping.

use pipeline_migrate::error::Hint;
use pipeline_migrate::migrate::LineChange;
use pipeline_migrate::{Error, ErrorCode, Result};
use serde::Serialize;
use std::io::{self, Write};

use crate::commands::migrate::MigrateOutput;

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

    fn to_json(&self) -> Result<String> {
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

fn write_stdout(payload: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write!(handle, "{}", payload) {
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

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    let payload = response.to_json()?;
    write_stdout(&format!("{}\n", payload))
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
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
        ErrorCode::ValidationMissingArgument => 1,

        ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError => 1,
    }
}

// ============================================================================
// Plain-text mode
// ============================================================================

/// Render one changed line of the diff log.
pub fn render_change(change: &LineChange) -> String {
    format!(
        "line {} old: {}\nline {} new: {}\n\n",
        change.line, change.old, change.line, change.new
    )
}

/// Print one changed line as soon as the rewriter reports it.
pub fn print_change(change: &LineChange) -> Result<()> {
    write_stdout(&render_change(change))
}

/// Render the closing output of a successful run. The diff log itself is
/// streamed through `print_change`.
pub fn render_text(output: &MigrateOutput) -> String {
    let mut out = String::new();

    match output {
        MigrateOutput::Migrate { file, applied, .. } => {
            if *applied {
                out.push_str(&format!("Changes saved to {}\n", file));
            } else {
                out.push_str(&format!("Dry run: {} left unchanged\n", file));
            }
        }
        MigrateOutput::List { replacements } => {
            for entry in replacements {
                out.push_str(&format!("{} -> {}\n", entry.old, entry.new));
            }
        }
    }

    out
}

/// Render an error for plain-text mode.
///
/// The missing-filename message goes to stdout on its own; everything else
/// is a diagnostic block for stderr.
pub fn render_text_error(err: &Error) -> String {
    if err.code == ErrorCode::ValidationMissingArgument {
        return format!("{}\n", err.message);
    }

    let mut out = format!("Error: {} [{}]\n", err.message, err.code.as_str());
    if let Some(fields) = err.details.as_object() {
        for (key, value) in fields {
            match value.as_str() {
                Some(text) => out.push_str(&format!("  {}: {}\n", key, text)),
                None => out.push_str(&format!("  {}: {}\n", key, value)),
            }
        }
    }
    for hint in &err.hints {
        out.push_str(&format!("  hint: {}\n", hint.message));
    }
    out
}

/// Print a command result in plain-text mode and return the exit code.
pub fn print_text_result(result: Result<(MigrateOutput, i32)>) -> i32 {
    match result {
        Ok((output, exit_code)) => match write_stdout(&render_text(&output)) {
            Ok(()) => exit_code,
            Err(err) => {
                eprint!("{}", render_text_error(&err));
                exit_code_for_error(err.code)
            }
        },
        Err(err) => {
            let rendered = render_text_error(&err);
            if err.code == ErrorCode::ValidationMissingArgument {
                // A failed stdout write leaves nothing better to report.
                let _ = write_stdout(&rendered);
            } else {
                eprint!("{}", rendered);
            }
            exit_code_for_error(err.code)
        }
    }
}
