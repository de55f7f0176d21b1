//! Blocking invocation of external media tools.
//!
//! We intentionally shell out to the system binaries rather than linking
//! native media libraries, which keeps the build free of FFmpeg dev
//! header/lib requirements. Exit status alone is never treated as proof of
//! success; callers verify the expected output artifact exists.

use std::process::{Command, Output, Stdio};

use crate::error::{LetterboxError, LetterboxResult};

/// Check whether `program` resolves on PATH by asking it for its version.
pub fn is_on_path(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a prepared command to completion, capturing its output.
///
/// `label` names the operation in error messages (e.g. "primary video
/// download"). A non-zero exit is a `ToolInvocation` error carrying the
/// trimmed stderr so failures are diagnosable from the logs.
pub fn run_checked(label: &str, cmd: &mut Command) -> LetterboxResult<Output> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let out = cmd.output().map_err(|e| {
        LetterboxError::tool_invocation(format!(
            "failed to spawn {program} for {label} (is it installed and on PATH?): {e}"
        ))
    })?;

    if !out.status.success() {
        return Err(LetterboxError::tool_invocation(format!(
            "{program} failed during {label} with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    Ok(out)
}
