use crate::metadata::parse_exif_datetime;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const REQUESTED_FIELDS: &[&str] = &["DateTimeOriginal", "CreateDate", "DateTime"];

pub const DEFAULT_EXIFTOOL_PROGRAM: &str = "exiftool";

/// An `exiftool` executable that answered `-ver`.
#[derive(Debug, Clone)]
pub struct ExiftoolReader {
    program: PathBuf,
}

impl ExiftoolReader {
    pub fn detect(program: impl Into<PathBuf>) -> Option<Self> {
        let program = program.into();
        match Command::new(&program).arg("-ver").output() {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
                debug!(program = %program.display(), %version, "exiftool available");
                Some(Self { program })
            }
            Ok(out) => {
                debug!(
                    program = %program.display(),
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "exiftool -ver failed"
                );
                None
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(program = %program.display(), "exiftool not found");
                None
            }
            Err(err) => {
                debug!(program = %program.display(), %err, "exiftool could not be started");
                None
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn read_date(&self, path: &Path) -> Option<NaiveDateTime> {
        let mut cmd = Command::new(&self.program);
        for field in REQUESTED_FIELDS {
            cmd.arg(format!("-{field}"));
        }
        let output = match cmd.arg("-j").arg(path).output() {
            Ok(out) => out,
            Err(err) => {
                debug!(path = %path.display(), %err, "failed to run exiftool");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                path = %path.display(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "exiftool returned non-zero"
            );
        }

        parse_exiftool_output(&output.stdout, path)
    }
}

/// Picks the first parsable date out of exiftool's `-j` output, which is an
/// array holding one object per file.
pub fn parse_exiftool_output(stdout: &[u8], path: &Path) -> Option<NaiveDateTime> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    let parsed: Value = match serde_json::from_slice(stdout) {
        Ok(val) => val,
        Err(err) => {
            debug!(path = %path.display(), %err, "failed to parse exiftool json output");
            return None;
        }
    };

    let record = parsed.as_array()?.first()?.as_object()?;
    for field in REQUESTED_FIELDS {
        let Some(raw) = record.get(*field).and_then(Value::as_str) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        let value = strip_timezone(raw);
        match parse_exif_datetime(value) {
            Some(date) => return Some(date),
            None => debug!(path = %path.display(), field, value, "exiftool returned unparsable date"),
        }
    }

    None
}

/// Drops a trailing `Z` or `+HH:MM` / `-HH:MM` offset. The date portion uses
/// `:` separators, so a sign can only appear after the time.
fn strip_timezone(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let Some(space) = trimmed.find(' ') else {
        return trimmed;
    };
    match trimmed[space..].find(['+', '-']) {
        Some(offset) => trimmed[..space + offset].trim_end(),
        None => trimmed,
    }
}
