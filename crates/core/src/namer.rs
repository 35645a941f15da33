use crate::sanitize::sanitize_filename;
use crate::template::DatePattern;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn target_path_for(
    timestamp: &NaiveDateTime,
    pattern: &DatePattern,
    directory: &Path,
    extension: &str,
    original: &Path,
    reserved: &HashSet<PathBuf>,
) -> Result<PathBuf> {
    let rendered = pattern
        .render(timestamp)
        .with_context(|| format!("could not render name for {}", original.display()))?;
    let base = sanitize_filename(&rendered);
    Ok(unique_target_path(directory, &base, extension, original, reserved))
}

pub fn unique_target_path(
    directory: &Path,
    base: &str,
    extension: &str,
    original: &Path,
    reserved: &HashSet<PathBuf>,
) -> PathBuf {
    let candidate = directory.join(file_name(base, extension));
    if is_available(&candidate, original, reserved) {
        return candidate;
    }

    let mut n = 1usize;
    loop {
        let candidate = directory.join(file_name(&format!("{base}_{n}"), extension));
        if is_available(&candidate, original, reserved) {
            return candidate;
        }
        n += 1;
    }
}

fn file_name(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{extension}")
    }
}

// `original` counts as free, so an already canonical file maps onto itself.
// The existence check is not atomic with the later rename.
fn is_available(candidate: &Path, original: &Path, reserved: &HashSet<PathBuf>) -> bool {
    if reserved.contains(candidate) {
        return false;
    }
    if candidate == original {
        return true;
    }
    // symlink_metadata so a dangling link still counts as taken
    candidate.symlink_metadata().is_err()
}
