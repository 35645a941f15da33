use crate::planner::{FailureRecord, RenameEntry, RenamePlan};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyMode {
    Simulate,
    Execute,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub simulated: usize,
    pub failures: Vec<FailureRecord>,
}

/// Only a failed write to `out` aborts; failed renames are collected.
pub fn apply_plan<W: Write>(plan: &RenamePlan, mode: ApplyMode, out: &mut W) -> Result<ApplyResult> {
    let mut result = ApplyResult::default();
    if plan.entries.is_empty() {
        return Ok(result);
    }

    writeln!(out, "Planned renames:")?;
    for entry in &plan.entries {
        writeln!(
            out,
            "{} -> {}",
            entry.original_path.display(),
            entry.target_path.display()
        )?;
    }

    match mode {
        ApplyMode::Simulate => {
            for entry in &plan.entries {
                writeln!(
                    out,
                    "would rename: {} -> {}",
                    entry.original_path.display(),
                    entry.target_path.display()
                )?;
                result.simulated += 1;
            }
            writeln!(out, "Simulation mode; no files renamed.")?;
        }
        ApplyMode::Execute => {
            for entry in &plan.entries {
                match rename_entry(entry) {
                    Ok(()) => {
                        writeln!(
                            out,
                            "renamed: {} -> {}",
                            entry.original_path.display(),
                            entry.target_path.display()
                        )?;
                        result.applied += 1;
                    }
                    Err(err) => {
                        error!(
                            from = %entry.original_path.display(),
                            to = %entry.target_path.display(),
                            error = ?err,
                            "failed renaming"
                        );
                        result.failures.push(FailureRecord {
                            path: entry.original_path.clone(),
                            reason: format!("{err:#}"),
                        });
                    }
                }
            }
        }
    }

    Ok(result)
}

fn rename_entry(entry: &RenameEntry) -> Result<()> {
    if let Some(parent) = entry.target_path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("could not create target directory: {}", parent.display())
        })?;
    }

    // fs::rename silently replaces an existing file on unix
    if entry.target_path.symlink_metadata().is_ok() {
        bail!("target already exists: {}", entry.target_path.display());
    }

    fs::rename(&entry.original_path, &entry.target_path).with_context(|| {
        format!(
            "rename failed: {} -> {}",
            entry.original_path.display(),
            entry.target_path.display()
        )
    })
}
