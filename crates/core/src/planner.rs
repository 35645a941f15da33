use crate::metadata::MetadataSource;
use crate::namer::target_path_for;
use crate::resolver::DateResolver;
use crate::scanner::CandidateFile;
use crate::template::DatePattern;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

pub const NO_DATE_REASON: &str = "no-date";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub captured_at: NaiveDateTime,
    pub source: MetadataSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub scanned: usize,
    pub planned: usize,
    pub unchanged: usize,
    pub no_date: usize,
    pub errored: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenamePlan {
    pub pattern: String,
    pub entries: Vec<RenameEntry>,
    pub failures: Vec<FailureRecord>,
    pub stats: RenameStats,
}

enum CandidateOutcome {
    Planned(RenameEntry),
    Unchanged,
    NoDate,
}

pub fn generate_plan<I>(candidates: I, resolver: &DateResolver, pattern: &DatePattern) -> RenamePlan
where
    I: IntoIterator<Item = CandidateFile>,
{
    let mut entries = Vec::new();
    let mut failures = Vec::new();
    let mut stats = RenameStats::default();
    let mut reserved = HashSet::<PathBuf>::new();
    let mut seen = HashSet::<PathBuf>::new();

    for candidate in candidates {
        // overlapping inputs can yield the same file more than once
        if !seen.insert(candidate.path.clone()) {
            debug!(path = %candidate.path.display(), "duplicate candidate (skipping)");
            continue;
        }
        stats.scanned += 1;
        match plan_candidate(&candidate, resolver, pattern, &reserved) {
            Ok(CandidateOutcome::Planned(entry)) => {
                reserved.insert(entry.target_path.clone());
                stats.planned += 1;
                entries.push(entry);
            }
            Ok(CandidateOutcome::Unchanged) => {
                info!(path = %candidate.path.display(), "source and target are the same (skipping)");
                stats.unchanged += 1;
            }
            Ok(CandidateOutcome::NoDate) => {
                warn!(path = %candidate.path.display(), "no date found (skipping)");
                stats.no_date += 1;
                failures.push(FailureRecord {
                    path: candidate.path,
                    reason: NO_DATE_REASON.to_string(),
                });
            }
            Err(err) => {
                error!(path = %candidate.path.display(), error = ?err, "failed processing file");
                stats.errored += 1;
                failures.push(FailureRecord {
                    path: candidate.path,
                    reason: format!("{err:#}"),
                });
            }
        }
    }

    RenamePlan {
        pattern: pattern.as_str().to_string(),
        entries,
        failures,
        stats,
    }
}

fn plan_candidate(
    candidate: &CandidateFile,
    resolver: &DateResolver,
    pattern: &DatePattern,
    reserved: &HashSet<PathBuf>,
) -> Result<CandidateOutcome> {
    let Some(resolved) = resolver.resolve(&candidate.path) else {
        return Ok(CandidateOutcome::NoDate);
    };

    let directory = candidate
        .path
        .parent()
        .context("could not determine parent directory")?;
    let extension = candidate
        .path
        .extension()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default();

    let target = target_path_for(
        &resolved.timestamp,
        pattern,
        directory,
        &extension,
        &candidate.path,
        reserved,
    )?;

    if target == candidate.path {
        return Ok(CandidateOutcome::Unchanged);
    }

    Ok(CandidateOutcome::Planned(RenameEntry {
        original_path: candidate.path.clone(),
        target_path: target,
        captured_at: resolved.timestamp,
        source: resolved.source,
    }))
}
