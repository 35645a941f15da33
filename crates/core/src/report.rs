use crate::apply::ApplyResult;
use crate::planner::{FailureRecord, RenamePlan};
use std::io::Write;

pub const EXIT_OK: u8 = 0;
pub const EXIT_WITH_FAILURES: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoCandidates,
    NothingToRename,
    Simulated {
        planned: usize,
        failures: Vec<FailureRecord>,
    },
    Renamed {
        count: usize,
    },
    CompletedWithFailures {
        renamed: usize,
        failures: Vec<FailureRecord>,
    },
}

impl RunOutcome {
    /// `apply` is `None` when nothing was handed to the executor.
    pub fn from_run(plan: &RenamePlan, apply: Option<&ApplyResult>, simulate: bool) -> Self {
        if plan.stats.scanned == 0 {
            return RunOutcome::NoCandidates;
        }

        let mut failures = plan.failures.clone();
        if let Some(result) = apply {
            failures.extend(result.failures.iter().cloned());
        }

        if simulate {
            return RunOutcome::Simulated {
                planned: plan.entries.len(),
                failures,
            };
        }

        let renamed = apply.map(|r| r.applied).unwrap_or(0);
        if !failures.is_empty() {
            return RunOutcome::CompletedWithFailures { renamed, failures };
        }
        if plan.entries.is_empty() {
            return RunOutcome::NothingToRename;
        }
        RunOutcome::Renamed { count: renamed }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::CompletedWithFailures { .. } => EXIT_WITH_FAILURES,
            _ => EXIT_OK,
        }
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self {
            RunOutcome::NoCandidates => writeln!(out, "No candidate files found."),
            RunOutcome::NothingToRename => writeln!(out, "Nothing to rename."),
            RunOutcome::Simulated { planned, failures } => {
                writeln!(out, "Simulated {planned} renames.")?;
                write_failures(out, failures)
            }
            RunOutcome::Renamed { count } => writeln!(out, "Done. Renamed {count} files."),
            RunOutcome::CompletedWithFailures { renamed, failures } => {
                writeln!(
                    out,
                    "Completed with {} failures ({renamed} files renamed).",
                    failures.len()
                )?;
                write_failures(out, failures)
            }
        }
    }
}

fn write_failures<W: Write>(out: &mut W, failures: &[FailureRecord]) -> std::io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(out, "Files not processed:")?;
    for failure in failures {
        writeln!(out, "  {}: {}", failure.path.display(), failure.reason)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{RenameStats, NO_DATE_REASON};
    use std::path::PathBuf;

    fn plan(scanned: usize, entries: usize, failures: Vec<FailureRecord>) -> RenamePlan {
        let entries = (0..entries)
            .map(|i| crate::planner::RenameEntry {
                original_path: PathBuf::from(format!("/photos/IMG_{i}.jpg")),
                target_path: PathBuf::from(format!("/photos/2023-05-01_10-20-3{i}.jpg")),
                captured_at: chrono::NaiveDateTime::default(),
                source: crate::metadata::MetadataSource::Exif,
            })
            .collect();
        RenamePlan {
            pattern: crate::DEFAULT_DATE_FORMAT.to_string(),
            entries,
            failures,
            stats: RenameStats {
                scanned,
                ..RenameStats::default()
            },
        }
    }

    fn no_date(path: &str) -> FailureRecord {
        FailureRecord {
            path: PathBuf::from(path),
            reason: NO_DATE_REASON.to_string(),
        }
    }

    #[test]
    fn zero_candidates_exits_cleanly() {
        let outcome = RunOutcome::from_run(&plan(0, 0, Vec::new()), None, false);
        assert_eq!(outcome, RunOutcome::NoCandidates);
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }

    #[test]
    fn all_unchanged_is_nothing_to_rename() {
        let outcome = RunOutcome::from_run(&plan(3, 0, Vec::new()), None, false);
        assert_eq!(outcome, RunOutcome::NothingToRename);
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }

    #[test]
    fn planning_failure_yields_failure_exit_code() {
        let result = ApplyResult {
            applied: 1,
            ..ApplyResult::default()
        };
        let outcome =
            RunOutcome::from_run(&plan(2, 1, vec![no_date("/photos/img2.jpg")]), Some(&result), false);
        assert_eq!(outcome.exit_code(), EXIT_WITH_FAILURES);

        let mut out = Vec::new();
        outcome.write_summary(&mut out).expect("write");
        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.contains("Completed with 1 failures"));
        assert!(printed.contains("/photos/img2.jpg: no-date"));
    }

    #[test]
    fn only_failures_still_report_failure() {
        let outcome = RunOutcome::from_run(&plan(1, 0, vec![no_date("/photos/a.jpg")]), None, false);
        assert_eq!(
            outcome,
            RunOutcome::CompletedWithFailures {
                renamed: 0,
                failures: vec![no_date("/photos/a.jpg")],
            }
        );
    }

    #[test]
    fn simulation_succeeds_but_lists_failures() {
        let result = ApplyResult {
            simulated: 1,
            ..ApplyResult::default()
        };
        let outcome =
            RunOutcome::from_run(&plan(2, 1, vec![no_date("/photos/b.jpg")]), Some(&result), true);
        assert_eq!(outcome.exit_code(), EXIT_OK);

        let mut out = Vec::new();
        outcome.write_summary(&mut out).expect("write");
        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.contains("Simulated 1 renames."));
        assert!(printed.contains("/photos/b.jpg: no-date"));
    }

    #[test]
    fn all_renamed_is_success() {
        let result = ApplyResult {
            applied: 2,
            ..ApplyResult::default()
        };
        let outcome = RunOutcome::from_run(&plan(2, 2, Vec::new()), Some(&result), false);
        assert_eq!(outcome, RunOutcome::Renamed { count: 2 });
        let mut out = Vec::new();
        outcome.write_summary(&mut out).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "Done. Renamed 2 files.\n");
    }
}
