use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::iter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Lower-cased extensions (no leading dot) that select candidate files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    pub fn parse(list: &str) -> Self {
        Self::from_list(list.split(','))
    }

    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = items
            .into_iter()
            .map(|item| item.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|item| !item.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(&extension.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    fn matches(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        self.extensions.contains(&ext).then_some(ext)
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.iter().collect::<Vec<_>>().join(", ");
        f.write_str(&joined)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Lower-cased, without the leading dot.
    pub extension: String,
}

pub fn scan_candidates<'a>(
    inputs: &'a [PathBuf],
    recursive: bool,
    extensions: &'a ExtensionSet,
) -> impl Iterator<Item = CandidateFile> + 'a {
    inputs
        .iter()
        .flat_map(move |input| scan_input(input, recursive, extensions))
}

fn scan_input<'a>(
    input: &'a Path,
    recursive: bool,
    extensions: &'a ExtensionSet,
) -> Box<dyn Iterator<Item = CandidateFile> + 'a> {
    if input.is_file() {
        let candidate = candidate_for(input, extensions);
        if candidate.is_none() {
            debug!(path = %input.display(), "skipping file (extension not in set)");
        }
        Box::new(candidate.into_iter())
    } else if input.is_dir() {
        if recursive {
            walk_recursive(input, extensions)
        } else {
            walk_flat(input, extensions)
        }
    } else {
        warn!(path = %input.display(), "path not found or unsupported");
        Box::new(iter::empty())
    }
}

fn walk_recursive<'a>(
    root: &'a Path,
    extensions: &'a ExtensionSet,
) -> Box<dyn Iterator<Item = CandidateFile> + 'a> {
    Box::new(
        WalkDir::new(root)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_file() {
                        return None;
                    }
                    candidate_for(path, extensions)
                }
                Err(err) => {
                    warn!(root = %root.display(), %err, "directory traversal error");
                    None
                }
            }),
    )
}

fn walk_flat<'a>(
    root: &'a Path,
    extensions: &'a ExtensionSet,
) -> Box<dyn Iterator<Item = CandidateFile> + 'a> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %root.display(), %err, "could not read directory");
            return Box::new(iter::empty());
        }
    };

    Box::new(entries.filter_map(move |entry| match entry {
        Ok(entry) => {
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            candidate_for(&path, extensions)
        }
        Err(err) => {
            warn!(path = %root.display(), %err, "could not read directory entry");
            None
        }
    }))
}

fn candidate_for(path: &Path, extensions: &ExtensionSet) -> Option<CandidateFile> {
    let extension = extensions.matches(path)?;
    Some(CandidateFile {
        path: absolutize(path),
        extension,
    })
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
