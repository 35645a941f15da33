use crate::exif_reader::read_exif_date;
use crate::exiftool_reader::ExiftoolReader;
use crate::metadata::{MetadataSource, ResolvedDate};
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One step of the date resolution chain. `None` means "try the next one".
pub trait DateSource {
    fn kind(&self) -> MetadataSource;
    fn resolve(&self, path: &Path) -> Option<NaiveDateTime>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifSource;

impl DateSource for ExifSource {
    fn kind(&self) -> MetadataSource {
        MetadataSource::Exif
    }

    fn resolve(&self, path: &Path) -> Option<NaiveDateTime> {
        match read_exif_date(path) {
            Ok(date) => date,
            Err(err) => {
                debug!(path = %path.display(), error = %format!("{err:#}"), "exif reader failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExiftoolSource {
    reader: ExiftoolReader,
}

impl ExiftoolSource {
    pub fn new(reader: ExiftoolReader) -> Self {
        Self { reader }
    }
}

impl DateSource for ExiftoolSource {
    fn kind(&self) -> MetadataSource {
        MetadataSource::Exiftool
    }

    fn resolve(&self, path: &Path) -> Option<NaiveDateTime> {
        self.reader.read_date(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileModifiedSource;

impl DateSource for FileModifiedSource {
    fn kind(&self) -> MetadataSource {
        MetadataSource::FileModified
    }

    fn resolve(&self, path: &Path) -> Option<NaiveDateTime> {
        match fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(time) => Some(DateTime::<Local>::from(time).naive_local()),
            Err(err) => {
                debug!(path = %path.display(), %err, "failed to read file mtime");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub use_file_modified: bool,
    /// `None` leaves exiftool out of the chain.
    pub exiftool_program: Option<String>,
}

/// Ordered list of date sources; the first one that answers wins.
#[derive(Default)]
pub struct DateResolver {
    sources: Vec<Box<dyn DateSource>>,
}

impl DateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl DateSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn from_options(options: &ResolverOptions) -> Self {
        let mut resolver = Self::new().with_source(ExifSource);
        if let Some(reader) = options
            .exiftool_program
            .as_deref()
            .and_then(ExiftoolReader::detect)
        {
            resolver = resolver.with_source(ExiftoolSource::new(reader));
        }
        if options.use_file_modified {
            resolver = resolver.with_source(FileModifiedSource);
        }
        resolver
    }

    pub fn source_kinds(&self) -> Vec<MetadataSource> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    pub fn resolve(&self, path: &Path) -> Option<ResolvedDate> {
        self.sources.iter().find_map(|source| {
            let timestamp = source.resolve(path)?;
            debug!(
                path = %path.display(),
                source = %source.kind(),
                %timestamp,
                "resolved capture date"
            );
            Some(ResolvedDate {
                timestamp,
                source: source.kind(),
            })
        })
    }
}
