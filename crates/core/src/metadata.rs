use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetadataSource {
    Exif,
    Exiftool,
    FileModified,
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetadataSource::Exif => "exif",
            MetadataSource::Exiftool => "exiftool",
            MetadataSource::FileModified => "file-modified",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedDate {
    pub timestamp: NaiveDateTime,
    pub source: MetadataSource,
}

/// Fixed layout used by EXIF `DateTime*` tags and exiftool's default output.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

pub fn parse_exif_datetime(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), EXIF_DATETIME_FORMAT).ok()
}
