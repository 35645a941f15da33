use crate::metadata::parse_exif_datetime;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

const DATE_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

pub fn read_exif_date(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path)
        .with_context(|| format!("could not open file for EXIF: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("could not parse EXIF: {}", path.display()))?;

    for tag in DATE_TAGS {
        let Some(raw) = ascii_value(&exif, *tag) else {
            continue;
        };
        match parse_exif_datetime(&raw) {
            Some(date) => return Ok(Some(date)),
            None => debug!(?tag, value = %raw, path = %path.display(), "unparsable EXIF date tag"),
        }
    }

    Ok(None)
}

fn ascii_value(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref values) => values
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|v| !v.is_empty()),
        _ => None,
    }
}
