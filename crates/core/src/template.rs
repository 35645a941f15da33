use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("date format is empty")]
    Empty,
    #[error("date format contains an invalid specifier: {0}")]
    InvalidSpecifier(String),
    #[error("date format cannot be rendered for a local timestamp: {0}")]
    Unrenderable(String),
}

/// A validated strftime pattern used to build the new file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    pattern: String,
}

impl DatePattern {
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn render(&self, timestamp: &NaiveDateTime) -> Result<String, TemplateError> {
        let mut out = String::new();
        write!(out, "{}", timestamp.format(&self.pattern))
            .map_err(|_| TemplateError::Unrenderable(self.pattern.clone()))?;
        Ok(out)
    }
}

pub fn validate_template(input: &str) -> Result<(), TemplateError> {
    parse_template(input).map(|_| ())
}

pub fn parse_template(input: &str) -> Result<DatePattern, TemplateError> {
    if input.is_empty() {
        return Err(TemplateError::Empty);
    }

    if StrftimeItems::new(input).any(|item| matches!(item, Item::Error)) {
        return Err(TemplateError::InvalidSpecifier(input.to_string()));
    }

    let pattern = DatePattern {
        pattern: input.to_string(),
    };

    // Offset and zone specifiers only fail once a naive value is formatted.
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let rendered = pattern.render(&sample)?;
    if rendered.trim().is_empty() {
        return Err(TemplateError::Empty);
    }

    Ok(pattern)
}
