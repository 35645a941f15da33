mod apply;
mod config;
mod exif_reader;
mod exiftool_reader;
mod metadata;
mod namer;
mod planner;
mod report;
mod resolver;
mod sanitize;
mod scanner;
mod template;
#[cfg(test)]
mod test_support;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "heic", "cr2", "nef", "arw", "raf", "dng", "png",
];

pub use apply::{apply_plan, ApplyMode, ApplyResult};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use exif_reader::read_exif_date;
pub use exiftool_reader::{parse_exiftool_output, ExiftoolReader, DEFAULT_EXIFTOOL_PROGRAM};
pub use metadata::{parse_exif_datetime, MetadataSource, ResolvedDate, EXIF_DATETIME_FORMAT};
pub use namer::{target_path_for, unique_target_path};
pub use planner::{
    generate_plan, FailureRecord, RenameEntry, RenamePlan, RenameStats, NO_DATE_REASON,
};
pub use report::{RunOutcome, EXIT_OK, EXIT_WITH_FAILURES};
pub use resolver::{
    DateResolver, DateSource, ExifSource, ExiftoolSource, FileModifiedSource, ResolverOptions,
};
pub use scanner::{scan_candidates, CandidateFile, ExtensionSet};
pub use template::{parse_template, validate_template, DatePattern, TemplateError};
