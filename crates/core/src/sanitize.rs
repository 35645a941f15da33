const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turns a rendered stem into a single path component. Separators become `_`
/// so a pattern like `%Y/%m` cannot leave the source directory, and a stem
/// that renders to a device name such as `NUL` gets a suffix so the file stays
/// openable on Windows.
pub fn sanitize_filename(rendered: &str) -> String {
    let replaced: String = rendered
        .chars()
        .map(|ch| if is_disallowed_char(ch) { '_' } else { ch })
        .collect();

    let stem = replaced.trim_end_matches([' ', '.']).trim();
    match stem {
        "" => "untitled".to_string(),
        stem if is_windows_reserved(stem) => format!("{stem}_file"),
        stem => stem.to_string(),
    }
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        || ch == '\0'
        || ch.is_control()
}

fn is_windows_reserved(value: &str) -> bool {
    let stem = value
        .split('.')
        .next()
        .unwrap_or(value)
        .to_ascii_uppercase();
    WINDOWS_RESERVED_NAMES
        .iter()
        .any(|reserved| reserved == &stem)
}
