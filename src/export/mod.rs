//! # Export Module
//!
//! Printable output for finished patterns.
//!
//! - [`pdf`]: numbered chart rasterized onto a single A4 page

pub mod pdf;

/// Used when the project name sanitizes to nothing.
pub const DEFAULT_FILE_STEM: &str = "pattern";

/// Download file name for a project: whitespace runs become `_`, characters
/// that are unsafe in file names or headers are dropped.
pub fn export_filename(project_name: &str, extension: &str) -> String {
    let stem = project_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '"' | '*' | '?' | '<' | '>' | '|'))
        .collect::<String>();

    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem.as_str() };
    format!("{}.{}", stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(export_filename("  Winter   hat\tchart ", "pdf"), "Winter_hat_chart.pdf");
    }

    #[test]
    fn test_unsafe_characters_dropped() {
        assert_eq!(export_filename("a/b \"c\"", "pdf"), "ab_c.pdf");
    }

    #[test]
    fn test_empty_name_uses_default() {
        assert_eq!(export_filename("", "pdf"), "pattern.pdf");
        assert_eq!(export_filename("   ", "pdf"), "pattern.pdf");
        assert_eq!(export_filename("///", "pdf"), "pattern.pdf");
    }
}
