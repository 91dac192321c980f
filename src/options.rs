use std::default::Default;
use std::path::PathBuf;

use crate::deobfuscate::escape::EscapePolicy;

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_deobfuscated";
pub const DEFAULT_REPORT_FILE: &str = "deobfuscation_report.txt";

#[derive(Debug, Clone)]
pub struct Options {
    pub indent_size: usize,
    pub indent_char: String,
    pub escape_policy: EscapePolicy,
    pub rename_identifiers: bool,
    pub add_comments: bool,
    pub output_suffix: String,
    /// `None` disables the side report entirely.
    pub report_path: Option<PathBuf>,
    pub stats_json: Option<PathBuf>,
}

impl Options {
    pub fn indent_unit(&self) -> String {
        self.indent_char.repeat(self.indent_size)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indent_size: 2,
            indent_char: " ".to_string(),
            escape_policy: EscapePolicy::Preserve,
            rename_identifiers: true,
            add_comments: true,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            report_path: Some(PathBuf::from(DEFAULT_REPORT_FILE)),
            stats_json: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_indent_unit_is_two_spaces() {
        assert_eq!(Options::default().indent_unit(), "  ");
    }

    #[test]
    fn test_custom_indent_unit() {
        let options = Options {
            indent_size: 1,
            indent_char: "\t".to_string(),
            ..Options::default()
        };
        assert_eq!(options.indent_unit(), "\t");
    }
}
