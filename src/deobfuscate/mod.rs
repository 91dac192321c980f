pub mod annotate;
pub mod escape;
pub mod format;
pub mod inline_strings;
pub mod rename;
pub mod string_table;

use crate::Result;
use crate::options::Options;

use escape::EscapePolicy;
pub use rename::IdentifierMap;
pub use string_table::{StringTable, StringTableEntry};

/// Per-run state shared by the passes. A fresh context is used for every
/// file; nothing carries over between runs.
pub struct DeobfuscateContext {
    pub string_table: StringTable,
    pub identifiers: IdentifierMap,
    pub inlined_references: usize,
}

impl DeobfuscateContext {
    pub fn new() -> Self {
        Self {
            string_table: StringTable::new(),
            identifiers: IdentifierMap::new(),
            inlined_references: 0,
        }
    }

    pub fn analyze(&mut self, source: &str, policy: EscapePolicy) -> Result<()> {
        log::info!("Extracting string table...");
        self.string_table = string_table::extract_string_table(source, policy);
        log::info!("Decoded {} strings", self.string_table.len());
        Ok(())
    }

    pub fn deobfuscate(&mut self, source: &str, options: &Options) -> Result<String> {
        log::info!("Inlining string table references...");
        let (inlined, count) = inline_strings::inline_string_table(source, &self.string_table)?;
        self.inlined_references = count;

        log::info!("Decoding octal escapes in string literals...");
        let decoded = escape::decode_string_literals(&inlined, options.escape_policy);

        let renamed = if options.rename_identifiers {
            log::info!("Renaming single-letter identifiers...");
            rename::rename_identifiers(&decoded, &mut self.identifiers)?
        } else {
            decoded
        };

        log::info!("Re-indenting code...");
        let formatted = format::format_code(&renamed, &options.indent_unit());

        if !options.add_comments {
            return Ok(formatted);
        }

        log::info!("Adding explanatory comments...");
        let table_name = self.string_table_name();
        annotate::annotate(&formatted, table_name.as_deref())
    }

    /// Name of the string table as it appears after renaming.
    pub fn string_table_name(&self) -> Option<String> {
        let name = self.string_table.variable_name.as_deref()?;
        let mut chars = name.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            if let Some(alias) = self.identifiers.get(letter) {
                return Some(alias.to_string());
            }
        }
        Some(name.to_string())
    }
}

impl Default for DeobfuscateContext {
    fn default() -> Self {
        Self::new()
    }
}
