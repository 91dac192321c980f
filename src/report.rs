use std::fmt;
use std::fs;
use std::path::Path;

use crate::driver::Deobfuscated;
use crate::{DeobfuscateError, Result};

/// Decoded values longer than this are cut in the report.
pub const DISPLAY_LIMIT: usize = 60;

const RULE: &str =
    "===============================================================================";

/// Plain-text summary written next to the deobfuscated file.
pub struct Report<'a> {
    input: &'a Path,
    output: &'a Path,
    timestamp: String,
    result: &'a Deobfuscated,
}

impl<'a> Report<'a> {
    pub fn new(input: &'a Path, output: &'a Path, result: &'a Deobfuscated) -> Self {
        Self {
            input,
            output,
            timestamp: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            result,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| DeobfuscateError::io(path, e))
    }
}

fn truncate_for_display(value: &str) -> String {
    if value.chars().count() > DISPLAY_LIMIT {
        let head: String = value.chars().take(DISPLAY_LIMIT).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "--- {} ---", title)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.result.stats;

        writeln!(f, "{}", RULE)?;
        writeln!(f, "{:^79}", "LUA DEOBFUSCATION REPORT")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        writeln!(f, "Input file:   {}", self.input.display())?;
        writeln!(f, "Output file:  {}", self.output.display())?;
        writeln!(f, "Processed at: {}", self.timestamp)?;

        section(f, "Statistics")?;
        writeln!(f, "Strings decoded:      {}", stats.strings_decoded)?;
        writeln!(f, "Functions found:      {}", stats.functions_found)?;
        writeln!(f, "Lines processed:      {}", stats.lines_processed)?;
        writeln!(f, "Escapes converted:    {}", stats.escapes_converted)?;
        writeln!(f, "Identifiers renamed:  {}", stats.identifiers_renamed)?;
        writeln!(f, "References inlined:   {}", stats.references_inlined)?;

        section(f, "Decoded strings")?;
        if self.result.string_table.is_empty() {
            writeln!(f, "(none)")?;
        }
        for (number, entry) in self.result.string_table.iter().enumerate() {
            writeln!(
                f,
                "{:4}. {:<12} -> '{}'",
                number + 1,
                entry.key,
                truncate_for_display(&entry.value)
            )?;
        }

        section(f, "Renamed identifiers")?;
        if self.result.identifiers.is_empty() {
            writeln!(f, "(none)")?;
        }
        for (original, alias) in self.result.identifiers.iter() {
            writeln!(f, "{} -> {}", original, alias)?;
        }

        section(f, "Functions")?;
        if self.result.functions.is_empty() {
            writeln!(f, "(none)")?;
        }
        for function in &self.result.functions {
            writeln!(
                f,
                "line {:>5}: {} ({})",
                function.line, function.name, function.role
            )?;
        }

        section(f, "Running the result")?;
        writeln!(f, "lua {}", self.output.display())
    }
}
