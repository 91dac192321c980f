use std::fs;
use std::path::{Path, PathBuf};

use crate::deobfuscate::annotate::{FunctionInfo, find_functions};
use crate::deobfuscate::{DeobfuscateContext, IdentifierMap, StringTable};
use crate::options::Options;
use crate::report::Report;
use crate::stats::Statistics;
use crate::{DeobfuscateError, Result};

/// `dir/name.lua` -> `dir/name<suffix>.lua`.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.lua", stem, suffix))
}

#[derive(Debug, Clone)]
pub struct Deobfuscated {
    pub code: String,
    pub string_table: StringTable,
    pub identifiers: IdentifierMap,
    pub functions: Vec<FunctionInfo>,
    pub stats: Statistics,
    /// Set only when the report file was actually written.
    pub report_path: Option<PathBuf>,
}

pub struct Deobfuscator {
    options: Options,
}

impl Deobfuscator {
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Runs every pass over `source` in memory.
    pub fn deobfuscate_source(&self, source: &str) -> Result<Deobfuscated> {
        let mut ctx = DeobfuscateContext::new();
        ctx.analyze(source, self.options.escape_policy)?;
        let code = ctx.deobfuscate(source, &self.options)?;

        let functions = find_functions(&code);
        let stats = Statistics::collect(
            source,
            &code,
            &ctx,
            functions.len(),
            self.options.escape_policy,
        );

        Ok(Deobfuscated {
            code,
            string_table: ctx.string_table,
            identifiers: ctx.identifiers,
            functions,
            stats,
            report_path: None,
        })
    }

    /// Reads `input`, writes the transformed source to `output`, then the
    /// side report. Nothing is written unless every pass succeeded; a
    /// report that cannot be written is logged and skipped.
    pub fn deobfuscate_file(&self, input: &Path, output: &Path) -> Result<Deobfuscated> {
        if !input.is_file() {
            return Err(DeobfuscateError::InputNotFound(input.to_path_buf()));
        }

        log::info!("Reading {}", input.display());
        let bytes = fs::read(input).map_err(|e| DeobfuscateError::io(input, e))?;
        let source = String::from_utf8(bytes).map_err(|e| {
            DeobfuscateError::InvalidInput(format!(
                "'{}' is not valid UTF-8: {}",
                input.display(),
                e
            ))
        })?;

        let mut result = self.deobfuscate_source(&source)?;

        log::info!("Writing result to {}", output.display());
        let mut contents = result.code.clone();
        contents.push('\n');
        fs::write(output, contents).map_err(|e| DeobfuscateError::io(output, e))?;

        if let Some(report_path) = &self.options.report_path {
            let written = Report::new(input, output, &result).write_to(report_path);
            match written {
                Ok(()) => {
                    log::info!("Report written to {}", report_path.display());
                    result.report_path = Some(report_path.clone());
                }
                Err(e) => log::warn!("Skipping report: {}", e),
            }
        }

        if let Some(stats_path) = &self.options.stats_json {
            match write_stats_json(&result.stats, stats_path) {
                Ok(()) => log::info!("Statistics written to {}", stats_path.display()),
                Err(e) => log::warn!("Skipping statistics: {}", e),
            }
        }

        Ok(result)
    }
}

fn write_stats_json(stats: &Statistics, path: &Path) -> Result<()> {
    let json = stats.to_json()?;
    fs::write(path, json).map_err(|e| DeobfuscateError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("scripts/game.lua"), "_deobfuscated"),
            PathBuf::from("scripts/game_deobfuscated.lua")
        );
        assert_eq!(
            default_output_path(Path::new("game"), "_fully_deobfuscated"),
            PathBuf::from("game_fully_deobfuscated.lua")
        );
        assert_eq!(
            default_output_path(Path::new("a.b.txt"), "_x"),
            PathBuf::from("a.b_x.lua")
        );
    }

    #[test]
    fn test_each_run_starts_from_fresh_state() {
        let deobfuscator = Deobfuscator::new(Options::default());

        let first = deobfuscator
            .deobfuscate_source("local a = 1\nlocal J={\"x\"}")
            .unwrap();
        let second = deobfuscator.deobfuscate_source("local b = 2").unwrap();

        assert_eq!(first.identifiers.len(), 2);
        assert_eq!(first.string_table.len(), 1);
        assert_eq!(second.identifiers.len(), 1);
        assert_eq!(second.identifiers.get('a'), None);
        assert!(second.string_table.is_empty());
        assert_eq!(first.report_path, None);
    }

    #[test]
    fn test_missing_input_is_reported() {
        let deobfuscator = Deobfuscator::new(Options::default());
        let err = deobfuscator
            .deobfuscate_file(
                Path::new("definitely/not/here.lua"),
                Path::new("definitely/not/here_deobfuscated.lua"),
            )
            .unwrap_err();

        assert!(matches!(err, DeobfuscateError::InputNotFound(_)));
    }
}
