use std::fmt;

use regex::Regex;

use crate::Result;
use crate::output::Output;

pub const HEADER: &str = "--[[
    DEOBFUSCATED LUA SOURCE
    Produced by lua-deobfuscator-rs

    String-table references were replaced with their decoded values,
    single-letter identifiers were renamed and blocks were re-indented.
    The result is best effort and may need manual review.

    Layout:
    - Decoded string table
    - Function definitions
    - Main program logic
--]]
";

lazy_static::lazy_static! {
    static ref FUNCTION_SIGNATURE: Regex =
        Regex::new(r"\bfunction\s+([A-Za-z_]\w*(?:[.:][A-Za-z_]\w*)*)\s*\(").unwrap();
    static ref MAIN_RETURN: Regex = Regex::new(r"^return\s*\(").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRole {
    Initialize,
    Update,
    Render,
    Load,
    Utility,
}

impl FunctionRole {
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("init") {
            Self::Initialize
        } else if lower.contains("update") {
            Self::Update
        } else if lower.contains("draw") || lower.contains("render") {
            Self::Render
        } else if lower.contains("load") {
            Self::Load
        } else {
            Self::Utility
        }
    }
}

impl fmt::Display for FunctionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::Update => "update",
            Self::Render => "render",
            Self::Load => "load",
            Self::Utility => "utility",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub role: FunctionRole,
    /// 1-based line of the signature.
    pub line: usize,
}

pub fn find_functions(source: &str) -> Vec<FunctionInfo> {
    source
        .lines()
        .enumerate()
        .flat_map(|(number, line)| {
            FUNCTION_SIGNATURE.captures_iter(line).map(move |caps| {
                let name = caps[1].to_string();
                FunctionInfo {
                    role: FunctionRole::classify(&name),
                    name,
                    line: number + 1,
                }
            })
        })
        .collect()
}

enum LineRule {
    StringTable(Regex),
    MainReturn,
}

impl LineRule {
    fn matches(&self, line: &str) -> bool {
        match self {
            Self::StringTable(pattern) => pattern.is_match(line),
            Self::MainReturn => MAIN_RETURN.is_match(line),
        }
    }

    const fn comment(&self) -> &'static str {
        match self {
            Self::StringTable(_) => "-- Decoded string table",
            Self::MainReturn => "-- Main return",
        }
    }
}

/// Prepends the header and inserts a sibling comment line above the string
/// table declaration, the main `return (` and every named function.
pub fn annotate(source: &str, string_table_name: Option<&str>) -> Result<String> {
    let mut rules = Vec::with_capacity(2);
    if let Some(name) = string_table_name {
        rules.push(LineRule::StringTable(Regex::new(&format!(
            r"^local\s+{}\s*=\s*\{{",
            regex::escape(name)
        ))?));
    }
    rules.push(LineRule::MainReturn);

    let mut output = Output::new(String::new());
    for line in HEADER.lines() {
        output.add_raw_line(line);
    }
    output.add_raw_line("");

    for line in source.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if let Some(rule) = rules.iter().find(|rule| rule.matches(trimmed)) {
            output.add_raw_line(&format!("{}{}", indent, rule.comment()));
        }

        for caps in FUNCTION_SIGNATURE.captures_iter(trimmed) {
            let name = &caps[1];
            output.add_raw_line(&format!(
                "{}-- Function: {} ({})",
                indent,
                name,
                FunctionRole::classify(name)
            ));
        }

        output.add_raw_line(line);
    }

    Ok(output.into_string())
}
