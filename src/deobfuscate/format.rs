use regex::Regex;

use crate::keywords::{BLOCK_CLOSERS, BLOCK_OPENERS};
use crate::output::Output;

lazy_static::lazy_static! {
    static ref CLOSES_BLOCK: Regex =
        Regex::new(&format!(r"^(?:{})\b", BLOCK_CLOSERS.join("|"))).unwrap();
    static ref OPENS_BLOCK: Regex =
        Regex::new(&format!(r"\b(?:{})\b", BLOCK_OPENERS.join("|"))).unwrap();
    // `else`/`elseif` reopen what they close, so only these cancel an opener.
    static ref ENDS_ON_SAME_LINE: Regex = Regex::new(r"\b(?:end|until)\b").unwrap();
}

/// Line-based re-indentation driven by block keywords. Blank lines are
/// dropped. Not a parser: one-line forms such as `for .. do if .. end` that
/// open more blocks than they close are under-indented.
pub fn format_code(source: &str, indent_unit: &str) -> String {
    let mut output = Output::new(indent_unit.to_string());

    for raw in source.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if CLOSES_BLOCK.is_match(line) {
            output.remove_indent();
        }

        output.add_line(line);

        if OPENS_BLOCK.is_match(line) && !ENDS_ON_SAME_LINE.is_match(line) {
            output.add_indent();
        }
    }

    output.into_string()
}
