use serde::Serialize;

use crate::deobfuscate::DeobfuscateContext;
use crate::deobfuscate::escape::{EscapePolicy, count_converted_escapes};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub strings_decoded: usize,
    pub functions_found: usize,
    pub lines_processed: usize,
    pub escapes_converted: usize,
    pub identifiers_renamed: usize,
    pub references_inlined: usize,
}

impl Statistics {
    /// Computed once, after every pass has run. Escapes left as written by
    /// `policy` are not counted as converted.
    pub fn collect(
        original: &str,
        final_code: &str,
        ctx: &DeobfuscateContext,
        functions_found: usize,
        policy: EscapePolicy,
    ) -> Self {
        Self {
            strings_decoded: ctx.string_table.len(),
            functions_found,
            lines_processed: final_code.lines().count(),
            escapes_converted: count_converted_escapes(original, policy),
            identifiers_renamed: ctx.identifiers.len(),
            references_inlined: ctx.inlined_references,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
