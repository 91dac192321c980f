use regex::Regex;

use super::escape::{
    EscapePolicy, decode_octal_escapes, normalize_common_escapes, requote_literal,
};

lazy_static::lazy_static! {
    static ref TABLE_DECLARATION: Regex = Regex::new(
        r#"\blocal\s+([A-Za-z_]\w*)\s*=\s*\{\s*((?:"(?:[^"\\]|\\.)*"\s*[,;]?\s*)+)\}"#
    ).unwrap();
    static ref STRING_LITERAL: Regex = Regex::new(r#""((?:[^"\\]|\\.)*)""#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTableEntry {
    /// 1-based position inside the table literal.
    pub index: usize,
    pub key: String,
    pub raw: String,
    /// Decoded text with the common escapes resolved.
    pub value: String,
    /// Quoted Lua literal used when a reference is inlined.
    pub literal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    pub variable_name: Option<String>,
    pub entries: Vec<StringTableEntry>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StringTableEntry> {
        index
            .checked_sub(1)
            .and_then(|position| self.entries.get(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StringTableEntry> {
        self.entries.iter()
    }
}

/// Finds the first `local name = { "..", ".." }` declaration and decodes its
/// members. Later tables in the same source are ignored.
pub fn extract_string_table(source: &str, policy: EscapePolicy) -> StringTable {
    let Some(caps) = TABLE_DECLARATION.captures(source) else {
        log::debug!("No string table declaration found");
        return StringTable::new();
    };

    let variable_name = caps[1].to_string();
    let entries: Vec<StringTableEntry> = STRING_LITERAL
        .captures_iter(&caps[2])
        .enumerate()
        .map(|(position, literal)| {
            let index = position + 1;
            let raw = literal[1].to_string();
            let value = normalize_common_escapes(&decode_octal_escapes(&raw, policy));
            let literal = requote_literal(&raw, policy);
            StringTableEntry {
                index,
                key: format!("{}[{}]", variable_name, index),
                raw,
                value,
                literal,
            }
        })
        .collect();

    log::debug!(
        "String table '{}' holds {} entries",
        variable_name,
        entries.len()
    );

    StringTable {
        variable_name: Some(variable_name),
        entries,
    }
}
