use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::Result;
use crate::keywords::is_reserved;

/// Role-based guesses for the single letters obfuscators like to use.
const ALIAS_TABLE: &[(char, &str)] = &[
    ('J', "stringTable"),
    ('l', "local_var"),
    ('o', "object"),
    ('e', "element"),
    ('n', "number"),
    ('r', "result"),
    ('t', "table"),
    ('f', "function_ref"),
    ('a', "argument"),
    ('i', "index"),
    ('v', "value"),
    ('x', "x_pos"),
    ('y', "y_pos"),
    ('w', "width"),
    ('h', "height"),
    ('c', "color"),
    ('d', "data"),
    ('s', "string"),
    ('p', "position"),
    ('g', "game"),
    ('u', "user"),
    ('m', "mouse"),
    ('k', "key"),
];

lazy_static::lazy_static! {
    static ref LOCAL_DECLARATION: Regex = Regex::new(r"\blocal\s+([A-Za-z])\s*=").unwrap();
    static ref FUNCTION_DECLARATION: Regex = Regex::new(r"\bfunction\s+([A-Za-z])\s*\(").unwrap();
}

/// Original identifier to alias, kept in the order names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    aliases: Vec<(char, String)>,
    index: FxHashMap<char, usize>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn get(&self, original: char) -> Option<&str> {
        self.index
            .get(&original)
            .map(|&position| self.aliases[position].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.aliases
            .iter()
            .map(|(original, alias)| (*original, alias.as_str()))
    }

    /// Returns the alias for `original`, creating it on first use.
    pub fn alias_for(&mut self, original: char) -> String {
        if let Some(alias) = self.get(original) {
            return alias.to_string();
        }

        let alias = self.generate_alias(original);
        self.index.insert(original, self.aliases.len());
        self.aliases.push((original, alias.clone()));
        alias
    }

    fn generate_alias(&self, original: char) -> String {
        let base = ALIAS_TABLE
            .iter()
            .find(|(letter, _)| *letter == original)
            .map_or_else(|| format!("var_{}", original), |(_, alias)| (*alias).to_string());

        let alias = avoid_reserved(base);
        if !self.is_taken(&alias) {
            return alias;
        }

        let mut suffix = 2usize;
        loop {
            let candidate = format!("{}_{}", alias, suffix);
            if !self.is_taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn is_taken(&self, alias: &str) -> bool {
        self.aliases.iter().any(|(_, existing)| existing == alias)
    }
}

fn avoid_reserved(alias: String) -> String {
    if is_reserved(&alias) {
        format!("{}_var", alias)
    } else {
        alias
    }
}

/// A letter right after a backslash is part of an escape such as `\n`.
fn follows_backslash(code: &str, start: usize) -> bool {
    start > 0 && code.as_bytes()[start - 1] == b'\\'
}

/// Renames single-letter names declared as `local x =` or `function x(`.
/// Every whole-word occurrence is rewritten, regardless of scope, except
/// escape letters inside strings.
pub fn rename_identifiers(source: &str, map: &mut IdentifierMap) -> Result<String> {
    let mut code = source.to_string();

    for declaration in [&*LOCAL_DECLARATION, &*FUNCTION_DECLARATION] {
        let mut found: Vec<char> = Vec::new();
        for caps in declaration.captures_iter(&code) {
            if let Some(letter) = caps[1].chars().next() {
                if !found.contains(&letter) {
                    found.push(letter);
                }
            }
        }

        for letter in found {
            let alias = map.alias_for(letter);
            let word = Regex::new(&format!(r"\b{}\b", regex::escape(&letter.to_string())))?;
            log::debug!("Renaming '{}' -> '{}'", letter, alias);
            code = word
                .replace_all(&code, |caps: &Captures<'_>| {
                    let start = caps.get(0).map_or(0, |m| m.start());
                    if follows_backslash(&code, start) {
                        caps[0].to_string()
                    } else {
                        alias.clone()
                    }
                })
                .into_owned();
        }
    }

    Ok(code)
}
