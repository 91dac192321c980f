use rustc_hash::FxHashSet;

pub const RESERVED_WORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Keywords that close the block opened on a previous line.
pub const BLOCK_CLOSERS: &[&str] = &["end", "else", "elseif", "until"];

/// Keywords that open a block continuing on the following lines.
pub const BLOCK_OPENERS: &[&str] = &[
    "function", "if", "for", "while", "repeat", "do", "then", "else",
];

lazy_static::lazy_static! {
    static ref RESERVED_SET: FxHashSet<&'static str> = RESERVED_WORDS.iter().copied().collect();
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED_SET.contains(word)
}
