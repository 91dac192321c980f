//! # lua-deobfuscator-rs
//!
//! Best-effort cleanup of obfuscated Lua sources: decodes octal string
//! tables, gives single-letter identifiers readable names, re-indents blocks
//! and annotates functions.
//!
//! ## Example
//!
//! ```rust
//! use lua_deobfuscator_rs::{Deobfuscator, Options};
//!
//! let source = "local J={\"\\101\\102\"}\nprint(J[1])";
//! let deobfuscator = Deobfuscator::new(Options::default());
//! let result = deobfuscator.deobfuscate_source(source).expect("deobfuscation failed");
//! assert!(result.code.contains("print(\"AB\")"));
//! ```

use std::path::PathBuf;

pub mod deobfuscate;
pub mod driver;
pub mod keywords;
pub mod options;
pub mod output;
pub mod report;
pub mod stats;

pub use deobfuscate::DeobfuscateContext;
pub use deobfuscate::escape::EscapePolicy;
pub use driver::{Deobfuscated, Deobfuscator, default_output_path};
pub use options::Options;
pub use stats::Statistics;

#[derive(Debug, thiserror::Error)]
pub enum DeobfuscateError {
    #[error("input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to serialize statistics: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DeobfuscateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeobfuscateError>;
