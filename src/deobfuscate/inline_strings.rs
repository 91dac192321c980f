use regex::{Captures, Regex};

use super::string_table::StringTable;
use crate::Result;

/// Replaces `name[index]` references with the entry's quoted literal.
/// Returns the rewritten source and the number of references replaced.
pub fn inline_string_table(source: &str, table: &StringTable) -> Result<(String, usize)> {
    let Some(name) = table.variable_name.as_deref() else {
        return Ok((source.to_string(), 0));
    };
    if table.is_empty() {
        return Ok((source.to_string(), 0));
    }

    let reference = Regex::new(&format!(r"\b{}\s*\[\s*(\d+)\s*\]", regex::escape(name)))?;
    let mut replaced = 0usize;

    let inlined = reference.replace_all(source, |caps: &Captures<'_>| {
        let entry = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| table.get(index));

        match entry {
            Some(entry) => {
                replaced += 1;
                entry.literal.clone()
            }
            None => caps[0].to_string(),
        }
    });

    log::debug!("Inlined {} references to '{}'", replaced, name);
    Ok((inlined.into_owned(), replaced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deobfuscate::escape::EscapePolicy;
    use crate::deobfuscate::string_table::extract_string_table;

    fn inline(source: &str) -> (String, usize) {
        let table = extract_string_table(source, EscapePolicy::Preserve);
        inline_string_table(source, &table).unwrap()
    }

    #[test]
    fn test_inline_references() {
        let (code, count) = inline("local J={\"\\101\\102\",\"x\"}\nprint(J[1], J[ 2 ])");
        assert_eq!(count, 2);
        assert!(code.ends_with("print(\"AB\", \"x\")"), "got: {}", code);
    }

    #[test]
    fn test_out_of_range_reference_is_kept() {
        let (code, count) = inline("local J={\"a\"}\nprint(J[2], J[0])");
        assert_eq!(count, 0);
        assert!(code.contains("print(J[2], J[0])"));
    }

    #[test]
    fn test_longer_names_are_not_matched() {
        let (code, count) = inline("local J={\"a\"}\nprint(XJ[1], J[10])");
        assert_eq!(count, 0);
        assert!(code.contains("XJ[1]"));
        assert!(code.contains("J[10]"));
    }

    #[test]
    fn test_inlined_value_is_requoted() {
        let (code, _) = inline("local J={\"say \\\"hi\\\"\\n\"}\nprint(J[1])");
        assert!(
            code.ends_with(r#"print("say \"hi\"\n")"#),
            "got: {}",
            code
        );
    }

    #[test]
    fn test_undecoded_escapes_are_inlined_verbatim() {
        let (code, count) = inline("local J={\"a\\001\",\"\\x41\"}\nprint(J[1], J[2])");
        assert_eq!(count, 2);
        assert!(
            code.ends_with(r#"print("a\001", "\x41")"#),
            "got: {}",
            code
        );
    }

    #[test]
    fn test_escaped_backslash_is_inlined_verbatim() {
        let (code, _) = inline("local J={\"c:\\\\temp\\\\101\"}\nprint(J[1])");
        assert!(code.ends_with(r#"print("c:\\temp\\101")"#), "got: {}", code);
    }

    #[test]
    fn test_no_table_is_noop() {
        let source = "print(J[1])";
        let (code, count) = inline(source);
        assert_eq!(code, source);
        assert_eq!(count, 0);
    }
}
