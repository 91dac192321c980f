use std::fmt;
use std::str::FromStr;

use regex::{Captures, Regex};

/// What to do with an octal escape whose value is not printable ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapePolicy {
    /// Leave the `\ddd` text untouched.
    #[default]
    Preserve,
    /// Replace with the octal digits in brackets, e.g. `[001]`.
    Bracket,
    /// Drop the escape; tab, newline and carriage return survive as characters.
    Filter,
}

impl FromStr for EscapePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "bracket" => Ok(Self::Bracket),
            "filter" => Ok(Self::Filter),
            other => Err(format!(
                "unknown escape policy '{}' (expected preserve, bracket or filter)",
                other
            )),
        }
    }
}

impl fmt::Display for EscapePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preserve => "preserve",
            Self::Bracket => "bracket",
            Self::Filter => "filter",
        };
        f.write_str(name)
    }
}

lazy_static::lazy_static! {
    // An escaped backslash is consumed as a pair so `\\101` is never decoded.
    static ref OCTAL_ESCAPE: Regex = Regex::new(r"\\(?:\\|([0-7]{3}))").unwrap();
    static ref DOUBLE_QUOTED: Regex = Regex::new(r#""((?:[^"\\\n]|\\.)*)""#).unwrap();
}

const PRINTABLE: std::ops::RangeInclusive<u32> = 32..=126;

pub fn decode_octal_escapes(text: &str, policy: EscapePolicy) -> String {
    decode_with(text, policy, false)
}

/// Decodes octal escapes inside double-quoted literals only, keeping each
/// literal well formed.
pub fn decode_string_literals(source: &str, policy: EscapePolicy) -> String {
    DOUBLE_QUOTED
        .replace_all(source, |caps: &Captures<'_>| {
            let content = &caps[1];
            if count_octal_escapes(content) == 0 {
                return caps[0].to_string();
            }
            requote_literal(content, policy)
        })
        .into_owned()
}

/// Decodes the body of a double-quoted literal and quotes it again.
/// Escapes left undecoded are copied through as written.
pub fn requote_literal(body: &str, policy: EscapePolicy) -> String {
    format!("\"{}\"", decode_with(body, policy, true))
}

pub fn count_octal_escapes(text: &str) -> usize {
    OCTAL_ESCAPE
        .captures_iter(text)
        .filter(|caps| caps.get(1).is_some())
        .count()
}

/// Octal escapes that `policy` rewrites. Under `Preserve` only the printable
/// ones change.
pub fn count_converted_escapes(text: &str, policy: EscapePolicy) -> usize {
    OCTAL_ESCAPE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|digits| policy != EscapePolicy::Preserve || is_printable_escape(digits.as_str()))
        .count()
}

fn is_printable_escape(digits: &str) -> bool {
    u32::from_str_radix(digits, 8).is_ok_and(|code| PRINTABLE.contains(&code))
}

fn decode_with(text: &str, policy: EscapePolicy, in_literal: bool) -> String {
    OCTAL_ESCAPE
        .replace_all(text, |caps: &Captures<'_>| {
            caps.get(1).map_or_else(
                || caps[0].to_string(),
                |digits| decode_one(&caps[0], digits.as_str(), policy, in_literal),
            )
        })
        .into_owned()
}

fn decode_one(original: &str, digits: &str, policy: EscapePolicy, in_literal: bool) -> String {
    let Ok(code) = u32::from_str_radix(digits, 8) else {
        return original.to_string();
    };

    if PRINTABLE.contains(&code) {
        let ch = char::from(code as u8);
        return match ch {
            '"' | '\\' if in_literal => format!("\\{}", ch),
            _ => ch.to_string(),
        };
    }

    match policy {
        EscapePolicy::Preserve => original.to_string(),
        EscapePolicy::Bracket => format!("[{}]", digits),
        EscapePolicy::Filter => match code {
            9 | 10 | 13 if in_literal => escape_control(char::from(code as u8)),
            9 | 10 | 13 => char::from(code as u8).to_string(),
            _ => String::new(),
        },
    }
}

fn escape_control(ch: char) -> String {
    match ch {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        other => other.to_string(),
    }
}

/// Turns the two-character escapes `\n \t \r \" \' \\` into the characters
/// they stand for. Unknown escapes are kept verbatim.
pub fn normalize_common_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let replacement = match chars.peek() {
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('r') => Some('\r'),
            Some('"') => Some('"'),
            Some('\'') => Some('\''),
            Some('\\') => Some('\\'),
            _ => None,
        };

        if let Some(replacement) = replacement {
            result.push(replacement);
            chars.next();
        } else {
            result.push(ch);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_escape() {
        assert_eq!(decode_octal_escapes(r"\101", EscapePolicy::Preserve), "A");
        assert_eq!(
            decode_octal_escapes(r"\110\151\041", EscapePolicy::Preserve),
            "Hi!"
        );
    }

    #[test]
    fn test_every_printable_code_decodes_to_its_character() {
        for code in 32u8..=126 {
            let escape = format!("\\{:03o}", code);
            for policy in [
                EscapePolicy::Preserve,
                EscapePolicy::Bracket,
                EscapePolicy::Filter,
            ] {
                assert_eq!(
                    decode_octal_escapes(&escape, policy),
                    char::from(code).to_string(),
                    "escape {} under {}",
                    escape,
                    policy
                );
            }
        }
    }

    #[test]
    fn test_preserve_keeps_non_printable_escapes() {
        for escape in [r"\000", r"\001", r"\012", r"\177", r"\377", r"\777"] {
            assert_eq!(decode_octal_escapes(escape, EscapePolicy::Preserve), escape);
        }
    }

    #[test]
    fn test_malformed_escapes_are_untouched() {
        for text in [r"\189", r"\9", r"\12", r"\x41", r"\"] {
            for policy in [
                EscapePolicy::Preserve,
                EscapePolicy::Bracket,
                EscapePolicy::Filter,
            ] {
                assert_eq!(decode_octal_escapes(text, policy), text);
            }
        }
    }

    #[test]
    fn test_bracket_policy_marks_non_printables() {
        assert_eq!(
            decode_octal_escapes(r"a\001b\377", EscapePolicy::Bracket),
            "a[001]b[377]"
        );
    }

    #[test]
    fn test_filter_policy_strips_but_keeps_whitespace() {
        assert_eq!(
            decode_octal_escapes(r"a\000b\012c\011d\015e\177", EscapePolicy::Filter),
            "ab\nc\td\re"
        );
    }

    #[test]
    fn test_escaped_backslash_is_not_decoded() {
        assert_eq!(
            decode_octal_escapes(r"\\101", EscapePolicy::Preserve),
            r"\\101"
        );
        assert_eq!(count_octal_escapes(r"\\101\102"), 1);
    }

    #[test]
    fn test_decoding_without_escapes_is_identity() {
        let text = "local x = \"plain\" -- nothing to do here \\n";
        assert_eq!(decode_octal_escapes(text, EscapePolicy::Preserve), text);
        assert_eq!(decode_string_literals(text, EscapePolicy::Filter), text);

        let once = decode_octal_escapes(r"\101\102", EscapePolicy::Filter);
        assert_eq!(decode_octal_escapes(&once, EscapePolicy::Filter), once);
    }

    #[test]
    fn test_decode_string_literals_only_touches_literals() {
        let source = r#"local a = "\150\151" .. b\101"#;
        let decoded = decode_string_literals(source, EscapePolicy::Preserve);
        assert_eq!(decoded, r#"local a = "hi" .. b\101"#);
    }

    #[test]
    fn test_decoded_quote_stays_escaped_in_literal() {
        let decoded = decode_string_literals(r#"print("\042\134")"#, EscapePolicy::Preserve);
        assert_eq!(decoded, r#"print("\"\\")"#);
    }

    #[test]
    fn test_filter_in_literal_keeps_escape_form() {
        let decoded = decode_string_literals(r#"x = "a\012b\000""#, EscapePolicy::Filter);
        assert_eq!(decoded, r#"x = "a\nb""#);
    }

    #[test]
    fn test_normalize_common_escapes() {
        assert_eq!(normalize_common_escapes(r"a\nb"), "a\nb");
        assert_eq!(normalize_common_escapes(r#"\"q\" \'s\'"#), "\"q\" 's'");
        assert_eq!(normalize_common_escapes(r"c:\\temp"), r"c:\temp");
        assert_eq!(normalize_common_escapes(r"\\n"), r"\n");
        assert_eq!(normalize_common_escapes(r"\q"), r"\q");
    }

    #[test]
    fn test_requote_literal_keeps_undecoded_escapes() {
        assert_eq!(requote_literal(r"\101\102", EscapePolicy::Preserve), "\"AB\"");
        assert_eq!(requote_literal(r"a\001", EscapePolicy::Preserve), r#""a\001""#);
        assert_eq!(requote_literal(r"\x41", EscapePolicy::Preserve), r#""\x41""#);
        assert_eq!(requote_literal(r#"say \"hi\"\n"#, EscapePolicy::Preserve), r#""say \"hi\"\n""#);
        assert_eq!(requote_literal(r"c:\\temp", EscapePolicy::Filter), r#""c:\\temp""#);
    }

    #[test]
    fn test_count_converted_escapes_follows_policy() {
        let text = r"\101\001\\102\377";
        assert_eq!(count_octal_escapes(text), 3);
        assert_eq!(count_converted_escapes(text, EscapePolicy::Preserve), 1);
        assert_eq!(count_converted_escapes(text, EscapePolicy::Bracket), 3);
        assert_eq!(count_converted_escapes(text, EscapePolicy::Filter), 3);
        assert_eq!(count_converted_escapes("plain", EscapePolicy::Filter), 0);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("filter".parse::<EscapePolicy>(), Ok(EscapePolicy::Filter));
        assert_eq!("BRACKET".parse::<EscapePolicy>(), Ok(EscapePolicy::Bracket));
        assert!("drop".parse::<EscapePolicy>().is_err());
        assert_eq!(EscapePolicy::default().to_string(), "preserve");
    }
}
