//! `pattern` keyword handling.
//!
//! A pattern is either a bare regex body (`^h`) or a delimited literal
//! (`/^h/i`). Bodies use ECMAScript syntax: `\d`, `\w` and `\b` are ASCII,
//! look-around and backreferences are allowed. Matching is an unanchored
//! search, like `RegExp.test`.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static DELIMITED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(.+)/([gimuy]*)$").expect("delimited pattern regex"));

const WORD: &str = "A-Za-z0-9_";

#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    body: String,
    flags: String,
    matcher: Matcher,
}

/// Linear-time engine unless the body needs backtracking.
#[derive(Debug, Clone)]
enum Matcher {
    Linear(Regex),
    Backtracking(fancy_regex::Regex),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Pattern {
    pub fn parse(source: &str) -> Result<Self> {
        let (body, flags) = match DELIMITED.captures(source) {
            Some(caps) => (caps[1].to_string(), caps[2].to_string()),
            None => (source.to_string(), String::new()),
        };
        let invalid = |err: Box<dyn std::error::Error + Send + Sync>| Error::InvalidPattern {
            pattern: source.to_string(),
            source: err,
        };

        let backtracking = needs_backtracking(&body);
        let mut effective = String::new();
        if flags.contains('i') {
            effective.push_str("(?i)");
        }
        if flags.contains('m') {
            effective.push_str("(?m)");
        }
        // sticky: only a match starting at offset 0 counts
        if flags.contains('y') {
            effective.push_str(r"\A(?:");
            effective.push_str(&translate(&body, backtracking));
            effective.push(')');
        } else {
            effective.push_str(&translate(&body, backtracking));
        }

        let matcher = if backtracking {
            fancy_regex::Regex::new(&effective)
                .map(Matcher::Backtracking)
                .map_err(|err| invalid(Box::new(err)))?
        } else {
            Regex::new(&effective)
                .map(Matcher::Linear)
                .map_err(|err| invalid(Box::new(err)))?
        };
        tracing::trace!(pattern = %source, %effective, backtracking, "compiled pattern");
        Ok(Self { source: source.to_string(), body, flags, matcher })
    }

    pub fn is_match(&self, s: &str) -> bool {
        match &self.matcher {
            Matcher::Linear(regex) => regex.is_match(s),
            Matcher::Backtracking(regex) => regex.is_match(s).unwrap_or_else(|err| {
                tracing::warn!(pattern = %self.source, %err, "pattern gave up, treating as no match");
                false
            }),
        }
    }

    /// The keyword value as written in the schema.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.body, self.flags)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Look-around or a backreference (`\1`, `\k<name>`).
fn needs_backtracking(body: &str) -> bool {
    if ["(?=", "(?!", "(?<=", "(?<!"].iter().any(|la| body.contains(la)) {
        return true;
    }
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('1'..='9') | Some('k') => return true,
                _ => {}
            }
        }
    }
    false
}

/// Rewrite the ECMAScript class escapes into their ASCII meaning.
fn translate(body: &str, backtracking: bool) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&translate_escape(escaped, in_class, backtracking)),
                None => out.push('\\'),
            },
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn translate_escape(escaped: char, in_class: bool, backtracking: bool) -> String {
    match (escaped, in_class) {
        ('d', true) => "0-9".to_string(),
        ('d', false) => "[0-9]".to_string(),
        ('D', _) => "[^0-9]".to_string(),
        ('w', true) => WORD.to_string(),
        ('w', false) => format!("[{WORD}]"),
        ('W', _) => format!("[^{WORD}]"),
        // backspace inside a class
        ('b', true) => r"\x08".to_string(),
        ('b', false) if backtracking => format!(
            "(?:(?<=[{WORD}])(?![{WORD}])|(?<![{WORD}])(?=[{WORD}]))"
        ),
        ('b', false) => r"(?-u:\b)".to_string(),
        ('B', false) if backtracking => format!(
            "(?:(?<=[{WORD}])(?=[{WORD}])|(?<![{WORD}])(?![{WORD}]))"
        ),
        ('B', false) => r"(?-u:\B)".to_string(),
        (other, _) => format!("\\{other}"),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_body_is_unanchored() {
        let p = Pattern::parse("^h").unwrap();
        assert_eq!(p.flags(), "");
        assert!(p.is_match("hello"));
        assert!(!p.is_match("aaa"));

        let p = Pattern::parse("ell").unwrap();
        assert!(p.is_match("hello"));
    }

    #[test]
    fn delimited_literal_with_flags() {
        let p = Pattern::parse("/^h/i").unwrap();
        assert_eq!(p.body(), "^h");
        assert_eq!(p.flags(), "i");
        assert!(p.is_match("Hello"));
    }

    #[test]
    fn multiline_flag() {
        let p = Pattern::parse("/^b$/m").unwrap();
        assert!(p.is_match("a\nb\nc"));
        let p = Pattern::parse("^b$").unwrap();
        assert!(!p.is_match("a\nb\nc"));
    }

    #[test]
    fn sticky_flag_anchors_at_start() {
        let p = Pattern::parse("/b/y").unwrap();
        assert!(p.is_match("bc"));
        assert!(!p.is_match("ab"));
    }

    #[test]
    fn unknown_flags_keep_the_whole_string() {
        let p = Pattern::parse("/a/x").unwrap();
        assert_eq!(p.body(), "/a/x");
        assert!(p.is_match("1/a/x2"));
    }

    #[test]
    fn invalid_body_is_an_error() {
        assert!(matches!(Pattern::parse("(unclosed"), Err(Error::InvalidPattern { .. })));
        assert!(matches!(Pattern::parse("(?=unclosed"), Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn digit_class_is_ascii() {
        let p = Pattern::parse(r"^\d{3}$").unwrap();
        assert!(p.is_match("123"));
        assert!(!p.is_match("١٢٣"));
        let p = Pattern::parse(r"^\D+$").unwrap();
        assert!(p.is_match("١٢٣"));
        assert!(!p.is_match("1"));
    }

    #[test]
    fn word_class_is_ascii() {
        let p = Pattern::parse(r"^\w+$").unwrap();
        assert!(p.is_match("a_1"));
        assert!(!p.is_match("é"));
        let p = Pattern::parse(r"^\W$").unwrap();
        assert!(p.is_match("é"));
    }

    #[test]
    fn escapes_inside_brackets() {
        let p = Pattern::parse(r"^[\dx]+$").unwrap();
        assert!(p.is_match("1x2"));
        assert!(!p.is_match("١"));
        let p = Pattern::parse(r"^[\w-]+$").unwrap();
        assert!(p.is_match("a-b_c"));
        assert!(!p.is_match("ä"));
    }

    #[test]
    fn word_boundary_is_ascii() {
        // `é` is not an ASCII word char, so there is a boundary before `f`
        let p = Pattern::parse(r"\bfoo").unwrap();
        assert!(p.is_match("éfoo"));
        assert!(!p.is_match("afoo"));
        let p = Pattern::parse(r"a\Bb").unwrap();
        assert!(p.is_match("ab"));
    }

    #[test]
    fn whitespace_class_keeps_unicode_spaces() {
        let p = Pattern::parse(r"^\s$").unwrap();
        assert!(p.is_match("\u{a0}"));
        assert!(p.is_match("\t"));
        assert!(!p.is_match("x"));
    }

    #[test]
    fn escaped_backslash_is_literal() {
        let p = Pattern::parse(r"^\\d$").unwrap();
        assert!(p.is_match(r"\d"));
        assert!(!p.is_match("1"));
    }

    #[test]
    fn negative_lookahead() {
        let p = Pattern::parse("^(?!admin$).+").unwrap();
        assert!(p.is_match("bob"));
        assert!(p.is_match("admins"));
        assert!(!p.is_match("admin"));
    }

    #[test]
    fn lookbehind() {
        let p = Pattern::parse(r"(?<=\$)\d+").unwrap();
        assert!(p.is_match("$12"));
        assert!(!p.is_match("12"));
    }

    #[test]
    fn backreferences() {
        let p = Pattern::parse(r"^(a)\1$").unwrap();
        assert!(p.is_match("aa"));
        assert!(!p.is_match("ab"));
        let p = Pattern::parse(r"/^(\w)\1$/i").unwrap();
        assert!(p.is_match("bb"));
        assert!(!p.is_match("bc"));
    }

    #[test]
    fn word_boundary_with_lookaround() {
        let p = Pattern::parse(r"\bcat\b(?!s)").unwrap();
        assert!(p.is_match("a cat"));
        assert!(p.is_match("écat"));
        assert!(!p.is_match("cats"));
        assert!(!p.is_match("bobcat"));
    }
}
