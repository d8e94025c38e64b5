//! Built-in case corpus.
//!
//! Correctness cases cover alternation, nesting, the three quantifiers,
//! counted repetition, character classes and their negations, predefined
//! classes, escapes, NUL and high bytes, and CR/LF handling. Benchmark cases
//! are patterns that are pathological for backtracking engines, plus a few
//! realistic ones. Sliding-window benchmarks stream a large text corpus in
//! 40-byte windows.

use anyhow::Result;

use crate::domain::cases::{CaseListBuilder, DEFAULT_PROVIDER};
use crate::domain::escape;
use crate::ports::CaseProvider;

/// The built-in provider. Holds the text corpus used by the sliding-window
/// benchmarks.
pub struct DefaultCases {
    corpus: Vec<u8>,
}

impl DefaultCases {
    pub fn new(corpus: Vec<u8>) -> DefaultCases {
        DefaultCases { corpus }
    }
}

impl CaseProvider for DefaultCases {
    fn name(&self) -> &str {
        DEFAULT_PROVIDER
    }

    fn provide(&self, b: &mut CaseListBuilder) -> Result<()> {
        b.add("[a]|[b-b]", "", false)?;
        b.add("[a]|[b-b]", "a", true)?;
        b.add("[a]|[b-b]", "aa", false)?;
        b.add("[a]|[b-b]", "b", true)?;
        b.add("[a]|[b-b]", "ab", false)?;
        b.add("[a]|[b-b]", "ba", false)?;
        b.add("[a]|[b-b]", " aa", false)?;
        b.add("[a]|[b-b]", "aa aa", false)?;
        b.add("([a]|[b-b])*", "", true)?;
        b.add("([a]|[b-b])*", "a", true)?;
        b.add("([a]|[b-b])*", "aa", true)?;
        b.add("([a]|[b-b])*", "b", true)?;
        b.add("([a]|[b-b])*", "ab", true)?;
        b.add("([a]|[b-b])*", "ba", true)?;
        b.add("([a]|[b-b])*", " aa", false)?;
        b.add("([a]|[b-b])*", "aa aa", false)?;
        b.add("([a]|[b-b])+", "", false)?;
        b.add("([a]|[b-b])+", "a", true)?;
        b.add("([a]|[b-b])+", "aa", true)?;
        b.add("([a]|[b-b])+", "b", true)?;
        b.add("([a]|[b-b])+", "ab", true)?;
        b.add("([a]|[b-b])+", "ba", true)?;
        b.add("([a]|[b-b])+", " aa", false)?;
        b.add("([a]|[b-b])+", "aa aa", false)?;
        b.add("((..)|(.))", "", false)?;
        b.add("((..)|(.))((..)|(.))", "", false)?;
        b.add("((..)|(.))+", "", false)?;
        b.add("((..)|(.)){3}", "", false)?;
        b.add("((..)|(.))*", "", true)?;
        b.add("((..)|(.))", "a", true)?;
        b.add("((..)|(.))((..)|(.))", "a", false)?;
        b.add("((..)|(.))+", "a", true)?;
        b.add("((..)|(.)){3}", "a", false)?;
        b.add("((..)|(.))*", "a", true)?;
        b.add("a(b?)?", "ab", true)?;
        b.add("(a*)*", "", true)?;
        b.add("(a*)*", "a", true)?;
        b.add("(a*)*", "x", false)?;
        b.add("(a+)*", "", true)?;
        b.add("(a+)*", "a", true)?;
        b.add("(a+)*", "x", false)?;
        b.add("(a*)+", "", true)?;
        b.add("(a*)+", "a", true)?;
        b.add("(a*)+", "x", false)?;
        b.add("(a+)+", "", false)?;
        b.add("(a+)+", "a", true)?;
        b.add("(a+)+", "x", false)?;
        b.add("", "", true)?;
        b.add("", "a", false)?;
        b.add("|", "", true)?;
        b.add("|", "a", false)?;
        b.add("a* ?", "", true)?;
        b.add("a* ?", "aaa", true)?;
        b.add("a* ?", " ", true)?;
        b.add("a* ?", "  ", false)?;
        b.add("a* ?", "aaa ", true)?;
        b.add("a* ?", "a a", false)?;
        b.add("\u{01}.?[\u{c0}-\u{ff}]+\u{02}", "\u{01}\u{03}\u{c8}\u{d0}\u{02}", true)?;
        b.add("[.]", "a", false)?;
        b.add("[.]", ".", true)?;
        b.add("[.]", "", false)?;
        b.add("[^.]", "a", true)?;
        b.add("[^.]", ".", false)?;
        b.add("[^.]", "", false)?;
        b.add(r"\**", "", true)?;
        b.add(r"\**", "*", true)?;
        b.add(r"\**", "**", true)?;
        b.add(r"\++", "", false)?;
        b.add(r"\++", "+", true)?;
        b.add(r"\++", "++", true)?;
        b.add(r"\?+", "", false)?;
        b.add(r"\?+", "?", true)?;
        b.add(r"\?+", "??", true)?;
        b.add(r"(\??)?", "", true)?;
        b.add(r"(\??)?", "?", true)?;
        b.add(r"(\??)?", "??", false)?;
        b.add(r"(\?+)?", "", true)?;
        b.add(r"(\?+)?", "?", true)?;
        b.add(r"(\?+)?", "??", true)?;
        b.add(r"(\?*)?", "", true)?;
        b.add(r"(\?*)?", "?", true)?;
        b.add(r"(\?*)?", "??", true)?;
        b.add("((a*|b*))*", "aaabbbaaa", true)?;
        b.add("[^a-z]", "\u{0}", true)?;
        b.add("[^a-z]", "0", true)?;
        b.add("[^a-z]", "\n", true)?;
        b.add("[^a-z]", "f", false)?;
        b.add("[^a-z]", "a", false)?;
        b.add("[^a-z]", "z", false)?;
        b.add(r#"\".*\"\s*(;.*)?"#, "\"1234\"", true)?;
        b.add(r#"\".*\"\s*(;.*)?"#, "\"abcd\" ;", true)?;
        b.add(r#"\".*\"\s*(;.*)?"#, "\"\" ; rhubarb", true)?;
        b.add(r#"\".*\"\s*(;.*)?"#, "\"1234\" : things", false)?;
        b.add(r"[aeiou\d]{4,5}", "uoie", true)?;
        b.add(r"[aeiou\d]{4,5}", "1234", true)?;
        b.add(r"[aeiou\d]{4,5}", "12345", true)?;
        b.add(r"[aeiou\d]{4,5}", "aaaaa", true)?;
        b.add(r"[aeiou\d]{4,5}", "123456", false)?;
        b.add("([^a]*)*", "b", true)?;
        b.add("([^a]*)*", "bbbb", true)?;
        b.add("([^a]*)*", "aaa", false)?;
        b.add("([^ab]*)*", "cccc", true)?;
        b.add("([^ab]*)*", "abab", false)?;
        b.add("(([a]*)?)*", "a", true)?;
        b.add("(([a]*)?)*", "aaaa", true)?;
        b.add("(([ab]*)?)*", "a", true)?;
        b.add("(([ab]*)?)*", "b", true)?;
        b.add("(([ab]*)?)*", "abab", true)?;
        b.add("(([ab]*)?)*", "baba", true)?;
        b.add("(([^a]*)?)*", "b", true)?;
        b.add("(([^a]*)?)*", "bbbb", true)?;
        b.add("(([^a]*)?)*", "aaa", false)?;
        b.add("(([^ab]*)?)*", "c", true)?;
        b.add("(([^ab]*)?)*", "cccc", true)?;
        b.add("(([^ab]*)?)*", "baba", false)?;
        b.add("([abc])*bcd", "abcd", true)?;
        b.add("([abc])*bcd", "abbcd", true)?;
        b.add("((((((((((((((((((((x))))))))))))))))))))", "x", true)?;
        b.add("((((((((((((((((((((x))))))))))))))))))))", "", false)?;
        b.add(r"\w*I\w*", "", false)?;
        b.add(r"\w*I\w*", "I", true)?;
        b.add(r"\w*I\w*", "Inc", true)?;
        b.add(r"\w*I\w*", "Inc.", false)?;
        b.add(".+\nabc", "a\nabc", true)?;
        b.add("a(.*)?[b\n]", "a12345b", true)?;
        b.add("a(.*)?[b\n]", "a12345\n", true)?;
        b.add("((.*)?)(\n|\r\n?)", "ab\r", true)?;
        b.add("((.*)?)(\n|\r\n?)", "ab\\r", false)?;
        b.add("((.*)?)(\n|\r\n?)", "ab\\n", false)?;
        b.add("[\r\n]A", "\r\nA", false)?;
        b.add("[\r\n]A", "\rA", true)?;
        b.add("[\r\n]A", "\nA", true)?;
        b.add("[\r\n]A", "A", false)?;
        b.add("(\r|\n)A", "\r\nA", false)?;
        b.add("(\r|\n)A", "\rA", true)?;
        b.add("(\r|\n)A", "\nA", true)?;
        b.add("(\r|\n)A", "A", false)?;
        b.add("a.c", "a\u{0}c", true)?;
        b.add("a.c", "a\u{0}d", false)?;
        b.add("a\u{0}c", "a\u{0}c", true)?;
        b.add("a\u{0}c", "a\u{0}d", false)?;

        b.benchmark_group(|b| {
            b.add("(a?){20}a{20}", "aaaaaaaaaaaaaaaaaaaa", true)?;
            b.add("(a+)+", "aaaaaaaaaaaaaaaaaaaaaaaaaaa", true)?;
            b.add("(a+)+", "aaaaaaaaaaaaaaaaaaaaaaaaaaa!", false)?;
            b.add(
                "(([0-9a-fA-F]{1,4}:)*([0-9a-fA-F]{1,4}))*(::)",
                "b51:4:1DB:9EE1:5:27d60:f44:D4:cd:E:5:0A5:4a:D24:41Ad:",
                false,
            )?;
            b.add(r"[0-9a-zA-Z]([-.\w]*[0-9a-zA-Z])?@.*", "test@contoso.com", true)?;
            b.add(r"(([A-Z]\w*)+\.)*[A-Z]\w*", "aaaaaaaaaaaaaaaaaaaaaa.", false)?;
            b.add(".*(es).*", "Essential services are provided by regular expressions.", true)?;
            Ok(())
        })?;

        let window_patterns = [
            ".*Sherlock Holmes.*",
            r".*Sherlock\s+Holmes.*",
            ".*(Holmes.{0,25}Watson|Watson.{0,25}Holmes).*",
            ".*[a-zA-Z]+ing.*",
            r".*\s[a-zA-Z]{0,12}ing\s.*",
        ];
        for pattern in window_patterns {
            b.add_sliding_window(escape::to_bytes(pattern)?, self.corpus.clone(), 40);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_shape() {
        let provider = DefaultCases::new(b"Sherlock Holmes was walking.\n".to_vec());
        let mut builder = CaseListBuilder::new(provider.name());
        provider.provide(&mut builder).unwrap();
        let cases = builder.into_cases();

        let tests = cases.iter().filter(|c| !c.benchmark).count();
        let benchmarks = cases.iter().filter(|c| c.benchmark && c.window.is_none()).count();
        let windows = cases.iter().filter(|c| c.window.is_some()).count();
        assert_eq!(tests, 141);
        assert_eq!(benchmarks, 7);
        assert_eq!(windows, 5);
    }
}
