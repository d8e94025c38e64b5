//! Pattern syntax tree.
//!
//! A parsed pattern is a [`Regex`] over [`CharClass`] leaves. Every leaf
//! matches exactly one input byte; the tree combines leaves with
//! concatenation, alternation, and bounded repetition. `Display` renders a
//! node back to pattern syntax.

use std::fmt;

use crate::domain::escape;

/// Named single-byte classes with a fixed spelling in pattern syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// `\w`: ASCII letters and underscore.
    Word,
    /// `\W`: complement of `\w`.
    NonWord,
    /// `\d`: ASCII digits.
    Digit,
    /// `\D`: complement of `\d`.
    NonDigit,
    /// `\s`: space, `\r`, `\n`, `\f`, `\t`, vertical tab.
    Space,
    /// `\S`: complement of `\s`.
    NonSpace,
    /// `.`: any byte, newline included.
    Wildcard,
}

impl ClassKind {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ClassKind::Word => "\\w",
            ClassKind::NonWord => "\\W",
            ClassKind::Digit => "\\d",
            ClassKind::NonDigit => "\\D",
            ClassKind::Space => "\\s",
            ClassKind::NonSpace => "\\S",
            ClassKind::Wildcard => ".",
        }
    }

    pub fn matches(&self, b: u8) -> bool {
        match self {
            ClassKind::Word => b.is_ascii_alphabetic() || b == b'_',
            ClassKind::NonWord => !ClassKind::Word.matches(b),
            ClassKind::Digit => b.is_ascii_digit(),
            ClassKind::NonDigit => !ClassKind::Digit.matches(b),
            ClassKind::Space => matches!(b, b' ' | b'\r' | b'\n' | 0x0C | b'\t' | 0x0B),
            ClassKind::NonSpace => !ClassKind::Space.matches(b),
            ClassKind::Wildcard => true,
        }
    }
}

/// A pattern element matching a single input byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// One exact byte.
    Literal(u8),
    /// Inclusive byte range; bounds are stored in unsigned order.
    Range(u8, u8),
    /// Any of the contained classes.
    Union(Vec<CharClass>),
    /// Complement of the contained class.
    Negation(Box<CharClass>),
    /// A named class.
    Predefined(ClassKind),
}

impl CharClass {
    /// Range constructor normalizing reversed bounds.
    pub fn range(start: u8, end: u8) -> CharClass {
        if start > end {
            CharClass::Range(end, start)
        } else {
            CharClass::Range(start, end)
        }
    }

    pub fn matches(&self, b: u8) -> bool {
        match self {
            CharClass::Literal(value) => b == *value,
            CharClass::Range(start, end) => *start <= b && b <= *end,
            CharClass::Union(parts) => parts.iter().any(|p| p.matches(b)),
            CharClass::Negation(inner) => !inner.matches(b),
            CharClass::Predefined(kind) => kind.matches(b),
        }
    }

    /// Render a class as it appears inside brackets: ranges without the
    /// surrounding `[...]`, unions flattened.
    fn push_bracket_parts(&self, out: &mut String) {
        match self {
            CharClass::Union(parts) => {
                for part in parts {
                    part.push_bracket_parts(out);
                }
            }
            CharClass::Range(start, end) => {
                out.push_str(&escape::pattern_literal(*start));
                out.push('-');
                out.push_str(&escape::pattern_literal(*end));
            }
            other => out.push_str(&other.to_string()),
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Literal(value) => f.write_str(&escape::pattern_literal(*value)),
            CharClass::Range(..) | CharClass::Union(_) => {
                let mut body = String::new();
                self.push_bracket_parts(&mut body);
                write!(f, "[{}]", body)
            }
            CharClass::Negation(inner) => {
                let mut body = String::new();
                inner.push_bracket_parts(&mut body);
                write!(f, "[^{}]", body)
            }
            CharClass::Predefined(kind) => f.write_str(kind.mnemonic()),
        }
    }
}

/// A parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex {
    /// A single-byte matcher.
    Char(CharClass),
    /// Parts in sequence. An empty sequence matches only the empty input.
    Concat(Vec<Regex>),
    /// Branches; at least one.
    Alt(Vec<Regex>),
    /// `node` repeated between `min` and `max` times. `min` of `None` means
    /// no lower bound, `max` of `None` means no upper bound; never both.
    Repeat {
        node: Box<Regex>,
        min: Option<u32>,
        max: Option<u32>,
    },
}

impl Regex {
    /// Parse a pattern from bytes.
    pub fn parse(pattern: &[u8]) -> Result<Regex, crate::domain::parser::SyntaxError> {
        crate::domain::parser::parse(pattern)
    }

    /// Parse a pattern from a string literal (characters below U+0100).
    pub fn parse_str(pattern: &str) -> anyhow::Result<Regex> {
        let bytes = escape::to_bytes(pattern)?;
        Ok(Self::parse(&bytes)?)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Char(class) => write!(f, "{}", class),
            Regex::Alt(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
            Regex::Concat(parts) => {
                for part in parts {
                    if matches!(part, Regex::Alt(_)) {
                        write!(f, "({})", part)?;
                    } else {
                        write!(f, "{}", part)?;
                    }
                }
                Ok(())
            }
            Regex::Repeat { node, min, max } => {
                if matches!(**node, Regex::Char(_)) {
                    write!(f, "{}", node)?;
                } else {
                    write!(f, "({})", node)?;
                }
                match (min, max) {
                    (None, Some(max)) => write!(f, "{{,{}}}", max),
                    (Some(0), None) => f.write_str("*"),
                    (Some(1), None) => f.write_str("+"),
                    (Some(min), None) => write!(f, "{{{},}}", min),
                    (Some(0), Some(1)) => f.write_str("?"),
                    (Some(min), Some(max)) => write!(f, "{{{},{}}}", min, max),
                    (None, None) => unreachable!("repetition without bounds"),
                }
            }
        }
    }
}
