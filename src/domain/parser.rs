//! Recursive-descent pattern parser.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! alternation   = concatenation ('|' concatenation)*
//! concatenation = repetition*
//! repetition    = atom ('*' | '+' | '?' | '{' range '}')*
//! atom          = '(' alternation ')' | '\' byte | '.' | '[' class ']' | byte
//! ```
//!
//! Errors carry the pattern and the byte offset where parsing stopped.

use std::fmt;

use crate::domain::ast::{CharClass, ClassKind, Regex};
use crate::domain::escape;

/// A malformed pattern, with the position of the offending byte.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    pattern: Vec<u8>,
    position: usize,
    message: String,
}

impl SyntaxError {
    fn new(pattern: &[u8], position: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            pattern: pattern.to_vec(),
            position,
            message: message.into(),
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self.pattern.iter().map(|&b| escape::human(b)).collect();
        write!(
            f,
            "{} (pattern `{}`, position {})",
            self.message, rendered, self.position
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Parse a pattern from bytes.
pub fn parse(pattern: &[u8]) -> Result<Regex, SyntaxError> {
    let mut parser = Parser { text: pattern, position: 0 };
    let node = parser.alternation()?;
    // The grammar consumes everything it can; anything left over is a stray
    // closing delimiter.
    if parser.has_more() {
        return Err(parser.error_here("Unexpected group closing parenthesis"));
    }
    Ok(node)
}

struct Parser<'a> {
    text: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    fn has_more(&self) -> bool {
        self.position < self.text.len()
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.text, self.position, message)
    }

    fn peek(&self) -> Result<u8, SyntaxError> {
        self.text
            .get(self.position)
            .copied()
            .ok_or_else(|| self.error_here("Unexpected end of regular expression"))
    }

    fn peek_is_any(&self, options: &[u8]) -> Result<bool, SyntaxError> {
        let c = self.peek()?;
        Ok(options.contains(&c))
    }

    fn advance(&mut self) -> Result<u8, SyntaxError> {
        let c = self.peek()?;
        self.position += 1;
        Ok(c)
    }

    fn consume(&mut self, expected: u8) -> Result<(), SyntaxError> {
        if !self.has_more() {
            return Err(self.error_here(format!(
                "Unexpected end of regular expression, expected {}",
                escape::human(expected)
            )));
        }
        let c = self.peek()?;
        if c == expected {
            self.position += 1;
            Ok(())
        } else {
            Err(self.error_here(format!(
                "Expected {} but got {}",
                escape::human(expected),
                escape::human(c)
            )))
        }
    }

    fn alternation(&mut self) -> Result<Regex, SyntaxError> {
        let node = self.concatenation()?;

        if self.has_more() && self.peek_is_any(b"|")? {
            let mut branches = vec![node];
            while self.has_more() && self.peek_is_any(b"|")? {
                self.consume(b'|')?;
                branches.push(self.concatenation()?);
            }
            return Ok(Regex::Alt(branches));
        }

        Ok(node)
    }

    fn concatenation(&mut self) -> Result<Regex, SyntaxError> {
        if !self.has_more() || self.peek_is_any(b"|)")? {
            return Ok(Regex::Concat(Vec::new()));
        }

        let node = self.repetition()?;

        if self.has_more() && !self.peek_is_any(b"|)")? {
            let mut parts = vec![node];
            while self.has_more() && !self.peek_is_any(b"|)")? {
                parts.push(self.repetition()?);
            }
            return Ok(Regex::Concat(parts));
        }

        Ok(node)
    }

    fn repetition(&mut self) -> Result<Regex, SyntaxError> {
        let mut node = self.atom()?;
        while self.has_more() && self.peek_is_any(b"*+?{")? {
            match self.peek()? {
                b'*' => {
                    self.consume(b'*')?;
                    node = Regex::Repeat { node: Box::new(node), min: Some(0), max: None };
                }
                b'+' => {
                    self.consume(b'+')?;
                    node = Regex::Repeat { node: Box::new(node), min: Some(1), max: None };
                }
                b'?' => {
                    self.consume(b'?')?;
                    node = Regex::Repeat { node: Box::new(node), min: Some(0), max: Some(1) };
                }
                _ => {
                    self.consume(b'{')?;
                    node = self.repetition_range(node)?;
                    self.consume(b'}')?;
                }
            }
        }
        Ok(node)
    }

    fn repetition_range(&mut self, node: Regex) -> Result<Regex, SyntaxError> {
        let mut min = None;
        let mut max = None;
        if self.has_more() && self.peek()?.is_ascii_digit() {
            min = Some(self.repetition_number()?);
        }
        if self.peek_is_any(b",")? {
            self.consume(b',')?;
            if self.has_more() && self.peek()?.is_ascii_digit() {
                max = Some(self.repetition_number()?);
            }
        } else {
            max = min;
        }

        match (min, max) {
            (None, None) => Err(self.error_here("Repetition range needs at least one count")),
            (_, Some(0)) => Err(self.error_here("Repetition count upper bound must be positive")),
            (Some(lo), Some(hi)) if lo > hi => Err(self.error_here(format!(
                "Invalid repetition count range: {} > {}",
                lo, hi
            ))),
            _ => Ok(Regex::Repeat { node: Box::new(node), min, max }),
        }
    }

    fn repetition_number(&mut self) -> Result<u32, SyntaxError> {
        let mut digits = String::new();
        while self.has_more() && self.peek()?.is_ascii_digit() {
            digits.push(self.advance()? as char);
        }
        digits.parse::<u32>().map_err(|_| {
            self.error_here(format!(
                "Invalid decimal number for repetition count: {}",
                digits
            ))
        })
    }

    fn atom(&mut self) -> Result<Regex, SyntaxError> {
        match self.peek()? {
            b'(' => {
                self.consume(b'(')?;
                let node = self.alternation()?;
                self.consume(b')')?;
                Ok(node)
            }
            b'\\' => {
                self.consume(b'\\')?;
                let escaped = self.advance()?;
                Ok(Regex::Char(escaped_class(escaped)))
            }
            b'.' => {
                self.consume(b'.')?;
                Ok(Regex::Char(CharClass::Predefined(ClassKind::Wildcard)))
            }
            b'[' => {
                self.consume(b'[')?;
                let class = self.char_class()?;
                self.consume(b']')?;
                Ok(Regex::Char(class))
            }
            b')' => Err(self.error_here("Unexpected group closing parenthesis")),
            b']' => Err(self.error_here("Unexpected character class closing bracket")),
            b'+' | b'*' | b'?' => Err(self.error_here("Unexpected repetition operator")),
            b'|' => Err(self.error_here("Unexpected alternation operator")),
            _ => Ok(Regex::Char(CharClass::Literal(self.advance()?))),
        }
    }

    fn char_class(&mut self) -> Result<CharClass, SyntaxError> {
        let negative = self.has_more() && self.peek_is_any(b"^")?;
        if negative {
            self.consume(b'^')?;
        }

        let mut elements = Vec::new();
        while self.has_more() && self.peek()? != b']' {
            elements.push(self.class_element()?);
        }

        if elements.is_empty() {
            return Err(self.error_here("Character class should have at least one item"));
        }

        let mut class = if elements.len() == 1 {
            elements.remove(0)
        } else {
            CharClass::Union(elements)
        };

        if negative {
            class = CharClass::Negation(Box::new(class));
        }

        Ok(class)
    }

    fn class_element(&mut self) -> Result<CharClass, SyntaxError> {
        if self.peek_is_any(b"[")? {
            // Nested character class.
            self.consume(b'[')?;
            let nested = self.char_class()?;
            self.consume(b']')?;
            return Ok(nested);
        }

        let start = self.advance()?;
        if start == b'\\' {
            return Ok(escaped_class(self.advance()?));
        }

        if self.peek_is_any(b"-")? {
            self.consume(b'-')?;

            let mut end = self.advance()?;
            if end == b'\\' {
                end = self.advance()?;
                if end != b'\\' {
                    return Err(SyntaxError::new(
                        self.text,
                        self.position - 1,
                        format!(
                            "Unexpected range ending escape sequence for character class: {}",
                            escape::human(end)
                        ),
                    ));
                }
            }

            return Ok(CharClass::range(start, end));
        }

        Ok(CharClass::Literal(start))
    }
}

fn escaped_class(b: u8) -> CharClass {
    match b {
        b'w' => CharClass::Predefined(ClassKind::Word),
        b'W' => CharClass::Predefined(ClassKind::NonWord),
        b'd' => CharClass::Predefined(ClassKind::Digit),
        b'D' => CharClass::Predefined(ClassKind::NonDigit),
        b's' => CharClass::Predefined(ClassKind::Space),
        b'S' => CharClass::Predefined(ClassKind::NonSpace),
        _ => CharClass::Literal(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(pattern: &str) -> Result<Regex, SyntaxError> {
        parse(&escape::to_bytes(pattern).unwrap())
    }

    #[test]
    fn test_empty_pattern_is_empty_concat() {
        assert_eq!(parse_str("").unwrap(), Regex::Concat(Vec::new()));
    }

    #[test]
    fn test_bare_alternation() {
        let node = parse_str("|").unwrap();
        assert_eq!(
            node,
            Regex::Alt(vec![Regex::Concat(Vec::new()), Regex::Concat(Vec::new())])
        );
    }

    #[test]
    fn test_single_atom_is_not_wrapped() {
        assert_eq!(parse_str("a").unwrap(), Regex::Char(CharClass::Literal(b'a')));
    }

    #[test]
    fn test_repetition_postfixes_stack() {
        // `a*?` is (a*)? under this grammar, not a lazy quantifier.
        let node = parse_str("a*?").unwrap();
        let Regex::Repeat { node: outer, min: Some(0), max: Some(1) } = node else {
            panic!("expected outer optional, got {:?}", node);
        };
        assert!(matches!(*outer, Regex::Repeat { min: Some(0), max: None, .. }));
    }

    #[test]
    fn test_counted_repetition_forms() {
        assert!(matches!(
            parse_str("a{3}").unwrap(),
            Regex::Repeat { min: Some(3), max: Some(3), .. }
        ));
        assert!(matches!(
            parse_str("a{2,}").unwrap(),
            Regex::Repeat { min: Some(2), max: None, .. }
        ));
        assert!(matches!(
            parse_str("a{,4}").unwrap(),
            Regex::Repeat { min: None, max: Some(4), .. }
        ));
        assert!(matches!(
            parse_str("a{2,4}").unwrap(),
            Regex::Repeat { min: Some(2), max: Some(4), .. }
        ));
    }

    #[test]
    fn test_brace_without_counts_is_rejected() {
        assert!(parse_str("a{}").is_err());
        assert!(parse_str("a{x}").is_err());
        assert!(parse_str("a{5,2}").is_err());
        assert!(parse_str("a{2,0}").is_err());
    }

    #[test]
    fn test_class_with_dot_is_literal() {
        let node = parse_str("[.]").unwrap();
        assert_eq!(node, Regex::Char(CharClass::Literal(b'.')));
    }

    #[test]
    fn test_nested_class() {
        let node = parse_str("[[a][b-c]]").unwrap();
        let Regex::Char(class) = node else { panic!() };
        assert!(class.matches(b'a'));
        assert!(class.matches(b'b'));
        assert!(class.matches(b'c'));
        assert!(!class.matches(b'd'));
    }

    #[test]
    fn test_class_range_end_escape() {
        // Only an escaped backslash may end a range.
        let node = parse_str("[ -\\\\]").unwrap();
        let Regex::Char(class) = node else { panic!() };
        assert!(class.matches(b' '));
        assert!(class.matches(b'\\'));
        assert!(parse_str("[a-\\d]").is_err());
    }

    #[test]
    fn test_stray_delimiters_are_errors() {
        for bad in [")", "]a", "*a", "+", "?", "(a", "[a", "[]", "a\\"] {
            assert!(parse_str(bad).is_err(), "pattern {:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_error_reports_position() {
        let err = parse_str("ab)").unwrap_err();
        assert_eq!(err.position(), 2);
        let rendered = err.to_string();
        assert!(rendered.contains("position 2"), "got: {}", rendered);
    }
}
