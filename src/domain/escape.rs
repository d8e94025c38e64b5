//! Byte/text conversions for patterns and inputs.
//!
//! Patterns and inputs are raw byte strings (0..=255). These helpers convert
//! between `&str` literals and byte buffers, and render single bytes for
//! human-readable output, regex syntax, and generated C++ source.

use anyhow::{bail, Result};

/// Bytes that carry syntactic meaning inside a pattern.
pub fn is_meta(b: u8) -> bool {
    matches!(
        b,
        b'\\' | b'*' | b'+' | b'?' | b'|' | b'{' | b'}' | b'[' | b']' | b'(' | b')' | b'.' | b'-'
            | b'^'
    )
}

/// Convert a string to a byte buffer, one byte per character.
/// Characters at or above U+0100 have no byte form and are rejected.
pub fn to_bytes(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code >= 256 {
            bail!("\"{}\" has characters beyond 256: {:x}", text, code);
        }
        bytes.push(code as u8);
    }
    Ok(bytes)
}

/// Convert a byte buffer back to a string, one character per byte.
pub fn to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Render a byte for human-readable output (case listings, error messages).
pub fn human(b: u8) -> String {
    match b {
        0 => "\\0".to_string(),
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        0x0C => "\\f".to_string(),
        32..=126 => (b as char).to_string(),
        _ => format!("\\x{:02X}", b),
    }
}

/// Render a byte as it would appear inside a pattern, escaping metacharacters.
pub fn pattern_literal(b: u8) -> String {
    match b {
        0 => "\\0".to_string(),
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        0x0C => "\\f".to_string(),
        _ if is_meta(b) => format!("\\{}", b as char),
        33..=126 => (b as char).to_string(),
        _ => format!("\\x{:02x}", b),
    }
}

/// Render a pattern byte for embedding into a C++ string literal that is
/// itself compiled as a `std::regex` pattern. Escaping happens twice: once
/// for the regex syntax, once for the string literal.
pub fn cpp_string_literal(b: u8, quote: u8) -> String {
    match b {
        // C++ regex: <NUL>, C++ string literal: \0
        0 => "\\0".to_string(),
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        0x0C => "\\f".to_string(),
        // C++ regex: \\, C++ string literal: \\\\
        b'\\' => "\\\\\\\\".to_string(),
        // C++ regex: ", C++ string literal: \"
        _ if b == quote => format!("\\{}", b as char),
        // C++ regex: \*, C++ string literal: \\*
        _ if is_meta(b) => format!("\\\\{}", b as char),
        32..=126 => (b as char).to_string(),
        // C++ regex: \xff, C++ string literal: \\xff
        _ => format!("\\\\x{:02x}", b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_round_trip() {
        let bytes = to_bytes("a\u{0}\u{ff}~").unwrap();
        assert_eq!(bytes, vec![b'a', 0, 0xFF, b'~']);
        assert_eq!(to_text(&bytes), "a\u{0}\u{ff}~");
    }

    #[test]
    fn test_to_bytes_rejects_wide_characters() {
        assert!(to_bytes("snowman \u{2603}").is_err());
    }

    #[test]
    fn test_human() {
        assert_eq!(human(b'a'), "a");
        assert_eq!(human(b'*'), "*");
        assert_eq!(human(0), "\\0");
        assert_eq!(human(b'\n'), "\\n");
        assert_eq!(human(0x0B), "\\x0B");
        assert_eq!(human(0x7F), "\\x7F");
        assert_eq!(human(0xFF), "\\xFF");
    }

    #[test]
    fn test_pattern_literal() {
        assert_eq!(pattern_literal(b'a'), "a");
        assert_eq!(pattern_literal(b'*'), "\\*");
        assert_eq!(pattern_literal(b'\\'), "\\\\");
        // Space is not printable pattern syntax, unlike in human output.
        assert_eq!(pattern_literal(b' '), "\\x20");
        assert_eq!(pattern_literal(0xFF), "\\xff");
    }

    #[test]
    fn test_cpp_string_literal() {
        assert_eq!(cpp_string_literal(b'a', b'"'), "a");
        assert_eq!(cpp_string_literal(b'"', b'"'), "\\\"");
        assert_eq!(cpp_string_literal(b'*', b'"'), "\\\\*");
        assert_eq!(cpp_string_literal(b'\\', b'"'), "\\\\\\\\");
        assert_eq!(cpp_string_literal(0, b'"'), "\\0");
        assert_eq!(cpp_string_literal(0xFF, b'"'), "\\\\xff");
        assert_eq!(cpp_string_literal(0x0B, b'"'), "\\\\x0b");
    }

    #[test]
    fn test_all_bytes_render() {
        for b in 0..=255u8 {
            assert!(!human(b).is_empty());
            assert!(!pattern_literal(b).is_empty());
            assert!(!cpp_string_literal(b, b'"').is_empty());
        }
    }
}
