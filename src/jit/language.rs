//! Source languages and standard revisions for generated native code.

use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    pub fn source_extension(&self) -> &'static str {
        match self {
            Language::C => ".c",
            Language::Cpp => ".cpp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cpp => write!(f, "C++"),
        }
    }
}

/// A language standard revision, optionally with vendor extensions
/// (`gnu++17` rather than `c++17`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageVersion {
    pub language: Language,
    pub revision: u32,
    pub extensions: bool,
}

impl LanguageVersion {
    pub const CPP98: LanguageVersion = LanguageVersion::new(Language::Cpp, 98);
    pub const CPP03: LanguageVersion = LanguageVersion::new(Language::Cpp, 3);
    pub const CPP11: LanguageVersion = LanguageVersion::new(Language::Cpp, 11);
    pub const CPP14: LanguageVersion = LanguageVersion::new(Language::Cpp, 14);
    pub const CPP17: LanguageVersion = LanguageVersion::new(Language::Cpp, 17);
    pub const CPP20: LanguageVersion = LanguageVersion::new(Language::Cpp, 20);
    pub const CPP23: LanguageVersion = LanguageVersion::new(Language::Cpp, 23);
    pub const CPP26: LanguageVersion = LanguageVersion::new(Language::Cpp, 26);
    pub const C99: LanguageVersion = LanguageVersion::new(Language::C, 99);
    pub const C11: LanguageVersion = LanguageVersion::new(Language::C, 11);
    pub const C17: LanguageVersion = LanguageVersion::new(Language::C, 17);

    const fn new(language: Language, revision: u32) -> LanguageVersion {
        LanguageVersion { language, revision, extensions: false }
    }

    pub fn with_extensions(self) -> LanguageVersion {
        LanguageVersion { extensions: true, ..self }
    }

    /// The value of `-std=` for GCC and Clang.
    pub fn unix_flag_value(&self) -> String {
        let dialect = if self.extensions { "gnu" } else { "c" };
        let plus = match self.language {
            Language::Cpp => "++",
            Language::C => "",
        };
        // C++03 is spelled with its leading zero.
        let revision = if self.revision == 3 {
            "03".to_string()
        } else {
            self.revision.to_string()
        };
        format!("{}{}{}", dialect, plus, revision)
    }

    /// The value of `/std:` for MSVC, which supports a narrower set.
    pub fn msvc_flag_value(&self) -> Result<String> {
        match (self.language, self.revision) {
            (Language::Cpp, 14) => Ok("c++14".to_string()),
            (Language::Cpp, 17) => Ok("c++17".to_string()),
            (Language::Cpp, 20) => Ok("c++20".to_string()),
            (Language::C, 11) => Ok("c11".to_string()),
            (Language::C, 17) => Ok("c17".to_string()),
            _ => bail!("Unsupported language and version for MSVC: {}", self),
        }
    }

    /// Parse a CLI spelling such as `c++17`, `gnu++20` or `c11`.
    pub fn parse(text: &str) -> Result<LanguageVersion> {
        let lower = text.to_lowercase();
        let (extensions, rest) = match lower.strip_prefix("gnu") {
            Some(rest) => (true, rest),
            None => match lower.strip_prefix("c") {
                Some(rest) => (false, rest),
                None => bail!("Unknown language version: {}", text),
            },
        };
        let (language, digits) = match rest.strip_prefix("++") {
            Some(digits) => (Language::Cpp, digits),
            None => (Language::C, rest),
        };
        let known: &[LanguageVersion] = match language {
            Language::Cpp => &[
                Self::CPP98,
                Self::CPP03,
                Self::CPP11,
                Self::CPP14,
                Self::CPP17,
                Self::CPP20,
                Self::CPP23,
                Self::CPP26,
            ],
            Language::C => &[Self::C99, Self::C11, Self::C17],
        };
        let revision: u32 = match digits.parse() {
            Ok(n) => n,
            Err(_) => bail!("Unknown language version: {}", text),
        };
        for candidate in known {
            if candidate.revision == revision {
                return Ok(if extensions { candidate.with_extensions() } else { *candidate });
            }
        }
        bail!("Unknown language version: {}", text);
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.language,
            self.revision,
            if self.extensions { " with extensions" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_flag_values() {
        assert_eq!(LanguageVersion::CPP17.unix_flag_value(), "c++17");
        assert_eq!(LanguageVersion::CPP03.unix_flag_value(), "c++03");
        assert_eq!(LanguageVersion::C11.unix_flag_value(), "c11");
        assert_eq!(
            LanguageVersion::CPP20.with_extensions().unix_flag_value(),
            "gnu++20"
        );
    }

    #[test]
    fn test_msvc_flag_values() {
        assert_eq!(LanguageVersion::CPP17.msvc_flag_value().unwrap(), "c++17");
        assert_eq!(LanguageVersion::C17.msvc_flag_value().unwrap(), "c17");
        assert!(LanguageVersion::CPP98.msvc_flag_value().is_err());
        assert!(LanguageVersion::C99.msvc_flag_value().is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(LanguageVersion::parse("c++17").unwrap(), LanguageVersion::CPP17);
        assert_eq!(LanguageVersion::parse("C++20").unwrap(), LanguageVersion::CPP20);
        assert_eq!(
            LanguageVersion::parse("gnu++17").unwrap(),
            LanguageVersion::CPP17.with_extensions()
        );
        assert_eq!(LanguageVersion::parse("c11").unwrap(), LanguageVersion::C11);
        assert_eq!(LanguageVersion::parse("c++03").unwrap(), LanguageVersion::CPP03);
        assert!(LanguageVersion::parse("c++12").is_err());
        assert!(LanguageVersion::parse("rust").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(LanguageVersion::CPP17.to_string(), "C++17");
        assert_eq!(
            LanguageVersion::C11.with_extensions().to_string(),
            "C11 with extensions"
        );
    }
}
