//! Extra case providers loaded from TOML files.
//!
//! File format:
//!
//! ```toml
//! name = "my-cases"        # optional; defaults to the file stem
//!
//! [[case]]
//! regex = "a+b"
//! input = "aaab"
//! expected = true
//! benchmark = false        # optional
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::cases::CaseListBuilder;
use crate::ports::CaseProvider;

#[derive(Debug, Deserialize)]
struct CaseFile {
    name: Option<String>,
    #[serde(default)]
    case: Vec<CaseEntry>,
}

#[derive(Debug, Deserialize)]
struct CaseEntry {
    regex: String,
    input: String,
    expected: bool,
    #[serde(default)]
    benchmark: bool,
}

/// Cases read from one TOML file.
pub struct TomlCases {
    name: String,
    entries: Vec<CaseEntry>,
}

impl TomlCases {
    pub fn from_path(path: &Path) -> Result<TomlCases> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file {}", path.display()))?;
        let file: CaseFile = toml::from_str(&text)
            .with_context(|| format!("Invalid case file {}", path.display()))?;
        let name = file.name.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cases".to_string())
        });
        Ok(TomlCases { name, entries: file.case })
    }
}

impl CaseProvider for TomlCases {
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self, builder: &mut CaseListBuilder) -> Result<()> {
        for entry in &self.entries {
            if entry.benchmark {
                builder.benchmark_group(|b| b.add(&entry.regex, &entry.input, entry.expected))?;
            } else {
                builder.add(&entry.regex, &entry.input, entry.expected)?;
            }
        }
        Ok(())
    }
}
