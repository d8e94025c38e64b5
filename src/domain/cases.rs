//! Test case model.
//!
//! A [`TestCase`] pairs a pattern with an input and the expected full-match
//! answer. Cases come from providers (see `ports::CaseProvider`) through a
//! [`CaseListBuilder`], which tracks whether cases are plain correctness
//! tests, benchmark cases, or sliding-window benchmarks.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::escape;

/// Input bytes shown before a case listing is truncated.
const MAX_INPUT_DISPLAY: usize = 20;

/// Name of the built-in case provider; its tag is omitted from listings.
pub const DEFAULT_PROVIDER: &str = "default";

/// One pattern/input pair with its expected outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Name of the provider that contributed this case.
    pub provider: String,
    pub regex: Vec<u8>,
    pub input: Vec<u8>,
    /// Expected full-match answer. Ignored for sliding-window cases.
    pub expected: bool,
    /// Benchmark cases are timed against a deadline instead of checked once.
    pub benchmark: bool,
    /// For sliding-window benchmarks: the window size in bytes.
    pub window: Option<usize>,
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.provider != DEFAULT_PROVIDER {
            write!(f, "[{}] ", self.provider)?;
        }
        f.write_str("regex=")?;
        for &b in &self.regex {
            f.write_str(&escape::human(b))?;
        }
        f.write_str(",input=")?;
        for &b in self.input.iter().take(MAX_INPUT_DISPLAY) {
            f.write_str(&escape::human(b))?;
        }
        if self.input.len() > MAX_INPUT_DISPLAY {
            write!(f, "... +{} more", self.input.len() - MAX_INPUT_DISPLAY)?;
        }
        if let Some(window) = self.window {
            write!(f, ",window={}", window)?;
        } else {
            f.write_str(if self.benchmark { ",benchmark" } else { ",test" })?;
            f.write_str(if self.expected { ",positive" } else { ",negative" })?;
        }
        Ok(())
    }
}

/// Collects the cases contributed by one provider.
pub struct CaseListBuilder {
    provider: String,
    in_benchmark_group: bool,
    cases: Vec<TestCase>,
}

impl CaseListBuilder {
    pub fn new(provider: impl Into<String>) -> CaseListBuilder {
        CaseListBuilder {
            provider: provider.into(),
            in_benchmark_group: false,
            cases: Vec::new(),
        }
    }

    /// Add a case from string literals (characters below U+0100).
    pub fn add(&mut self, regex: &str, input: &str, expected: bool) -> Result<()> {
        let regex = escape::to_bytes(regex)?;
        let input = escape::to_bytes(input)?;
        self.add_bytes(regex, input, expected);
        Ok(())
    }

    /// Add a case from raw byte buffers.
    pub fn add_bytes(&mut self, regex: Vec<u8>, input: Vec<u8>, expected: bool) {
        self.cases.push(TestCase {
            provider: self.provider.clone(),
            regex,
            input,
            expected,
            benchmark: self.in_benchmark_group,
            window: None,
        });
    }

    /// Add a case whose input is the contents of a file.
    pub fn add_file(&mut self, regex: &str, input: &Path, expected: bool) -> Result<()> {
        let bytes = fs::read(input)
            .with_context(|| format!("Failed to read case input {}", input.display()))?;
        self.add_bytes(escape::to_bytes(regex)?, bytes, expected);
        Ok(())
    }

    /// Cases added inside the closure are benchmark cases. Groups nest; the
    /// surrounding group's kind is restored on return.
    pub fn benchmark_group(&mut self, f: impl FnOnce(&mut CaseListBuilder) -> Result<()>) -> Result<()> {
        let outer = self.in_benchmark_group;
        self.in_benchmark_group = true;
        let result = f(self);
        self.in_benchmark_group = outer;
        result
    }

    /// Add a sliding-window benchmark: `input` is streamed through the engine
    /// in `window`-sized chunks.
    pub fn add_sliding_window(&mut self, regex: Vec<u8>, input: Vec<u8>, window: usize) {
        self.cases.push(TestCase {
            provider: self.provider.clone(),
            regex,
            input,
            expected: true,
            benchmark: true,
            window: Some(window),
        });
    }

    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }
}
