//! Plugin seams: regex engines under test and case providers.

use anyhow::Result;

use crate::domain::cases::{CaseListBuilder, TestCase};

/// An engine under test. Both the pattern and the input are raw byte strings;
/// the answer is whether the pattern matches the entire input, with `.`
/// matching every byte.
///
/// An `Err` is treated as a failure of the case being run, not as a harness
/// error.
pub trait RegexEngine: Send + Sync {
    fn name(&self) -> &str;

    fn matches(&self, regex: &[u8], input: &[u8]) -> Result<bool>;
}

/// Contributes cases to a run and may veto engines, cases, or the progress
/// display. All hooks default to "no opinion".
pub trait CaseProvider: Send + Sync {
    fn name(&self) -> &str;

    fn provide(&self, builder: &mut CaseListBuilder) -> Result<()>;

    /// Exclude an engine from the whole run.
    fn skip_engine(&self, _engine_name: &str) -> bool {
        false
    }

    /// Drop a case contributed by any provider, this one included.
    fn skip_case(&self, _case: &TestCase) -> bool {
        false
    }

    /// Suppress the live progress line.
    fn disable_progress(&self) -> bool {
        false
    }
}
