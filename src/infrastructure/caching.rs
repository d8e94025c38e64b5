//! Compiled-pattern cache around the reference engine.

use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;

use crate::infrastructure::pike::Program;
use crate::ports::RegexEngine;

/// Like [`crate::infrastructure::pike::PikeEngine`], but each distinct
/// pattern is parsed and compiled once. Benchmarks that hammer a single
/// pattern then measure execution alone.
pub struct CachingEngine {
    programs: DashMap<Vec<u8>, Arc<Program>>,
}

impl CachingEngine {
    pub fn new() -> CachingEngine {
        CachingEngine { programs: DashMap::new() }
    }

    fn program_for(&self, regex: &[u8]) -> Result<Arc<Program>> {
        if let Some(program) = self.programs.get(regex) {
            return Ok(Arc::clone(&program));
        }
        let program = Arc::new(Program::compile_pattern(regex)?);
        self.programs.insert(regex.to_vec(), Arc::clone(&program));
        Ok(program)
    }
}

impl Default for CachingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexEngine for CachingEngine {
    fn name(&self) -> &str {
        "caching"
    }

    fn matches(&self, regex: &[u8], input: &[u8]) -> Result<bool> {
        let program = self.program_for(regex)?;
        Ok(program.matches(input))
    }
}
