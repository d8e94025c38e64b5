//! The native engine: pattern → C++ → shared library → `matches` call.

use std::sync::Arc;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tempfile::TempDir;

use crate::jit::codegen;
use crate::jit::compiler::{CompilerRunner, ToolchainConfig};
use crate::jit::language::LanguageVersion;
use crate::jit::library::NativeLibrary;
use crate::ports::RegexEngine;

/// Compiles every distinct pattern once into a shared library and dispatches
/// `matches` calls through it. Artifacts live in a per-engine temporary
/// directory removed on drop.
pub struct NativeEngine {
    runner: CompilerRunner,
    version: LanguageVersion,
    libraries: DashMap<Vec<u8>, Arc<NativeLibrary>>,
    work_dir: TempDir,
}

impl NativeEngine {
    pub fn new(config: ToolchainConfig, version: LanguageVersion) -> Result<NativeEngine> {
        let work_dir = TempDir::with_prefix("rexmark-jit-")
            .context("Failed to create native engine work directory")?;
        Ok(NativeEngine {
            runner: CompilerRunner::new(config),
            version,
            libraries: DashMap::new(),
            work_dir,
        })
    }

    fn library_for(&self, regex: &[u8]) -> Result<Arc<NativeLibrary>> {
        if let Some(library) = self.libraries.get(regex) {
            return Ok(Arc::clone(&library));
        }

        let source = codegen::matcher_source(regex);
        let stem = format!("matcher_{:016x}", fnv1a(regex));
        let library_path = self
            .runner
            .compile(&source, self.version, self.work_dir.path(), &stem)
            .with_context(|| format!("Failed to compile matcher for pattern ({} bytes)", regex.len()))?;
        let library = Arc::new(NativeLibrary::load(&library_path)?);
        self.libraries.insert(regex.to_vec(), Arc::clone(&library));
        Ok(library)
    }
}

impl RegexEngine for NativeEngine {
    fn name(&self) -> &str {
        "native"
    }

    fn matches(&self, regex: &[u8], input: &[u8]) -> Result<bool> {
        let library = self.library_for(regex)?;
        library.matches(input)
    }
}

/// FNV-1a over the pattern bytes; names the generated translation unit.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
