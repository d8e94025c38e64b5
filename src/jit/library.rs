//! Dynamic loading of compiled matcher libraries.

use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use libloading::{Library, Symbol};

/// The exported matcher entry point: `int matches(const char*, size_t)`.
type MatchesFn = unsafe extern "C" fn(*const c_char, usize) -> c_int;

/// A loaded shared library exposing a `matches` symbol.
#[derive(Debug)]
pub struct NativeLibrary {
    path: PathBuf,
    library: Library,
}

impl NativeLibrary {
    pub fn load(path: &Path) -> Result<NativeLibrary> {
        // SAFETY: loading runs the library's initializers; the libraries
        // loaded here are the matchers this process just compiled.
        let library = unsafe { Library::new(path) }
            .with_context(|| format!("Failed to load native library `{}`", path.display()))?;
        Ok(NativeLibrary { path: path.to_path_buf(), library })
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Call the exported matcher on `input`. Nonzero means match.
    pub fn matches(&self, input: &[u8]) -> Result<bool> {
        // SAFETY: the symbol is produced by our own codegen with exactly this
        // signature; the pointer/length pair stays valid for the call.
        let result = unsafe {
            let function: Symbol<'_, MatchesFn> = self.library.get(b"matches").with_context(|| {
                format!("`matches` was not found in `{}`", self.name())
            })?;
            function(input.as_ptr().cast::<c_char>(), input.len())
        };
        Ok(result != 0)
    }
}
