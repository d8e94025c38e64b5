//! Host platform detection for the native toolchain.

use anyhow::{bail, Result};

/// Operating systems with a known shared-library format and compiler story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Linux,
    MacOs,
}

impl Os {
    pub fn current() -> Result<Os> {
        if cfg!(target_os = "windows") {
            Ok(Os::Windows)
        } else if cfg!(target_os = "linux") {
            Ok(Os::Linux)
        } else if cfg!(target_os = "macos") {
            Ok(Os::MacOs)
        } else {
            bail!(
                "Only Windows, Linux and macOS are supported, OS is \"{}\"",
                std::env::consts::OS
            );
        }
    }

    pub fn readable_name(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::MacOs => "macOS",
        }
    }

    /// File extension of a shared library on this OS, dot included.
    pub fn shared_library_extension(&self) -> &'static str {
        match self {
            Os::Windows => ".dll",
            Os::Linux => ".so",
            Os::MacOs => ".dylib",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.readable_name())
    }
}

/// CPU architectures the toolchain setup knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Aarch64,
}

impl Arch {
    pub fn current() -> Result<Arch> {
        if cfg!(target_arch = "x86_64") {
            Ok(Arch::Amd64)
        } else if cfg!(target_arch = "aarch64") {
            Ok(Arch::Aarch64)
        } else {
            bail!(
                "Only AMD64 and AArch64 architectures are supported, architecture is \"{}\"",
                std::env::consts::ARCH
            );
        }
    }

    pub fn readable_name(&self) -> &'static str {
        match self {
            Arch::Amd64 => "AMD64",
            Arch::Aarch64 => "AArch64",
        }
    }

    /// Name of the Visual Studio environment batch file for this host.
    pub fn vcvars_script(&self) -> &'static str {
        match self {
            Arch::Amd64 => "vcvars64",
            Arch::Aarch64 => "vcvarsamd64_arm64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.readable_name())
    }
}
