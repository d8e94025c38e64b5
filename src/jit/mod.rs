// Native toolchain: platform detection, compiler discovery, C++ codegen,
// dynamic loading, and the engine built on top of them.

pub mod codegen;
pub mod compiler;
pub mod engine;
pub mod language;
pub mod library;
pub mod platform;

pub use compiler::{CompilerRunner, ToolchainConfig};
pub use engine::NativeEngine;
pub use language::{Language, LanguageVersion};
pub use library::NativeLibrary;
pub use platform::{Arch, Os};
