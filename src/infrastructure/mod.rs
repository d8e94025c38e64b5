// Engines, the benchmark runner, reporting, and input loading.

pub mod caching;
pub mod concurrency;
pub mod corpus;
pub mod pike;
pub mod report;
pub mod runner;
pub mod toml_cases;

pub use caching::CachingEngine;
pub use pike::PikeEngine;
pub use toml_cases::TomlCases;
