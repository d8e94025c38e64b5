// Core model: pattern syntax, cases, and timing statistics.

pub mod ast;
pub mod cases;
pub mod defaults;
pub mod escape;
pub mod parser;
pub mod stats;
