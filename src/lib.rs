// Library entry point for Rexmark.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod jit;
pub mod ports;
