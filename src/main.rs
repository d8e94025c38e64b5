// Command-line entry point for Rexmark.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;

use rexmark::application::{Harness, HarnessOptions};
use rexmark::domain::defaults::DefaultCases;
use rexmark::infrastructure::{corpus, CachingEngine, PikeEngine, TomlCases};
use rexmark::jit::{LanguageVersion, NativeEngine, ToolchainConfig};
use rexmark::ports::RegexEngine;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Skip the correctness phase and go straight to benchmarks
    #[arg(long)]
    no_tests: bool,

    /// Suppress the live progress line
    #[arg(long)]
    no_progress: bool,

    /// Engines to run: pike, caching, native (can specify multiple)
    #[arg(long = "engine")]
    engines: Vec<String>,

    /// Additional case files (TOML, can specify multiple)
    #[arg(long = "cases")]
    cases: Vec<PathBuf>,

    /// Text corpus for the sliding-window benchmarks
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Native compiler override (on Windows: a vcvars batch file)
    #[arg(long)]
    compiler: Option<PathBuf>,

    /// Extra native compiler flags (can specify multiple)
    #[arg(long = "cflag")]
    cflags: Vec<String>,

    /// Language standard for the native engine (e.g. c++17, gnu++20, c11)
    #[arg(long = "std", default_value = "c++17")]
    standard: String,
}

fn build_engine(name: &str, cli: &Cli) -> Result<Arc<dyn RegexEngine>> {
    match name {
        "pike" => Ok(Arc::new(PikeEngine)),
        "caching" => Ok(Arc::new(CachingEngine::new())),
        "native" => {
            let config = ToolchainConfig {
                compiler_override: cli.compiler.clone(),
                extra_flags: cli.cflags.clone(),
            };
            let version = LanguageVersion::parse(&cli.standard)?;
            Ok(Arc::new(NativeEngine::new(config, version)?))
        }
        other => bail!("Unknown engine \"{}\" (expected pike, caching or native)", other),
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = rexmark::infrastructure::concurrency::init_thread_pool() {
        eprintln!("[rexmark] Thread pool already initialized: {}", err);
    }

    let engine_names: Vec<String> = if cli.engines.is_empty() {
        vec!["pike".to_string(), "caching".to_string()]
    } else {
        cli.engines.clone()
    };

    let mut harness = Harness::new();
    for name in &engine_names {
        harness.register_engine(build_engine(name, &cli)?);
    }

    let corpus = corpus::load(cli.corpus.as_deref())?;
    harness.register_provider(Box::new(DefaultCases::new(corpus)));
    for path in &cli.cases {
        harness.register_provider(Box::new(TomlCases::from_path(path)?));
    }

    let options = HarnessOptions {
        run_tests: !cli.no_tests,
        show_progress: !cli.no_progress,
        json_path: cli.json.clone(),
    };
    harness.run(&options)?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
