//! Run orchestration: collect cases, check engines for correctness, then
//! benchmark and report.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::domain::ast::Regex;
use crate::domain::cases::{CaseListBuilder, TestCase};
use crate::infrastructure::report::{self, BenchmarkRecord, EngineRunReport, RunReport, TestSummary};
use crate::infrastructure::runner;
use crate::ports::{CaseProvider, RegexEngine};

/// How often the benchmark progress line refreshes.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Run the correctness phase before benchmarking.
    pub run_tests: bool,
    /// Show the live progress line. Providers may still veto it.
    pub show_progress: bool,
    /// Also write the run report as JSON.
    pub json_path: Option<PathBuf>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions {
            run_tests: true,
            show_progress: true,
            json_path: None,
        }
    }
}

/// Engines under test plus the providers contributing cases.
#[derive(Default)]
pub struct Harness {
    engines: Vec<Arc<dyn RegexEngine>>,
    providers: Vec<Box<dyn CaseProvider>>,
}

impl Harness {
    pub fn new() -> Harness {
        Harness::default()
    }

    pub fn register_engine(&mut self, engine: Arc<dyn RegexEngine>) {
        self.engines.push(engine);
    }

    pub fn register_provider(&mut self, provider: Box<dyn CaseProvider>) {
        self.providers.push(provider);
    }

    pub fn run(&self, options: &HarnessOptions) -> Result<RunReport> {
        let engines = self.active_engines();
        if engines.is_empty() {
            bail!("No regex engine implementations, nothing to do.");
        }

        let cases = self.collect_cases()?;
        if cases.is_empty() {
            bail!("No test data, nothing to do.");
        }

        validate_patterns(&cases)?;

        let test_cases: Vec<TestCase> = cases.iter().filter(|c| !c.benchmark).cloned().collect();
        let bench_cases: Vec<TestCase> = cases.iter().filter(|c| c.benchmark).cloned().collect();

        let summaries = if options.run_tests {
            Some(run_test_phase(&engines, &test_cases))
        } else {
            None
        };

        let show_progress =
            options.show_progress && !self.providers.iter().any(|p| p.disable_progress());

        let bench_cases = Arc::new(bench_cases);
        let (progress, handle) = runner::spawn(engines.clone(), Arc::clone(&bench_cases))?;

        let mut printer = ProgressPrinter::new(bench_cases.len());
        while !handle.is_finished() {
            if show_progress {
                printer.print(&progress);
            }
            std::thread::sleep(PROGRESS_INTERVAL);
        }
        if show_progress {
            printer.print(&progress);
            println!();
        }

        let bench_reports = handle
            .join()
            .map_err(|_| anyhow::anyhow!("Benchmark thread panicked"))?;

        for bench_report in &bench_reports {
            report::print_benchmark_report(bench_report);
        }

        let mut engine_reports = Vec::with_capacity(bench_reports.len());
        for (index, bench_report) in bench_reports.iter().enumerate() {
            engine_reports.push(EngineRunReport {
                name: bench_report.engine.clone(),
                tests: summaries.as_ref().map(|s| s[index]),
                benchmarks: bench_report
                    .outcomes
                    .iter()
                    .map(BenchmarkRecord::from_outcome)
                    .collect(),
            });
        }
        let run_report = RunReport { engines: engine_reports };

        if let Some(path) = &options.json_path {
            report::write_json(path, &run_report)?;
        }

        Ok(run_report)
    }

    /// Engines no provider vetoed.
    fn active_engines(&self) -> Vec<Arc<dyn RegexEngine>> {
        self.engines
            .iter()
            .filter(|engine| !self.providers.iter().any(|p| p.skip_engine(engine.name())))
            .cloned()
            .collect()
    }

    /// Cases from every provider, minus the ones any provider vetoed.
    fn collect_cases(&self) -> Result<Vec<TestCase>> {
        let mut all = Vec::new();
        for provider in &self.providers {
            let mut builder = CaseListBuilder::new(provider.name());
            provider
                .provide(&mut builder)
                .with_context(|| format!("Case provider {} failed", provider.name()))?;
            all.extend(builder.into_cases());
        }
        all.retain(|case| !self.providers.iter().any(|p| p.skip_case(case)));
        Ok(all)
    }
}

/// Every pattern must parse before any engine sees it; a malformed case is a
/// configuration mistake, not an engine failure.
fn validate_patterns(cases: &[TestCase]) -> Result<()> {
    cases.par_iter().try_for_each(|case| {
        Regex::parse(&case.regex)
            .map(|_| ())
            .with_context(|| format!("Malformed pattern in case {}", case))
    })
}

fn run_test_phase(engines: &[Arc<dyn RegexEngine>], cases: &[TestCase]) -> Vec<TestSummary> {
    let count = cases.len();
    if count == 0 {
        return engines
            .iter()
            .map(|_| TestSummary { passed: 0, failed: 0, total_ns: 0 })
            .collect();
    }

    let mut summaries = Vec::with_capacity(engines.len());
    for engine in engines {
        let name = engine.name();
        let mut failures = 0usize;
        let mut total = Duration::ZERO;

        for (index, case) in cases.iter().enumerate() {
            print!("\r{}: Running test {}/{}... ", name, index + 1, count);
            let _ = io::stdout().flush();

            let regex = case.regex.clone();
            let input = case.input.clone();
            let start = Instant::now();
            let result = engine.matches(&regex, &input);
            total += start.elapsed();

            let failed = match result {
                Ok(actual) => actual != case.expected,
                Err(err) => {
                    eprintln!("[tests] {} errored on {}: {:#}", name, case, err);
                    true
                }
            };

            print!("\r{}: Test {}/{}", name, index + 1, count);
            if failed {
                failures += 1;
                println!(
                    " has failed, expected {}match.",
                    if case.expected { "" } else { "non-" }
                );
            } else {
                print!(" has succeeded. ");
            }
        }
        println!();

        let unit = report::best_unit(total);
        print!("{}: ", name);
        if failures != count {
            print!("{} succeeded", count - failures);
            if failures != 0 {
                print!(" & ");
            }
        }
        if failures != 0 {
            print!("{} failed", failures);
        }
        println!(" in {} {}", report::format_in(total, unit), unit.short_name());

        summaries.push(TestSummary {
            passed: count - failures,
            failed: failures,
            total_ns: total.as_nanos(),
        });
    }
    summaries
}

/// Renders the single-line benchmark status plus per-engine finish lines.
struct ProgressPrinter {
    total_cases: usize,
    printed_finished: usize,
}

impl ProgressPrinter {
    fn new(total_cases: usize) -> ProgressPrinter {
        ProgressPrinter { total_cases, printed_finished: 0 }
    }

    fn print(&mut self, progress: &runner::Progress) {
        let finished = progress.finished();
        for (engine, all_ok) in &finished[self.printed_finished..] {
            println!(
                "\rBenchmarking {} {}.",
                engine,
                if *all_ok { "done" } else { "failed" }
            );
        }
        self.printed_finished = finished.len();

        if let Some(job) = progress.current() {
            let slice = 1.0 / self.total_cases.max(1) as f64;
            let elapsed = job.started.elapsed().as_secs_f64();
            let total = (job.deadline - job.started).as_secs_f64().max(elapsed);
            let fraction = if total > 0.0 { elapsed / total } else { 1.0 };
            let percentage = (job.case_index as f64 * slice + fraction * slice) * 100.0;
            print!("\rBenchmarking {}: {:.1}% ", job.engine, percentage);
            let _ = io::stdout().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pike::PikeEngine;

    struct TinyCases;

    impl CaseProvider for TinyCases {
        fn name(&self) -> &str {
            "tiny"
        }

        fn provide(&self, builder: &mut CaseListBuilder) -> Result<()> {
            builder.add("a+", "aaa", true)?;
            builder.add("a+", "b", false)?;
            builder.add_sliding_window(b".*a.*".to_vec(), b"xxaxxbxxaxx".to_vec(), 4);
            Ok(())
        }

        fn disable_progress(&self) -> bool {
            true
        }
    }

    struct VetoPike;

    impl CaseProvider for VetoPike {
        fn name(&self) -> &str {
            "veto"
        }

        fn provide(&self, _builder: &mut CaseListBuilder) -> Result<()> {
            Ok(())
        }

        fn skip_engine(&self, engine_name: &str) -> bool {
            engine_name == "pike"
        }
    }

    fn options() -> HarnessOptions {
        HarnessOptions { run_tests: true, show_progress: false, json_path: None }
    }

    #[test]
    fn test_run_with_tiny_provider() {
        let mut harness = Harness::new();
        harness.register_engine(Arc::new(PikeEngine));
        harness.register_provider(Box::new(TinyCases));

        let report = harness.run(&options()).unwrap();
        assert_eq!(report.engines.len(), 1);
        let engine = &report.engines[0];
        assert_eq!(engine.name, "pike");
        let tests = engine.tests.unwrap();
        assert_eq!(tests.passed, 2);
        assert_eq!(tests.failed, 0);
        assert_eq!(engine.benchmarks.len(), 1);
        assert!(engine.benchmarks[0].failed_iteration.is_none());
    }

    #[test]
    fn test_no_engines_is_an_error() {
        let mut harness = Harness::new();
        harness.register_provider(Box::new(TinyCases));
        let err = harness.run(&options()).unwrap_err();
        assert!(err.to_string().contains("No regex engine"), "got: {}", err);
    }

    #[test]
    fn test_vetoed_engine_counts_as_absent() {
        let mut harness = Harness::new();
        harness.register_engine(Arc::new(PikeEngine));
        harness.register_provider(Box::new(TinyCases));
        harness.register_provider(Box::new(VetoPike));
        let err = harness.run(&options()).unwrap_err();
        assert!(err.to_string().contains("nothing to do"), "got: {}", err);
    }

    #[test]
    fn test_no_cases_is_an_error() {
        struct Empty;
        impl CaseProvider for Empty {
            fn name(&self) -> &str {
                "empty"
            }
            fn provide(&self, _builder: &mut CaseListBuilder) -> Result<()> {
                Ok(())
            }
        }

        let mut harness = Harness::new();
        harness.register_engine(Arc::new(PikeEngine));
        harness.register_provider(Box::new(Empty));
        let err = harness.run(&options()).unwrap_err();
        assert!(err.to_string().contains("No test data"), "got: {}", err);
    }

    #[test]
    fn test_malformed_pattern_aborts_the_run() {
        struct Broken;
        impl CaseProvider for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn provide(&self, builder: &mut CaseListBuilder) -> Result<()> {
                builder.add_bytes(b"(a".to_vec(), b"a".to_vec(), true);
                Ok(())
            }
        }

        let mut harness = Harness::new();
        harness.register_engine(Arc::new(PikeEngine));
        harness.register_provider(Box::new(Broken));
        let err = harness.run(&options()).unwrap_err();
        assert!(err.to_string().contains("Malformed pattern"), "got: {}", err);
    }
}
