//! Benchmark execution on a dedicated thread.
//!
//! Benchmarks run engine by engine, case by case, on one thread so samples
//! are not polluted by scheduling noise from sibling benchmarks. The UI
//! thread watches a shared [`Progress`] snapshot.

use std::hint::black_box;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::cases::TestCase;
use crate::domain::stats::Statistics;
use crate::ports::RegexEngine;

/// Hard cap on samples per case; the deadline almost always fires first.
pub const ITERATION_COUNT_MAX: usize = 100_000_000;
/// The pattern buffer is handed to engines repeatedly; re-clone it at this
/// period so an engine that mutates its argument cannot poison later runs.
const REGEX_CLONE_FREQUENCY: usize = 100_000;
/// Wall-clock budget per benchmark case.
pub const CASE_DEADLINE: Duration = Duration::from_secs(10);

/// Result of one benchmark case on one engine.
#[derive(Debug, Clone)]
pub struct BenchOutcome {
    pub case_index: usize,
    pub case: TestCase,
    /// Number of recorded samples.
    pub iterations: usize,
    /// Iteration count at which the engine gave a wrong answer or an error,
    /// if it did.
    pub failed_iteration: Option<usize>,
    pub stats: Statistics,
}

#[derive(Debug, Clone)]
pub struct EngineBenchReport {
    pub engine: String,
    pub outcomes: Vec<BenchOutcome>,
}

/// What the runner is doing right now.
#[derive(Debug, Clone)]
pub struct CurrentJob {
    pub engine: String,
    pub case_index: usize,
    pub started: Instant,
    pub deadline: Instant,
}

/// Shared progress state. The runner writes, the UI thread reads.
#[derive(Default)]
pub struct Progress {
    current: Mutex<Option<CurrentJob>>,
    finished: Mutex<Vec<(String, bool)>>,
}

impl Progress {
    pub fn current(&self) -> Option<CurrentJob> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current(&self, job: Option<CurrentJob>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = job;
    }

    /// Engines the runner has completed, with whether every case passed.
    pub fn finished(&self) -> Vec<(String, bool)> {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push_finished(&self, engine: String, all_ok: bool) {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((engine, all_ok));
    }
}

/// Start the benchmark thread over `engines` × `cases`.
pub fn spawn(
    engines: Vec<Arc<dyn RegexEngine>>,
    cases: Arc<Vec<TestCase>>,
) -> anyhow::Result<(Arc<Progress>, JoinHandle<Vec<EngineBenchReport>>)> {
    let progress = Arc::new(Progress::default());
    let shared = Arc::clone(&progress);

    let handle = thread::Builder::new()
        .name("benchmark".to_string())
        .spawn(move || run_all(&engines, &cases, &shared))
        .map_err(|err| anyhow::anyhow!("Failed to spawn benchmark thread: {}", err))?;

    Ok((progress, handle))
}

fn run_all(
    engines: &[Arc<dyn RegexEngine>],
    cases: &[TestCase],
    progress: &Progress,
) -> Vec<EngineBenchReport> {
    let mut reports = Vec::with_capacity(engines.len());
    for engine in engines {
        let mut outcomes = Vec::with_capacity(cases.len());
        for (case_index, case) in cases.iter().enumerate() {
            let started = Instant::now();
            progress.set_current(Some(CurrentJob {
                engine: engine.name().to_string(),
                case_index,
                started,
                deadline: started + CASE_DEADLINE,
            }));
            let outcome = if case.window.is_some() {
                measure_sliding_window(engine.as_ref(), case, case_index)
            } else {
                measure(engine.as_ref(), case, case_index, started + CASE_DEADLINE)
            };
            outcomes.push(outcome);
        }
        let all_ok = outcomes.iter().all(|o| o.failed_iteration.is_none());
        progress.push_finished(engine.name().to_string(), all_ok);
        reports.push(EngineBenchReport {
            engine: engine.name().to_string(),
            outcomes,
        });
    }
    progress.set_current(None);
    reports
}

/// Time single `matches` calls until the deadline or the iteration cap.
fn measure(
    engine: &dyn RegexEngine,
    case: &TestCase,
    case_index: usize,
    deadline: Instant,
) -> BenchOutcome {
    let mut regex = case.regex.clone();
    let input = &case.input;
    let mut samples: Vec<u64> = Vec::new();
    let mut iterations = 0usize;
    let mut failed_iteration = None;

    loop {
        let start = Instant::now();
        let result = engine.matches(&regex, input);
        let elapsed = start.elapsed();

        match result {
            Ok(actual) if actual == case.expected => {}
            Ok(_) => {
                failed_iteration = Some(iterations);
                break;
            }
            Err(err) => {
                eprintln!("[bench] {} errored on {}: {:#}", engine.name(), case, err);
                failed_iteration = Some(iterations);
                break;
            }
        }

        samples.push(elapsed.as_nanos() as u64);
        iterations += 1;
        if iterations % REGEX_CLONE_FREQUENCY == 0 {
            regex = case.regex.clone();
        }
        if Instant::now() >= deadline || iterations == ITERATION_COUNT_MAX {
            break;
        }
    }

    BenchOutcome {
        case_index,
        case: case.clone(),
        iterations,
        failed_iteration,
        stats: Statistics::from_nanos(&samples),
    }
}

/// Stream the input through the engine in window-sized chunks, summing the
/// per-window call durations into a single sample. The tail window is
/// zero-padded to full size.
fn measure_sliding_window(engine: &dyn RegexEngine, case: &TestCase, case_index: usize) -> BenchOutcome {
    let window = case.window.unwrap_or(case.input.len().max(1));
    let regex = case.regex.clone();
    let input = &case.input;
    let mut total_nanos = 0u64;
    let mut ok = true;

    let mut position = 0;
    while position < input.len() {
        let end = (position + window).min(input.len());
        let mut chunk = input[position..end].to_vec();
        chunk.resize(window, 0);

        let start = Instant::now();
        let result = engine.matches(&regex, &chunk);
        total_nanos += start.elapsed().as_nanos() as u64;

        match result {
            Ok(actual) => {
                black_box(actual);
            }
            Err(err) => {
                eprintln!("[bench] {} errored on {}: {:#}", engine.name(), case, err);
                ok = false;
                break;
            }
        }
        position += window;
    }

    BenchOutcome {
        case_index,
        case: case.clone(),
        iterations: 1,
        failed_iteration: if ok { None } else { Some(1) },
        stats: Statistics::from_nanos(&[total_nanos]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEngine {
        calls: AtomicUsize,
        answer: bool,
    }

    impl RegexEngine for CountingEngine {
        fn name(&self) -> &str {
            "counting"
        }

        fn matches(&self, _regex: &[u8], _input: &[u8]) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.answer)
        }
    }

    struct FailingEngine;

    impl RegexEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        fn matches(&self, _regex: &[u8], _input: &[u8]) -> Result<bool> {
            bail!("engine exploded");
        }
    }

    fn case(expected: bool, window: Option<usize>) -> TestCase {
        TestCase {
            provider: "default".to_string(),
            regex: b"a*".to_vec(),
            input: b"aaaa".to_vec(),
            expected,
            benchmark: true,
            window,
        }
    }

    #[test]
    fn test_wrong_answer_stops_at_iteration_zero() {
        let engine = CountingEngine { calls: AtomicUsize::new(0), answer: false };
        let outcome = measure(&engine, &case(true, None), 0, Instant::now() + CASE_DEADLINE);
        assert_eq!(outcome.failed_iteration, Some(0));
        assert_eq!(outcome.iterations, 0);
        assert_eq!(engine.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_engine_error_counts_as_failure() {
        let outcome = measure(&FailingEngine, &case(true, None), 3, Instant::now() + CASE_DEADLINE);
        assert_eq!(outcome.case_index, 3);
        assert_eq!(outcome.failed_iteration, Some(0));
    }

    #[test]
    fn test_sliding_window_chunks_and_pads() {
        struct WidthChecker {
            window: usize,
            calls: AtomicUsize,
        }
        impl RegexEngine for WidthChecker {
            fn name(&self) -> &str {
                "width-checker"
            }
            fn matches(&self, _regex: &[u8], input: &[u8]) -> Result<bool> {
                assert_eq!(input.len(), self.window);
                self.calls.fetch_add(1, Ordering::Relaxed);
                Ok(true)
            }
        }

        let mut sliding = case(true, Some(3));
        sliding.input = b"abcdefg".to_vec(); // 7 bytes -> 3 windows, last padded
        let engine = WidthChecker { window: 3, calls: AtomicUsize::new(0) };
        let outcome = measure_sliding_window(&engine, &sliding, 0);
        assert_eq!(engine.calls.load(Ordering::Relaxed), 3);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.failed_iteration, None);
    }

    #[test]
    fn test_spawn_reports_finished_engines() {
        let engines: Vec<Arc<dyn RegexEngine>> = vec![Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
            answer: true,
        })];
        // A single already-failing sliding case finishes instantly.
        let cases = Arc::new(vec![case(true, Some(2))]);
        let (progress, handle) = spawn(engines, cases).unwrap();
        let reports = handle.join().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcomes.len(), 1);
        assert_eq!(progress.finished(), vec![("counting".to_string(), true)]);
        assert!(progress.current().is_none());
    }
}
