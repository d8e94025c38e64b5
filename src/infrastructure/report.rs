//! Result reporting: console formatting and the JSON export.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::infrastructure::runner::{BenchOutcome, EngineBenchReport};

// ─────────────────────────────────────────────────────────────────────────
// Time units
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimeUnit {
    /// Largest first.
    pub const DESCENDING: [TimeUnit; 7] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
        TimeUnit::Millis,
        TimeUnit::Micros,
        TimeUnit::Nanos,
    ];

    pub fn convert(&self, duration: Duration) -> u128 {
        match self {
            TimeUnit::Days => u128::from(duration.as_secs() / 86_400),
            TimeUnit::Hours => u128::from(duration.as_secs() / 3_600),
            TimeUnit::Minutes => u128::from(duration.as_secs() / 60),
            TimeUnit::Seconds => u128::from(duration.as_secs()),
            TimeUnit::Millis => duration.as_millis(),
            TimeUnit::Micros => duration.as_micros(),
            TimeUnit::Nanos => duration.as_nanos(),
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            TimeUnit::Days => "day",
            TimeUnit::Hours => "hr",
            TimeUnit::Minutes => "min",
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "us",
            TimeUnit::Nanos => "ns",
        }
    }
}

/// The largest unit in which `min` is still nonzero, so the smallest value
/// in a report never prints as 0.
pub fn best_unit(min: Duration) -> TimeUnit {
    for unit in TimeUnit::DESCENDING {
        if unit.convert(min) != 0 {
            return unit;
        }
    }
    TimeUnit::Nanos
}

pub fn format_in(duration: Duration, unit: TimeUnit) -> String {
    unit.convert(duration).to_string()
}

// ─────────────────────────────────────────────────────────────────────────
// Console report
// ─────────────────────────────────────────────────────────────────────────

/// Print one engine's benchmark results. All lines share the unit that fits
/// the engine's smallest minimum.
pub fn print_benchmark_report(report: &EngineBenchReport) {
    println!("{}:", report.engine);

    let mut smallest = Duration::MAX;
    for outcome in &report.outcomes {
        if outcome.stats.min < smallest {
            smallest = outcome.stats.min;
        }
    }
    let unit = best_unit(smallest);
    let unit_name = unit.short_name();

    for (position, outcome) in report.outcomes.iter().enumerate() {
        print!("Benchmark {}: ", position + 1);
        if let Some(failed) = outcome.failed_iteration {
            print!("failed ");
            if failed != 0 {
                print!("at iteration {} ", failed);
            }
            if outcome.case.window.is_none() {
                print!(
                    "(expected {}match) ",
                    if outcome.case.expected { "" } else { "non-" }
                );
            }
        }

        print!("{}", format_in(outcome.stats.mean, unit));
        if outcome.iterations == 1 {
            println!(" {} (1 iteration)", unit_name);
        } else {
            println!(
                " ± {}  [{} … {}] {} ({} iterations)",
                format_in(outcome.stats.stddev, unit),
                format_in(outcome.stats.min, unit),
                format_in(outcome.stats.max, unit),
                unit_name,
                outcome.iterations
            );
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// JSON report
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub engines: Vec<EngineRunReport>,
}

#[derive(Debug, Serialize)]
pub struct EngineRunReport {
    pub name: String,
    /// Absent when the test phase was skipped.
    pub tests: Option<TestSummary>,
    pub benchmarks: Vec<BenchmarkRecord>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub total_ns: u128,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkRecord {
    pub index: usize,
    pub case: String,
    pub iterations: usize,
    pub failed_iteration: Option<usize>,
    pub min_ns: u128,
    pub max_ns: u128,
    pub mean_ns: u128,
    pub stddev_ns: u128,
}

impl BenchmarkRecord {
    pub fn from_outcome(outcome: &BenchOutcome) -> BenchmarkRecord {
        BenchmarkRecord {
            index: outcome.case_index,
            case: outcome.case.to_string(),
            iterations: outcome.iterations,
            failed_iteration: outcome.failed_iteration,
            min_ns: outcome.stats.min.as_nanos(),
            max_ns: outcome.stats.max.as_nanos(),
            mean_ns: outcome.stats.mean.as_nanos(),
            stddev_ns: outcome.stats.stddev.as_nanos(),
        }
    }
}

pub fn write_json(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    println!("[rexmark] Wrote JSON report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_unit_picks_largest_nonzero() {
        assert_eq!(best_unit(Duration::from_nanos(120)), TimeUnit::Nanos);
        assert_eq!(best_unit(Duration::from_micros(3)), TimeUnit::Micros);
        assert_eq!(best_unit(Duration::from_millis(7)), TimeUnit::Millis);
        assert_eq!(best_unit(Duration::from_secs(2)), TimeUnit::Seconds);
        assert_eq!(best_unit(Duration::from_secs(90)), TimeUnit::Minutes);
        assert_eq!(best_unit(Duration::from_secs(2 * 86_400)), TimeUnit::Days);
    }

    #[test]
    fn test_best_unit_of_zero_is_nanos() {
        assert_eq!(best_unit(Duration::ZERO), TimeUnit::Nanos);
    }

    #[test]
    fn test_conversion_truncates() {
        let d = Duration::from_nanos(1_999);
        assert_eq!(TimeUnit::Micros.convert(d), 1);
        assert_eq!(format_in(d, TimeUnit::Micros), "1");
    }

    #[test]
    fn test_json_record_from_outcome() {
        use crate::domain::cases::TestCase;
        use crate::domain::stats::Statistics;
        use crate::infrastructure::runner::BenchOutcome;

        let outcome = BenchOutcome {
            case_index: 2,
            case: TestCase {
                provider: "default".to_string(),
                regex: b"a+".to_vec(),
                input: b"aaa".to_vec(),
                expected: true,
                benchmark: true,
                window: None,
            },
            iterations: 3,
            failed_iteration: None,
            stats: Statistics::from_nanos(&[10, 20, 30]),
        };
        let record = BenchmarkRecord::from_outcome(&outcome);
        assert_eq!(record.index, 2);
        assert_eq!(record.case, "regex=a+,input=aaa,benchmark,positive");
        assert_eq!(record.mean_ns, 20);
        assert_eq!(record.min_ns, 10);
        assert_eq!(record.max_ns, 30);
    }
}
