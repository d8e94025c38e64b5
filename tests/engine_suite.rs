//! The built-in case corpus against the built-in engines.
//! Every engine shipped with the crate must agree with the corpus answers.

use rexmark::domain::ast::Regex;
use rexmark::domain::cases::{CaseListBuilder, TestCase};
use rexmark::domain::defaults::DefaultCases;
use rexmark::domain::escape;
use rexmark::infrastructure::{CachingEngine, PikeEngine};
use rexmark::ports::{CaseProvider, RegexEngine};

fn default_cases() -> Vec<TestCase> {
    let provider = DefaultCases::new(b"Sherlock Holmes kept talking while Watson was writing.\n".to_vec());
    let mut builder = CaseListBuilder::new(provider.name());
    provider.provide(&mut builder).unwrap();
    builder.into_cases()
}

fn run_corpus(engine: &dyn RegexEngine) {
    for case in default_cases() {
        if case.window.is_some() {
            continue;
        }
        let actual = engine
            .matches(&case.regex, &case.input)
            .unwrap_or_else(|err| panic!("{} errored on {}: {:#}", engine.name(), case, err));
        assert_eq!(actual, case.expected, "{} disagreed on {}", engine.name(), case);
    }
}

#[test]
fn every_default_pattern_parses() {
    for case in default_cases() {
        assert!(
            Regex::parse(&case.regex).is_ok(),
            "pattern failed to parse: {}",
            case
        );
    }
}

#[test]
fn pike_engine_passes_the_default_corpus() {
    run_corpus(&PikeEngine);
}

#[test]
fn caching_engine_passes_the_default_corpus() {
    run_corpus(&CachingEngine::new());
}

#[test]
fn combined_character_classes() {
    let engine = PikeEngine;
    let matches = |pattern: &str, input: &str| {
        engine
            .matches(
                &escape::to_bytes(pattern).unwrap(),
                &escape::to_bytes(input).unwrap(),
            )
            .unwrap()
    };
    assert!(matches("a[bB][0-9]\\d\\w?.\\s", "aB42_\n\u{0C}"));
    assert!(!matches("a[bB][0-9]\\d\\w?", "aB42-"));
}

#[test]
fn engines_agree_on_the_benchmark_patterns() {
    let pike = PikeEngine;
    let caching = CachingEngine::new();
    for case in default_cases() {
        if !case.benchmark || case.window.is_some() {
            continue;
        }
        assert_eq!(
            pike.matches(&case.regex, &case.input).unwrap(),
            caching.matches(&case.regex, &case.input).unwrap(),
            "engines disagreed on {}",
            case
        );
    }
}
