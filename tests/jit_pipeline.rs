//! Native toolchain smoke tests: generate, compile, load, call.
//! The compile tests need a system C++ compiler and are ignored by default.

use rexmark::jit::{CompilerRunner, LanguageVersion, NativeEngine, NativeLibrary, ToolchainConfig};
use rexmark::ports::RegexEngine;

const SUM_MATCHER: &str = r#"#include <cstddef>

#ifndef __has_attribute
  #define __has_attribute(x) 0
#endif

#ifndef LIB_EXPORT
  #if defined(_WIN32) || defined(_WIN64)
    #define LIB_EXPORT    __declspec(dllexport)
  #elif (defined(__GNUC__) && ((__GNUC__ > 4) || (__GNUC__ == 4) && (__GNUC_MINOR__ > 2))) || __has_attribute(visibility)
    #ifdef ARM
      #define LIB_EXPORT  __attribute__((externally_visible,visibility("default")))
    #else
      #define LIB_EXPORT  __attribute__((visibility("default")))
    #endif
  #else
    #define LIB_EXPORT
  #endif
#endif

extern "C" LIB_EXPORT int matches(const char* input, std::size_t length)
{
    return length == 3 && input[0] + input[1] == input[2] ? 1 : 0;
}
"#;

#[test]
#[ignore] // Requires a system C++ compiler to be installed
fn compile_load_and_call() {
    let work_dir = tempfile::tempdir().unwrap();
    let runner = CompilerRunner::new(ToolchainConfig::default());
    let library_path = runner
        .compile(SUM_MATCHER, LanguageVersion::CPP17, work_dir.path(), "sum")
        .unwrap();
    let library = NativeLibrary::load(&library_path).unwrap();

    assert!(library.matches(&[1, 2, 3]).unwrap());
    assert!(!library.matches(&[2, 2, 5]).unwrap());
    assert!(!library.matches(&[]).unwrap());
    assert!(!library.matches(b"A").unwrap());
}

#[test]
#[ignore] // Requires a system C++ compiler to be installed
fn native_engine_matches_like_the_reference() {
    let engine = NativeEngine::new(ToolchainConfig::default(), LanguageVersion::CPP17).unwrap();
    let probes: [(&[u8], &[u8], bool); 5] = [
        (b"a+b", b"aaab", true),
        (b"a+b", b"b", false),
        (b"(x|y)*", b"xyxy", true),
        (b"(x|y)*", b"xyz", false),
        (b"[0-9]{2,4}", b"123", true),
    ];
    for (regex, input, expected) in probes {
        assert_eq!(
            engine.matches(regex, input).unwrap(),
            expected,
            "native engine disagreed on {:?} vs {:?}",
            regex,
            input
        );
    }
}
