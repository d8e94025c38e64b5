//! C++ source generation for native matchers.
//!
//! A generated translation unit embeds one pattern in a `std::regex` and
//! exports a single `matches(input, length)` symbol with C linkage. The
//! export macro block keeps the symbol visible under MSVC, GCC and Clang.

use crate::domain::escape;

/// Shared preamble: feature-test guard plus a portable export macro.
const EXPORT_PREAMBLE: &str = r#"#ifndef __has_attribute
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
"#;

/// Generate a full-match translation unit for `pattern`.
pub fn matcher_source(pattern: &[u8]) -> String {
    let mut literal = String::new();
    for &b in pattern {
        literal.push_str(&escape::cpp_string_literal(b, b'"'));
    }

    let mut source = String::new();
    source.push_str("#include <cstddef>\n");
    source.push_str("#include <regex>\n\n");
    source.push_str(EXPORT_PREAMBLE);
    source.push('\n');
    source.push_str(&format!(
        "static const std::regex kPattern(\"{}\", std::regex::ECMAScript);\n\n",
        literal
    ));
    source.push_str(
        "extern \"C\" LIB_EXPORT int matches(const char* input, std::size_t length)\n\
         {\n\
             return std::regex_match(input, input + length, kPattern) ? 1 : 0;\n\
         }\n",
    );
    source
}
