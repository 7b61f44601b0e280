//! Regular expressions describing version and range syntax
//!
//! Patterns are assembled from small fragments so that the strict version
//! grammar, the x-range grammar and the loose grammar used for whitespace
//! trimming share the same building blocks.

use std::sync::LazyLock;

use regex::Regex;

const NUMERIC_IDENTIFIER: &str = r"0|[1-9][0-9]*";
const NUMERIC_IDENTIFIER_LOOSE: &str = r"[0-9]+";
const NON_NUMERIC_IDENTIFIER: &str = r"[0-9]*[a-zA-Z-][a-zA-Z0-9-]*";
const BUILD_IDENTIFIER: &str = r"[0-9A-Za-z-]+";
const X_RANGE_IDENTIFIER: &str = r"0|[1-9][0-9]*|x|X|\*";
/// Comparison operator, allowing stray whitespace between `<`/`>` and `=`
const GTLT: &str = r"((?:<|>)?(?:\s*=)?)";

/// `+build.meta` (one capture group)
fn build() -> String {
    format!(r"(?:\+({BUILD_IDENTIFIER}(?:\.{BUILD_IDENTIFIER})*))")
}

/// `-pre.release` (one capture group)
fn prerelease() -> String {
    let identifier = format!("(?:{NUMERIC_IDENTIFIER}|{NON_NUMERIC_IDENTIFIER})");
    format!(r"(?:-({identifier}(?:\.{identifier})*))")
}

/// Pre-release where the leading `-` is optional and numbers may be zero-padded
fn prerelease_loose() -> String {
    let identifier = format!("(?:{NUMERIC_IDENTIFIER_LOOSE}|{NON_NUMERIC_IDENTIFIER})");
    format!(r"(?:-?({identifier}(?:\.{identifier})*))")
}

/// Partial version with wildcards: major, minor, patch, pre-release, build
fn x_range_plain() -> String {
    let x = X_RANGE_IDENTIFIER;
    format!(
        r"[v=\s]*({x})(?:\.({x})(?:\.({x})(?:{pre})?{build}?)?)?",
        pre = prerelease(),
        build = build()
    )
}

fn loose_plain() -> String {
    let n = NUMERIC_IDENTIFIER_LOOSE;
    format!(
        r"[v=\s]*({n})\.({n})\.({n}){pre}?{build}?",
        pre = prerelease_loose(),
        build = build()
    )
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Strict concrete version: major, minor, patch, pre-release, build
pub(crate) static FULL_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    let n = NUMERIC_IDENTIFIER;
    compile(&format!(
        r"^({n})\.({n})\.({n}){pre}?{build}?$",
        pre = prerelease(),
        build = build()
    ))
});

/// `A - B` spanning the whole range
pub(crate) static HYPHEN_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let plain = x_range_plain();
    compile(&format!(r"^\s*({plain})\s+-\s+({plain})\s*$"))
});

/// Operator followed by whitespace and a version
pub(crate) static COMPARATOR_TRIM: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(\s*){GTLT}\s*({loose}|{x})",
        loose = loose_plain(),
        x = x_range_plain()
    ))
});

pub(crate) static TILDE_TRIM: LazyLock<Regex> = LazyLock::new(|| compile(r"(\s*)~>?\s+"));

pub(crate) static CARET_TRIM: LazyLock<Regex> = LazyLock::new(|| compile(r"(\s*)\^\s+"));

pub(crate) static CARET: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^\^{}$", x_range_plain())));

pub(crate) static TILDE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^~>?{}$", x_range_plain())));

/// Optional operator followed by a possibly partial version
pub(crate) static X_RANGE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^{GTLT}\s*{}$", x_range_plain())));

pub(crate) static STAR: LazyLock<Regex> = LazyLock::new(|| compile(r"(<|>)?=?\s*\*"));

pub(crate) static GTE0: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*>=\s*0\.0\.0\s*$"));

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", true)]
    #[case("0.0.0", true)]
    #[case("1.2.3-alpha.1+build.5", true)]
    #[case("1.2.3-0", true)]
    #[case("01.2.3", false)]
    #[case("1.2", false)]
    #[case("1.2.3-01", false)]
    #[case("1.2.x", false)]
    #[case("v1.2.3", false)]
    #[case("1.2.3-1\u{0662}", false)]
    #[case("1.2.3-\u{0663}a", false)]
    #[case("1.\u{0662}.3", false)]
    fn full_plain_accepts_only_strict_versions(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(FULL_PLAIN.is_match(input), expected);
    }

    #[rstest]
    #[case("1.2.3 - 2.3.4", true)]
    #[case("1.x - 2", true)]
    #[case(" v1.2.3 - 2.3.4-beta ", true)]
    #[case("1.2.3-2.3.4", false)]
    #[case(">=1.2.3 - 2.3.4", false)]
    fn hyphen_range_matches_whole_range(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(HYPHEN_RANGE.is_match(input), expected);
    }

    #[rstest]
    #[case("1.x", true)]
    #[case(">=1.2", true)]
    #[case("<= 1", true)]
    #[case("*", true)]
    #[case(">1.2.3-beta", true)]
    #[case("~1.2.3", false)]
    #[case("not", false)]
    fn x_range_matches_comparator_like_terms(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(X_RANGE.is_match(input), expected);
    }
}
