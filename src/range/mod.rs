//! Semantic version range matching
//!
//! A range is desugared into plain comparators by a chain of string
//! rewrites, then every comparator is checked against the candidate version.
//!
//! ```text
//! "^1.2.3 || 2.x"
//!        │ split on ||
//!        ▼
//! ┌─────────────┐   ┌─────────────────────┐   ┌──────────────────┐
//! │   hyphen    │──▶│ trim >= ~ ^ spacing │──▶│ per term: ^ ~ x *│
//! └─────────────┘   └─────────────────────┘   └──────────────────┘
//!                                                      │ drop >=0.0.0
//!                                                      ▼
//!                                       ">=1.2.3 <2.0.0-0" (AND)
//! ```
//!
//! # Modules
//!
//! - [`version`]: concrete versions and precedence
//! - [`comparator`]: operator + version atoms
//! - [`rewrite`]: the desugaring stages
//! - [`error`]: parse errors

pub mod comparator;
pub mod error;
mod grammar;
pub mod rewrite;
pub mod version;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

pub use comparator::{Comparator, Operator};
pub use error::RangeError;
pub use version::{Identifier, Version};

/// A single range set: comparators that must all hold
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range {
    comparators: Vec<Comparator>,
}

impl Range {
    /// Desugar and parse a range without `||` alternatives.
    ///
    /// An empty range (or one made only of `*`) matches every version.
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        let comparators = rewrite::desugar(range)
            .into_iter()
            .map(|term| {
                Comparator::parse(&term).ok_or_else(|| RangeError::InvalidComparator {
                    comparator: term,
                    range: range.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { comparators })
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// Check if `version` satisfies every comparator
    pub fn test(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comparators.is_empty() {
            return f.write_str("*");
        }
        let terms: Vec<String> = self.comparators.iter().map(Comparator::to_string).collect();
        f.write_str(&terms.join(" "))
    }
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `||`-separated alternatives, any of which may hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<Range>,
}

impl RangeSet {
    /// Parse a range expression. Every alternative must parse.
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        let ranges = range
            .split("||")
            .map(Range::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn test(&self, version: &Version) -> bool {
        self.ranges.iter().any(|r| r.test(version))
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(Range::to_string).collect();
        f.write_str(&ranges.join(" || "))
    }
}

impl FromStr for RangeSet {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Like [`satisfies`], but reports malformed input instead of folding it into
/// `false`.
pub fn try_satisfies(version: &str, range: &str) -> Result<bool, RangeError> {
    let version = Version::parse(version)?;
    let range = RangeSet::parse(range)?;
    Ok(range.test(&version))
}

/// Check whether a concrete `version` satisfies `range`.
///
/// Never fails: an unparseable version or range term yields `false`.
///
/// ```
/// use version_range::satisfies;
///
/// assert!(satisfies("1.5.0", "^1.2.3"));
/// assert!(!satisfies("0.3.0", "^0.2.3"));
/// assert!(!satisfies("not-a-version", "1.0.0"));
/// ```
pub fn satisfies(version: &str, range: &str) -> bool {
    match try_satisfies(version, range) {
        Ok(satisfied) => satisfied,
        Err(e) => {
            debug!("Rejecting {:?} against {:?}: {}", version, range, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("^1.2.3", ">=1.2.3 <2.0.0-0")]
    #[case("~1.2", ">=1.2.0 <1.3.0-0")]
    #[case("1.2.3", "1.2.3")]
    #[case("*", "*")]
    #[case(">=0.0.0", "*")]
    #[case("1.2.3 - 2.3.4", ">=1.2.3 <=2.3.4")]
    fn range_display_shows_desugared_comparators(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Range::parse(input).unwrap().to_string(), expected);
    }

    #[test]
    fn range_parse_reports_offending_term() {
        assert_eq!(
            Range::parse(">=1.0.0 bogus"),
            Err(RangeError::InvalidComparator {
                comparator: "bogus".to_string(),
                range: ">=1.0.0 bogus".to_string(),
            })
        );
    }

    // The bound above u64::MAX cannot be written, so the range is rejected
    #[rstest]
    #[case("^18446744073709551615.0.0", "<?.0.0-0")]
    #[case("~1.18446744073709551615.0", "<1.?.0-0")]
    #[case(">18446744073709551615", ">=?.0.0")]
    #[case("<=1.18446744073709551615", "<1.?.0-0")]
    fn range_parse_rejects_overflowing_bounds(#[case] input: &str, #[case] comparator: &str) {
        assert_eq!(
            Range::parse(input),
            Err(RangeError::InvalidComparator {
                comparator: comparator.to_string(),
                range: input.to_string(),
            })
        );
        assert!(!satisfies("18446744073709551615.18446744073709551615.0", input));
    }

    #[test]
    fn range_set_display_joins_alternatives() {
        let set = RangeSet::parse("^1.0.0 || 2.x").unwrap();
        assert_eq!(set.ranges().len(), 2);
        assert_eq!(set.to_string(), ">=1.0.0 <2.0.0-0 || >=2.0.0 <3.0.0-0");
    }

    #[rstest]
    #[case("1.5.0", "^1.0.0 || ^2.0.0", true)]
    #[case("2.5.0", "^1.0.0 || ^2.0.0", true)]
    #[case("3.0.0", "^1.0.0 || ^2.0.0", false)]
    #[case("1.2.0", ">=1.0.0 <1.5.0 || >=2.0.0", true)]
    #[case("1.6.0", ">=1.0.0 <1.5.0 || >=2.0.0", false)]
    #[case("2.0.0", "1.0.0 || 2.0.0 || 3.0.0", true)]
    #[case("4.0.0", "1.0.0 || 2.0.0 || 3.0.0", false)]
    #[case("9.9.9", "1.0.0 ||", true)]
    fn range_set_matches_any_alternative(
        #[case] version: &str,
        #[case] range: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[test]
    fn range_set_with_malformed_alternative_fails() {
        assert!(!satisfies("1.0.0", "1.0.0 || bogus"));
        assert!(matches!(
            try_satisfies("1.0.0", "1.0.0 || bogus"),
            Err(RangeError::InvalidComparator { .. })
        ));
    }

    #[test]
    fn try_satisfies_distinguishes_bad_version() {
        assert_eq!(
            try_satisfies("1.2", "1.x"),
            Err(RangeError::InvalidVersion("1.2".to_string()))
        );
        assert_eq!(try_satisfies("1.2.0", "1.x"), Ok(true));
        assert_eq!(try_satisfies("2.2.0", "1.x"), Ok(false));
    }
}
