//! Concrete semantic versions and their precedence

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::range::error::RangeError;
use crate::range::grammar::FULL_PLAIN;

/// A single dot-separated pre-release identifier
///
/// Numeric identifiers compare numerically and rank below alphanumeric
/// ones, which compare as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            // No leading zeros, so the longer number is the bigger one
            (true, true) => self
                .0
                .len()
                .cmp(&other.0.len())
                .then_with(|| self.0.cmp(&other.0)),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` version
///
/// Build metadata is kept for display but ignored by equality and ordering.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<Identifier>,
    pub build: Vec<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parse a concrete version, ignoring surrounding whitespace and any
    /// leading `v` / `=` characters.
    ///
    /// Partial versions (`1.2`) and wildcards (`1.x`) are rejected.
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let plain = input
            .trim()
            .trim_start_matches(|c: char| c == 'v' || c == '=' || c.is_whitespace());
        Self::parse_plain(plain).ok_or_else(|| RangeError::InvalidVersion(input.to_string()))
    }

    /// Parse a version with no prefix at all
    pub(crate) fn parse_plain(plain: &str) -> Option<Self> {
        let caps = FULL_PLAIN.captures(plain)?;

        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
            prerelease: caps
                .get(4)
                .map(|m| m.as_str().split('.').map(Identifier::new).collect())
                .unwrap_or_default(),
            build: caps
                .get(5)
                .map(|m| m.as_str().split('.').map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }
}

/// A version without a pre-release ranks above any pre-release of the same
/// triple; otherwise identifiers are compared pairwise and a shorter list
/// with an equal prefix ranks lower.
fn compare_prerelease(left: &[Identifier], right: &[Identifier]) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.iter().cmp(right.iter()),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            let prerelease: Vec<&str> = self.prerelease.iter().map(Identifier::as_str).collect();
            write!(f, "-{}", prerelease.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", Version::new(1, 2, 3))]
    #[case("v1.2.3", Version::new(1, 2, 3))]
    #[case("=1.2.3", Version::new(1, 2, 3))]
    #[case("  =v1.2.3  ", Version::new(1, 2, 3))]
    #[case("0.0.0", Version::new(0, 0, 0))]
    fn parse_accepts_prefixed_versions(#[case] input: &str, #[case] expected: Version) {
        assert_eq!(Version::parse(input).unwrap(), expected);
    }

    #[test]
    fn parse_splits_prerelease_and_build() {
        let version = Version::parse("1.0.0-alpha.1+exp.sha.5114f85").unwrap();

        assert_eq!(
            version.prerelease,
            vec![Identifier::new("alpha"), Identifier::new("1")]
        );
        assert_eq!(version.build, vec!["exp", "sha", "5114f85"]);
        assert_eq!(version.to_string(), "1.0.0-alpha.1+exp.sha.5114f85");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-version")]
    #[case("1.2")]
    #[case("1.x.0")]
    #[case("01.2.3")]
    #[case("1.2.3-")]
    #[case("1.2.3-beta..1")]
    #[case(">=1.2.3")]
    #[case("99999999999999999999.0.0")]
    #[case("1.2.3-1\u{0662}")]
    #[case("\u{0661}.2.3")]
    fn parse_rejects_malformed_versions(#[case] input: &str) {
        assert_eq!(
            Version::parse(input),
            Err(RangeError::InvalidVersion(input.to_string()))
        );
    }

    #[rstest]
    #[case("1.2.3", "1.2.4", Ordering::Less)]
    #[case("1.10.0", "1.9.0", Ordering::Greater)]
    #[case("2.0.0", "1.99.99", Ordering::Greater)]
    #[case("1.0.0", "1.0.0-rc.1", Ordering::Greater)]
    #[case("1.0.0-alpha", "1.0.0-alpha.1", Ordering::Less)]
    #[case("1.0.0-alpha.9", "1.0.0-alpha.10", Ordering::Less)]
    #[case("1.0.0-alpha.beta", "1.0.0-beta", Ordering::Less)]
    #[case("1.0.0-1", "1.0.0-alpha", Ordering::Less)]
    #[case("1.0.0-9", "1.0.0-10a", Ordering::Less)]
    #[case("1.0.0-1", "1.0.0--x", Ordering::Less)]
    #[case("1.0.0-beta.9", "1.0.0-beta.10a", Ordering::Less)]
    #[case("1.0.0-rc.1", "1.0.0-rc.1", Ordering::Equal)]
    #[case("1.0.0+build.1", "1.0.0+build.2", Ordering::Equal)]
    fn versions_order_by_precedence(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: Ordering,
    ) {
        let left = Version::parse(left).unwrap();
        let right = Version::parse(right).unwrap();
        assert_eq!(left.cmp(&right), expected);
    }
}
