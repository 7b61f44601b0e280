//! Operator + version pairs, the atoms of a range

use std::cmp::Ordering;
use std::fmt;

use crate::range::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `1.2.3` or `=1.2.3`
    Exact,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Operator {
    /// Split a leading operator off a comparator token.
    /// Tokens without an operator are exact matches.
    fn split(token: &str) -> (Self, &str) {
        const PREFIXES: [(&str, Operator); 5] = [
            (">=", Operator::GreaterOrEqual),
            ("<=", Operator::LessOrEqual),
            (">", Operator::Greater),
            ("<", Operator::Less),
            ("=", Operator::Exact),
        ];

        PREFIXES
            .iter()
            .find_map(|(prefix, op)| token.strip_prefix(prefix).map(|rest| (*op, rest)))
            .unwrap_or((Operator::Exact, token))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Exact => "",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Exact => ordering == Ordering::Equal,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::Less => ordering == Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    pub operator: Operator,
    pub version: Version,
}

impl Comparator {
    /// Parse a fully desugared comparator such as `>=1.2.3` or `<2.0.0-0`.
    ///
    /// Partial versions and wildcards are not accepted here; they must be
    /// expanded by the range rewriting stages first.
    pub fn parse(token: &str) -> Option<Self> {
        let (operator, rest) = Operator::split(token.trim());
        let rest = rest.trim_start();
        let plain = rest.strip_prefix('v').unwrap_or(rest);

        Version::parse_plain(plain).map(|version| Self { operator, version })
    }

    /// Check whether `version` satisfies this comparator
    pub fn matches(&self, version: &Version) -> bool {
        self.operator.accepts(version.cmp(&self.version))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", Operator::Exact)]
    #[case("=1.2.3", Operator::Exact)]
    #[case(">1.2.3", Operator::Greater)]
    #[case(">=1.2.3", Operator::GreaterOrEqual)]
    #[case("<1.2.3", Operator::Less)]
    #[case("<=1.2.3", Operator::LessOrEqual)]
    #[case(">= v1.2.3", Operator::GreaterOrEqual)]
    fn parse_reads_operator(#[case] token: &str, #[case] expected: Operator) {
        let comparator = Comparator::parse(token).unwrap();
        assert_eq!(comparator.operator, expected);
        assert_eq!(comparator.version, Version::new(1, 2, 3));
    }

    #[rstest]
    #[case("")]
    #[case(">=")]
    #[case("==1.2.3")]
    #[case("=>1.2.3")]
    #[case(">=1.2")]
    #[case("~1.2.3")]
    #[case("not")]
    fn parse_rejects_unexpanded_or_malformed_tokens(#[case] token: &str) {
        assert_eq!(Comparator::parse(token), None);
    }

    #[rstest]
    #[case("1.2.3", "1.2.3", true)]
    #[case("1.2.3", "1.2.4", false)]
    #[case(">1.2.3", "1.2.4", true)]
    #[case(">1.2.3", "1.2.3", false)]
    #[case(">=1.2.3", "1.2.3", true)]
    #[case(">=1.2.3", "1.2.3-rc.1", false)]
    #[case("<2.0.0-0", "2.0.0-alpha", false)]
    #[case("<2.0.0-0", "1.99.0", true)]
    #[case("<=1.2.3", "1.2.3", true)]
    #[case("<=1.2.3", "1.2.4", false)]
    #[case(">1.0.0-alpha", "1.0.0", true)]
    fn matches_compares_against_version(
        #[case] comparator: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        let comparator = Comparator::parse(comparator).unwrap();
        let version = Version::parse(version).unwrap();
        assert_eq!(comparator.matches(&version), expected);
    }

    #[test]
    fn display_round_trips_operator_and_version() {
        let comparator = Comparator::parse("<2.0.0-0").unwrap();
        assert_eq!(comparator.to_string(), "<2.0.0-0");
    }
}
