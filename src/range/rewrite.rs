//! Range desugaring stages
//!
//! Each stage is a pure `&str -> String` rewrite. Whole-range stages run
//! first, then every whitespace-separated term goes through the term stages,
//! leaving only plain comparators such as `>=1.2.3 <2.0.0-0`.

use regex::Captures;

use crate::range::grammar::{
    CARET, CARET_TRIM, COMPARATOR_TRIM, GTE0, HYPHEN_RANGE, STAR, TILDE, TILDE_TRIM, X_RANGE,
};

/// Stages applied to the complete range string, in order
const RANGE_STAGES: [fn(&str) -> String; 4] =
    [expand_hyphen, trim_comparators, trim_tildes, trim_carets];

/// Stages applied to every term of the trimmed range, in order
const TERM_STAGES: [fn(&str) -> String; 4] =
    [expand_carets, expand_tildes, expand_x_ranges, strip_star];

/// Rewrite a single range set into plain comparator terms.
///
/// Terms that carry no constraint (`*`, `>=0.0.0`) are dropped, so an empty
/// result means "any version".
pub fn desugar(range: &str) -> Vec<String> {
    let range = RANGE_STAGES
        .iter()
        .fold(range.trim().to_string(), |acc, stage| stage(&acc));

    range
        .split_whitespace()
        .map(|term| TERM_STAGES.iter().fold(term.to_string(), |acc, stage| stage(&acc)))
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .map(strip_gte0)
        .filter(|term| !term.is_empty())
        .collect()
}

/// Wildcard component: missing, `x`, `X` or `*`
fn is_x(component: Option<&str>) -> bool {
    match component {
        None => true,
        Some(c) => c.eq_ignore_ascii_case("x") || c == "*",
    }
}

/// Next integer for a numeric component. Values that cannot be incremented
/// produce a component that no later stage accepts.
fn increment(component: &str) -> String {
    component
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .map_or_else(|| "?".to_string(), |n| n.to_string())
}

fn group<'h>(caps: &Captures<'h>, index: usize) -> Option<&'h str> {
    caps.get(index).map(|m| m.as_str())
}

/// Apply `rewrite` to each whitespace-separated term of `input`
fn each_term(input: &str, rewrite: impl Fn(&str) -> String) -> String {
    input
        .split_whitespace()
        .map(rewrite)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1.2.3 - 2.3.4` => `>=1.2.3 <=2.3.4`
///
/// Wildcards in the lower bound zero the missing components; wildcards in the
/// upper bound turn it into an exclusive bound on the next release.
pub(crate) fn expand_hyphen(range: &str) -> String {
    let Some(caps) = HYPHEN_RANGE.captures(range) else {
        return range.to_string();
    };

    let (from_major, from_minor, from_patch) = (group(&caps, 2), group(&caps, 3), group(&caps, 4));
    let from = if is_x(from_major) {
        String::new()
    } else if is_x(from_minor) {
        format!(">={}.0.0", from_major.unwrap_or_default())
    } else if is_x(from_patch) {
        format!(
            ">={}.{}.0",
            from_major.unwrap_or_default(),
            from_minor.unwrap_or_default()
        )
    } else {
        let plain = caps[1].trim_start_matches(|c: char| c == 'v' || c == '=' || c.is_whitespace());
        format!(">={plain}")
    };

    let (to_major, to_minor, to_patch) = (group(&caps, 8), group(&caps, 9), group(&caps, 10));
    let major = to_major.unwrap_or_default();
    let minor = to_minor.unwrap_or_default();
    let to = if is_x(to_major) {
        String::new()
    } else if is_x(to_minor) {
        format!("<{}.0.0-0", increment(major))
    } else if is_x(to_patch) {
        format!("<{major}.{}.0-0", increment(minor))
    } else if let Some(prerelease) = group(&caps, 11) {
        format!("<={major}.{minor}.{}-{prerelease}", to_patch.unwrap_or_default())
    } else {
        let plain = caps[7].trim_start_matches(|c: char| c == 'v' || c == '=' || c.is_whitespace());
        format!("<={plain}")
    };

    format!("{from} {to}").trim().to_string()
}

/// `> = 1.2.3` => `>=1.2.3`
pub(crate) fn trim_comparators(range: &str) -> String {
    COMPARATOR_TRIM
        .replace_all(range, |caps: &Captures| {
            let operator: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
            format!("{}{}{}", &caps[1], operator, &caps[3])
        })
        .into_owned()
}

/// `~ 1.2.3` => `~1.2.3`
pub(crate) fn trim_tildes(range: &str) -> String {
    TILDE_TRIM.replace_all(range, "${1}~").into_owned()
}

/// `^ 1.2.3` => `^1.2.3`
pub(crate) fn trim_carets(range: &str) -> String {
    CARET_TRIM.replace_all(range, "${1}^").into_owned()
}

/// Caret ranges allow changes that keep the left-most non-zero component
///
/// `^1.2.3` => `>=1.2.3 <2.0.0-0`, `^0.2.3` => `>=0.2.3 <0.3.0-0`,
/// `^0.0.3` => `>=0.0.3 <0.0.4-0`
pub(crate) fn expand_carets(range: &str) -> String {
    each_term(range, |term| {
        let Some(caps) = CARET.captures(term) else {
            return term.to_string();
        };
        let (major, minor, patch) = (group(&caps, 1), group(&caps, 2), group(&caps, 3));

        if is_x(major) {
            return String::new();
        }
        let major = major.unwrap_or_default();
        if is_x(minor) {
            return format!(">={major}.0.0 <{}.0.0-0", increment(major));
        }
        let minor = minor.unwrap_or_default();
        if is_x(patch) {
            return if major == "0" {
                format!(">={major}.{minor}.0 <{major}.{}.0-0", increment(minor))
            } else {
                format!(">={major}.{minor}.0 <{}.0.0-0", increment(major))
            };
        }
        let patch = patch.unwrap_or_default();

        let floor = match group(&caps, 4) {
            Some(prerelease) => format!(">={major}.{minor}.{patch}-{prerelease}"),
            None => format!(">={major}.{minor}.{patch}"),
        };
        let ceiling = if major != "0" {
            format!("<{}.0.0-0", increment(major))
        } else if minor != "0" {
            format!("<{major}.{}.0-0", increment(minor))
        } else {
            format!("<{major}.{minor}.{}-0", increment(patch))
        };
        format!("{floor} {ceiling}")
    })
}

/// Tilde ranges allow patch-level changes when a minor version is given
///
/// `~1.2.3` => `>=1.2.3 <1.3.0-0`, `~1` => `>=1.0.0 <2.0.0-0`
pub(crate) fn expand_tildes(range: &str) -> String {
    each_term(range, |term| {
        let Some(caps) = TILDE.captures(term) else {
            return term.to_string();
        };
        let (major, minor, patch) = (group(&caps, 1), group(&caps, 2), group(&caps, 3));

        if is_x(major) {
            return String::new();
        }
        let major = major.unwrap_or_default();
        if is_x(minor) {
            return format!(">={major}.0.0 <{}.0.0-0", increment(major));
        }
        let minor = minor.unwrap_or_default();
        let ceiling = format!("<{major}.{}.0-0", increment(minor));
        if is_x(patch) {
            return format!(">={major}.{minor}.0 {ceiling}");
        }
        let patch = patch.unwrap_or_default();

        match group(&caps, 4) {
            Some(prerelease) => format!(">={major}.{minor}.{patch}-{prerelease} {ceiling}"),
            None => format!(">={major}.{minor}.{patch} {ceiling}"),
        }
    })
}

/// Partial versions and wildcards, with or without an operator
///
/// `1.x` => `>=1.0.0 <2.0.0-0`, `>1.2` => `>=1.3.0`, `<=1` => `<2.0.0-0`,
/// `*` => `*`
pub(crate) fn expand_x_ranges(range: &str) -> String {
    each_term(range, |term| {
        let term = term.trim();
        let Some(caps) = X_RANGE.captures(term) else {
            return term.to_string();
        };
        let (major, minor, patch) = (group(&caps, 2), group(&caps, 3), group(&caps, 4));

        let x_major = is_x(major);
        let x_minor = x_major || is_x(minor);
        let x_patch = x_minor || is_x(patch);

        let mut operator = &caps[1];
        if operator == "=" && x_patch {
            operator = "";
        }

        if x_major {
            return if operator == ">" || operator == "<" {
                // Nothing is above or below every version
                "<0.0.0-0".to_string()
            } else {
                "*".to_string()
            };
        }

        let major = major.unwrap_or_default();
        let minor = if x_minor { "0" } else { minor.unwrap_or_default() };

        if !operator.is_empty() && x_patch {
            let (operator, major, minor) = match operator {
                ">" if x_minor => (">=", increment(major), "0".to_string()),
                ">" => (">=", major.to_string(), increment(minor)),
                "<=" if x_minor => ("<", increment(major), "0".to_string()),
                "<=" => ("<", major.to_string(), increment(minor)),
                other => (other, major.to_string(), minor.to_string()),
            };
            let prerelease = if operator == "<" { "-0" } else { "" };
            return format!("{operator}{major}.{minor}.0{prerelease}");
        }

        if x_minor {
            format!(">={major}.0.0 <{}.0.0-0", increment(major))
        } else if x_patch {
            format!(">={major}.{minor}.0 <{major}.{}.0-0", increment(minor))
        } else {
            term.to_string()
        }
    })
}

/// Drop `*` terms, which match everything
pub(crate) fn strip_star(range: &str) -> String {
    STAR.replace(range.trim(), "").into_owned()
}

/// `>=0.0.0` carries no constraint once desugared
pub(crate) fn strip_gte0(term: &str) -> String {
    GTE0.replace(term.trim(), "").into_owned()
}
