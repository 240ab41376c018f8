//! Dependency version ranges
//!
//! `package.json` ranges use npm syntax (`^1.2.3`, `>=1 <2`, `1.2.3 - 2.0.0`,
//! `a || b`). They are rewritten into the comma-separated form the `semver`
//! crate understands, then each alternative is reduced to its lowest admitted
//! version.

use semver::{Comparator, Op, Version, VersionReq};
use tracing::debug;

/// Whether `current` is strictly lower than every version `range` admits.
///
/// A leading operator on `current` is ignored, so `^4.0.0` is read as
/// `4.0.0`. Anything that cannot be parsed on either side is never outdated.
pub fn is_outdated(current: &str, range: &str) -> bool {
    let Some(current_version) = parse_lenient(strip_operator(current)) else {
        debug!(current, "current version is not a plain version, leaving as is");
        return false;
    };
    let Some(alternatives) = parse_range(range) else {
        debug!(range, "unsupported version range, leaving as is");
        return false;
    };

    alternatives
        .iter()
        .all(|requirement| lower_bound(requirement).is_above(&current_version))
}

/// Drop range operators and a `v` prefix from the start of a version.
pub fn strip_operator(version: &str) -> &str {
    version.trim_start_matches(['^', '~', '=', '<', '>', 'v', ' '])
}

/// Parse `4`, `4.17` or `4.17.21` (pre-release and build allowed on the last).
pub fn parse_lenient(version: &str) -> Option<Version> {
    let version = version.trim();
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);
    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// Parse an npm range into its `||` alternatives.
fn parse_range(range: &str) -> Option<Vec<VersionReq>> {
    range
        .split("||")
        .map(|alternative| VersionReq::parse(&normalize_alternative(alternative)).ok())
        .collect()
}

/// Rewrite one npm alternative into `semver` crate syntax.
fn normalize_alternative(alternative: &str) -> String {
    let alternative = alternative.trim();
    if alternative.is_empty() {
        return "*".to_string();
    }

    if let Some((low, high)) = alternative.split_once(" - ") {
        return format!(">={}, <={}", low.trim(), high.trim());
    }

    let mut comparators: Vec<String> = Vec::new();
    let mut pending_operator: Option<&str> = None;
    for token in alternative.split_whitespace() {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '^' | '~')) {
            pending_operator = Some(token);
            continue;
        }
        let token = token.trim_start_matches('v');
        match pending_operator.take() {
            Some(op) => comparators.push(format!("{op}{token}")),
            None => comparators.push(token.to_string()),
        }
    }
    comparators.join(", ")
}

/// Lowest version admitted by one alternative
#[derive(Debug, PartialEq, Eq)]
struct LowerBound {
    version: Version,
    inclusive: bool,
}

impl LowerBound {
    fn unbounded() -> Self {
        Self {
            version: Version::new(0, 0, 0),
            inclusive: true,
        }
    }

    /// Whether every admitted version is above `version`
    fn is_above(&self, version: &Version) -> bool {
        if self.inclusive {
            *version < self.version
        } else {
            *version <= self.version
        }
    }

    fn tighter(self, other: Self) -> Self {
        match self.version.cmp(&other.version) {
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Equal => Self {
                version: self.version,
                inclusive: self.inclusive && other.inclusive,
            },
        }
    }
}

fn lower_bound(requirement: &VersionReq) -> LowerBound {
    requirement
        .comparators
        .iter()
        .map(comparator_lower_bound)
        .fold(LowerBound::unbounded(), LowerBound::tighter)
}

fn comparator_lower_bound(comparator: &Comparator) -> LowerBound {
    let mut floor = Version::new(
        comparator.major,
        comparator.minor.unwrap_or(0),
        comparator.patch.unwrap_or(0),
    );
    floor.pre = comparator.pre.clone();

    match comparator.op {
        Op::Exact | Op::GreaterEq | Op::Tilde | Op::Caret | Op::Wildcard => LowerBound {
            version: floor,
            inclusive: true,
        },
        // `>1` and `>1.2` exclude the whole partial range.
        Op::Greater => match (comparator.minor, comparator.patch) {
            (None, _) => LowerBound {
                version: Version::new(comparator.major + 1, 0, 0),
                inclusive: true,
            },
            (Some(minor), None) => LowerBound {
                version: Version::new(comparator.major, minor + 1, 0),
                inclusive: true,
            },
            (Some(_), Some(_)) => LowerBound {
                version: floor,
                inclusive: false,
            },
        },
        _ => LowerBound::unbounded(),
    }
}
