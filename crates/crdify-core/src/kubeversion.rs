//! Kubernetes-aware API version ordering
//!
//! Orders version names the way the API server prioritizes them, oldest
//! first. The stability stream dominates: every `alpha` version is older
//! than every `beta` version, which is older than every GA version,
//! regardless of major number (`v12alpha1` < `v1`). Within a stream the
//! major and pre-release counters compare numerically (`v1beta2` <
//! `v1beta11`). Names that do not match `v<major>[alpha|beta<n>]` sort below
//! every conforming name, in reverse lexicographic order among themselves.

use std::cmp::Ordering;

/// Stability stream of a parsed version, ordered oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stream {
    Alpha,
    Beta,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedVersion {
    stream: Stream,
    major: u64,
    pre_release: u64,
}

/// Compare two version names, oldest first.
pub fn compare_kube_aware(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(left), Some(right)) => left
            .stream
            .cmp(&right.stream)
            .then(left.major.cmp(&right.major))
            .then(left.pre_release.cmp(&right.pre_release)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => b.cmp(a),
    }
}

fn parse(name: &str) -> Option<ParsedVersion> {
    let rest = name.strip_prefix('v')?;

    let major_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if major_end == 0 {
        return None;
    }
    let major: u64 = rest[..major_end].parse().ok()?;
    let rest = &rest[major_end..];

    if rest.is_empty() {
        return Some(ParsedVersion {
            stream: Stream::Stable,
            major,
            pre_release: 0,
        });
    }

    let (stream, counter) = if let Some(counter) = rest.strip_prefix("alpha") {
        (Stream::Alpha, counter)
    } else if let Some(counter) = rest.strip_prefix("beta") {
        (Stream::Beta, counter)
    } else {
        return None;
    };

    if counter.is_empty() || counter.chars().any(|c| !c.is_ascii_digit()) {
        return None;
    }

    Some(ParsedVersion {
        stream,
        major,
        pre_release: counter.parse().ok()?,
    })
}
