use crate::error::UpdateError;
use std::cmp::Ordering;

/// One comparable piece of a version string.
///
/// Declaration order is the ordering between kinds: a pre-release marker
/// sorts before the end of the version, a `^` post-release marker after it,
/// and text sorts before numbers at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Tilde,
    End,
    Caret,
    Alpha(&'a str),
    Num(&'a str),
}

/// Order two package versions the way rpm does, with trailing zero
/// components ignored.
///
/// Versions are split into runs of digits and runs of letters; every other
/// character separates runs. Numbers compare numerically ("1.10" is newer than
/// "1.9"), text compares bytewise and always sorts before a number at the same
/// position. `~` (and a `-` directly followed by a letter, as in "1.2.0-rc1")
/// marks a pre-release that sorts before the bare version. `^` marks a
/// post-release snapshot that sorts after the bare version but before the
/// next numeric component. "1.0" and "1.0.0" are equal.
///
/// Every version maps to one segment list and lists compare position by
/// position, so the ordering stays transitive whatever the formatting.
pub fn compare_versions(left: &str, right: &str) -> Result<Ordering, UpdateError> {
    let (Some(l), Some(r)) = (segments(left), segments(right)) else {
        return Err(UpdateError::UnparsableVersion {
            left: left.to_string(),
            right: right.to_string(),
        });
    };

    let len = l.len().max(r.len());
    for i in 0..len {
        let a = l.get(i).unwrap_or(&Segment::End);
        let b = r.get(i).unwrap_or(&Segment::End);
        let ord = match (a, b) {
            (Segment::Num(x), Segment::Num(y)) => compare_numeric(x, y),
            _ => a.cmp(b),
        };
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(Ordering::Equal)
}

/// Split a version into segments. Zero components directly before a
/// non-numeric segment or the end are dropped, so "1.0", "1.0.0" and "1"
/// share one form. `None` when there is nothing to compare.
fn segments(version: &str) -> Option<Vec<Segment<'_>>> {
    let version = version.trim();
    let version = match version.strip_prefix('v') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => version,
    };
    if !version.bytes().any(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    let bytes = version.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let segment = if c.is_ascii_digit() || c.is_ascii_alphabetic() {
            let digit = c.is_ascii_digit();
            let start = i;
            while i < bytes.len()
                && bytes[i].is_ascii_alphanumeric()
                && bytes[i].is_ascii_digit() == digit
            {
                i += 1;
            }
            let run = &version[start..i];
            if digit {
                out.push(Segment::Num(run));
                continue;
            }
            Segment::Alpha(run)
        } else {
            i += 1;
            match c {
                b'~' => Segment::Tilde,
                b'^' => Segment::Caret,
                b'-' if bytes.get(i).is_some_and(|n| n.is_ascii_alphabetic()) => Segment::Tilde,
                _ => continue,
            }
        };
        strip_trailing_zeros(&mut out);
        out.push(segment);
    }
    strip_trailing_zeros(&mut out);
    Some(out)
}

fn strip_trailing_zeros(segments: &mut Vec<Segment<'_>>) {
    while matches!(segments.last(), Some(Segment::Num(n)) if n.bytes().all(|b| b == b'0')) {
        segments.pop();
    }
}

fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}
