//! Natural ordering for line numbers.
//!
//! Line numbers mix digits and letters ("2", "2B", "17B", "110"). Plain
//! string order puts "10" before "2"; riders expect `1 < 2 < 2B < 10`.

use std::cmp::Ordering;

/// One run of a line number: text and digit runs alternate, starting with
/// a (possibly empty) text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Digits(&'a str),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = false;
    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        if is_digit != in_digits {
            let run = &s[start..idx];
            out.push(if in_digits {
                Segment::Digits(run)
            } else {
                Segment::Text(run)
            });
            start = idx;
            in_digits = is_digit;
        }
    }
    let tail = &s[start..];
    out.push(if in_digits {
        Segment::Digits(tail)
    } else {
        Segment::Text(tail)
    });
    out
}

/// Compare two digit runs by numeric value without parsing
/// (runs can be longer than any integer type).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural comparison of two line numbers.
///
/// Digit runs compare numerically, text runs lexically, and a number that
/// runs out of segments first sorts first. An empty number compares equal
/// to anything.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use bus_planner::domain::natural_cmp;
///
/// assert_eq!(natural_cmp("2", "10"), Ordering::Less);
/// assert_eq!(natural_cmp("2", "2B"), Ordering::Less);
/// assert_eq!(natural_cmp("17B", "17"), Ordering::Greater);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    if a.is_empty() || b.is_empty() {
        return Ordering::Equal;
    }
    let a_parts = segments(a);
    let b_parts = segments(b);
    for idx in 0..a_parts.len().max(b_parts.len()) {
        let ord = match (a_parts.get(idx), b_parts.get(idx)) {
            (None, _) => return Ordering::Less,
            (_, None) => return Ordering::Greater,
            (Some(Segment::Digits(x)), Some(Segment::Digits(y))) => cmp_digits(x, y),
            (Some(Segment::Text(x) | Segment::Digits(x)), Some(Segment::Text(y) | Segment::Digits(y))) => {
                x.cmp(y)
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Sort line numbers in place, naturally. Stable.
pub fn sort_naturally<S: AsRef<str>>(numbers: &mut [S]) {
    numbers.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
