// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;
use std::fmt;

/// Parse lists of output numbers.
///
/// Each token may be a single number or a comma delimited list of numbers.
///
/// Returns the numbers parsed, in order, along with an [`Error::InvalidToken`]
/// for each element that is not a non-negative integer.
/// Invalid elements are skipped and do not prevent the remaining elements
/// being parsed.
///
/// The numbers are not checked against the range of outputs.
///
/// ```
/// use panthyr_gpio::{parse_outputs, Error};
///
/// let (numbers, errors) = parse_outputs(["1,2,x,4", "6"]);
/// assert_eq!(numbers, vec![1, 2, 4, 6]);
/// assert_eq!(errors, vec![Error::InvalidToken("x".into())]);
/// ```
pub fn parse_outputs<I, S>(tokens: I) -> (Vec<usize>, Vec<Error>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut numbers = Vec::new();
    let mut errors = Vec::new();
    for token in tokens {
        for part in token.as_ref().split(',') {
            let part = part.trim();
            match part.parse::<usize>() {
                Ok(n) => numbers.push(n),
                Err(_) => errors.push(Error::InvalidToken(part.into())),
            }
        }
    }
    (numbers, errors)
}

/// The outputs to drive high and low, with conflicting requests resolved.
///
/// An output requested both high and low is driven low.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    /// The outputs to drive high.
    pub high: Vec<usize>,

    /// The outputs to drive low.
    pub low: Vec<usize>,

    /// The outputs that were requested both high and low.
    pub conflicts: Vec<usize>,
}

impl Selection {
    /// Reconcile the requested outputs.
    ///
    /// Repeated numbers are removed, retaining the order of first occurrence.
    ///
    /// ```
    /// use panthyr_gpio::Selection;
    ///
    /// let s = Selection::resolve(&[2, 3], &[3]);
    /// assert_eq!(s.high, vec![2]);
    /// assert_eq!(s.low, vec![3]);
    /// assert_eq!(s.conflicts, vec![3]);
    /// ```
    pub fn resolve(high: &[usize], low: &[usize]) -> Selection {
        let low = dedup(low);
        let mut conflicts = Vec::new();
        let mut kept = Vec::new();
        for n in dedup(high) {
            if low.contains(&n) {
                conflicts.push(n);
            } else {
                kept.push(n);
            }
        }
        Selection {
            high: kept,
            low,
            conflicts,
        }
    }

    /// Are there no outputs to be driven?
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty()
    }

    /// Notices describing how each conflict was resolved.
    pub fn notices(&self) -> impl Iterator<Item = Conflict> + '_ {
        self.conflicts.iter().map(|&n| Conflict(n))
    }
}

/// An output requested both high and low.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Conflict(pub usize);

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "output {} set to high as well as low, keeping low",
            self.0
        )
    }
}

fn dedup(numbers: &[usize]) -> Vec<usize> {
    let mut uniq = Vec::with_capacity(numbers.len());
    for &n in numbers {
        if !uniq.contains(&n) {
            uniq.push(n);
        }
    }
    uniq
}
