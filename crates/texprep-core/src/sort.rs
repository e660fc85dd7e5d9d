//! Natural ("human") ordering of file names.
//!
//! A name is split into alternating text and digit runs. Text runs compare
//! case-insensitively, digit runs compare by numeric value, so `img2.png`
//! sorts before `img10.png`. Digit runs of any length are supported; the
//! comparison never overflows.

use std::cmp::Ordering;

/// One run of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    /// Lowercased non-digit run.
    Text(String),
    /// Digit run with leading zeros removed; compared by length then digits,
    /// which is numeric order.
    Number { len: usize, digits: String },
}

/// Composite sort key for one name.
///
/// Keys always start with a (possibly empty) text run and alternate from
/// there, so corresponding positions of two keys hold the same kind of run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

/// Build the natural sort key for `s`.
pub fn natural_sort_key(s: &str) -> NaturalKey {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            segments.push(Segment::Text(std::mem::take(&mut text).to_lowercase()));

            let mut digits = String::from(c);
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            let trimmed = digits.trim_start_matches('0').to_string();
            segments.push(Segment::Number {
                len: trimmed.len(),
                digits: trimmed,
            });
        } else {
            text.push(c);
        }
    }
    segments.push(Segment::Text(text.to_lowercase()));

    NaturalKey(segments)
}

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_sort_key(a).cmp(&natural_sort_key(b))
}

/// Stable natural sort of `items` by the string `key` returns.
pub fn sort_naturally_by<T, F>(items: &mut [T], mut key: F)
where
    F: FnMut(&T) -> String,
{
    items.sort_by_cached_key(|item| natural_sort_key(&key(item)));
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Numeric suffixes order by value.
        #[test]
        fn prop_numbers_order_by_value(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let left = format!("frame{a}.png");
            let right = format!("frame{b}.png");
            prop_assert_eq!(natural_cmp(&left, &right), a.cmp(&b));
        }

        /// Property: The comparison is antisymmetric.
        #[test]
        fn prop_antisymmetric(a in "[a-c0-9]{0,8}", b in "[a-c0-9]{0,8}") {
            prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        }

        /// Property: Sorting is idempotent.
        #[test]
        fn prop_sort_idempotent(mut names in prop::collection::vec("[a-zA-Z0-9_.]{0,10}", 0..20)) {
            sort_naturally_by(&mut names, |s| s.clone());
            let once = names.clone();
            sort_naturally_by(&mut names, |s| s.clone());
            prop_assert_eq!(once, names);
        }
    }
}
