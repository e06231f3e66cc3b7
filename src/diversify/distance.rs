//! Set-similarity metric.

use std::collections::BTreeSet;

/// Jaccard distance `1 − |A ∩ B| / |A ∪ B|`.
///
/// Symmetric, in `[0, 1]`, and `0` when both sets are empty.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use u_lineup::diversify::jaccard_distance;
///
/// let a: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
/// let b: BTreeSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();
/// assert!((jaccard_distance(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn jaccard_distance(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let common = a.intersection(b).count();
    let union = a.len() + b.len() - common;
    1.0 - common as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_values() {
        assert_eq!(jaccard_distance(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard_distance(&set(&["a"]), &set(&[])), 1.0);
        assert_eq!(jaccard_distance(&set(&["a", "b"]), &set(&["c", "d"])), 1.0);
        assert_eq!(jaccard_distance(&set(&["a", "b"]), &set(&["b", "a"])), 0.0);
        assert_eq!(jaccard_distance(&set(&["a", "b", "c"]), &set(&["b", "c", "d"])), 0.5);
    }

    fn token_set() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-h]{1,2}", 0..10)
    }

    proptest! {
        /// A set is at distance zero from itself.
        #[test]
        fn distance_identity(a in token_set()) {
            prop_assert_eq!(jaccard_distance(&a, &a), 0.0);
        }

        #[test]
        fn distance_symmetric(a in token_set(), b in token_set()) {
            prop_assert_eq!(jaccard_distance(&a, &b), jaccard_distance(&b, &a));
        }

        #[test]
        fn distance_in_unit_interval(a in token_set(), b in token_set()) {
            let d = jaccard_distance(&a, &b);
            prop_assert!((0.0..=1.0).contains(&d), "distance {} out of range", d);
        }

        /// Disjoint non-empty sets are maximally distant.
        #[test]
        fn distance_disjoint_is_one(a in token_set(), b in token_set()) {
            let b: BTreeSet<String> = b.difference(&a).cloned().collect();
            prop_assume!(!a.is_empty() || !b.is_empty());
            prop_assert_eq!(jaccard_distance(&a, &b), 1.0);
        }
    }
}
