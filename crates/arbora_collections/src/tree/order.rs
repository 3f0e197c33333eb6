//! # Key Ordering
//!
//! A tree orders its keys either through a three-way comparator or through
//! a stable integer handle the caller assigns to every key. Raw memory
//! addresses are never used as an ordering.

use std::cmp::Ordering;

/// A total order over keys.
///
/// Must stay consistent (antisymmetric, transitive) for the lifetime of a
/// tree, and agree between `insert` and later `find`/`delete` calls.
pub trait Compare<K: ?Sized> {
    /// Three-way comparison of `a` against `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Any `Fn(&K, &K) -> Ordering` closure is a comparator.
impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Orders keys by a stable, caller-assigned `u64` handle.
///
/// Two keys with the same handle are the same key. The ordering is
/// deterministic across runs as long as the handles are.
#[derive(Clone, Copy, Debug)]
pub struct Identity<F>(pub F);

impl<K: ?Sized, F> Compare<K> for Identity<F>
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn test_closure_order() {
        let reverse = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
    }

    #[test]
    fn test_identity_order() {
        let by_id = Identity(|pair: &(u64, &str)| pair.0);
        assert_eq!(by_id.compare(&(3, "x"), &(3, "y")), Ordering::Equal);
        assert_eq!(by_id.compare(&(1, "z"), &(3, "a")), Ordering::Less);
    }
}
