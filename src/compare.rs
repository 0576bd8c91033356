//! Strict weak orderings used to sort the keys of a container.

use std::cmp::Ordering;

/// A strict weak ordering over values of type `T`.
///
/// Containers only ever ask whether one key is less than, equal to or
/// greater than another, so any total order consistent with itself works.
/// Closures of the form `Fn(&T, &T) -> Ordering` implement this trait.
///
/// ```
/// use avl_containers::AvlTreeSet;
/// let mut set = AvlTreeSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// set.insert(1);
/// set.insert(3);
/// set.insert(2);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Compare<T: ?Sized> {
    /// Compares two keys.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

/// The natural ordering of `Ord` types. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::{Compare, Natural};
    use std::cmp::Ordering;

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&7u8, &7u8), Ordering::Equal);
    }

    #[test]
    fn test_closure() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        assert_eq!(
            by_len.compare(&"ab".to_string(), &"c".to_string()),
            Ordering::Greater
        );
    }
}
