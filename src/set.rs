//! An ordered set implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::mem;

use crate::compare::{Compare, Natural};
use crate::map::{
    AvlTreeMap, Cursor as MapCursor, CursorMut as MapCursorMut, IntoIter as MapIntoIter,
    Iter as MapIter,
};

/// An ordered set implemented with an AVL tree.
///
/// ```
/// use avl_containers::AvlTreeSet;
/// let mut set = AvlTreeSet::new();
/// set.insert(0);
/// set.insert(1);
/// set.insert(2);
/// assert_eq!(set.get(&1), Some(&1));
/// set.remove(&1);
/// assert!(set.get(&1).is_none());
/// ```
pub struct AvlTreeSet<T, C = Natural> {
    map: AvlTreeMap<T, (), C>,
}

/// An iterator over the values of a set.
pub struct Iter<'a, T> {
    map_iter: MapIter<'a, T, ()>,
}

/// An owning iterator over the values of a set.
pub struct IntoIter<T, C = Natural> {
    map_into_iter: MapIntoIter<T, (), C>,
}

/// A cursor over the values of a set.
///
/// The cursor points either to a value or to the end position,
/// see [`map::Cursor`](crate::map::Cursor).
pub struct Cursor<'a, T, C = Natural> {
    map_cursor: MapCursor<'a, T, (), C>,
}

/// A cursor over the values of a set which can remove values.
pub struct CursorMut<'a, T, C = Natural> {
    map_cursor: MapCursorMut<'a, T, (), C>,
}

/// A lazy iterator for the values in the union of two sets.
///
/// This `struct` is created by the [`union`] method on [`AvlTreeSet`].
///
/// [`AvlTreeSet`]: struct.AvlTreeSet.html
/// [`union`]: struct.AvlTreeSet.html#method.union
pub struct Union<'a, T, C = Natural> {
    cmp: &'a C,
    lhs_peek: Option<&'a T>,
    rhs_peek: Option<&'a T>,
    lhs_iter: Iter<'a, T>,
    rhs_iter: Iter<'a, T>,
}

/// A lazy iterator for the values in the intersection of two sets.
///
/// This `struct` is created by the [`intersection`] method on [`AvlTreeSet`].
///
/// [`AvlTreeSet`]: struct.AvlTreeSet.html
/// [`intersection`]: struct.AvlTreeSet.html#method.intersection
pub struct Intersection<'a, T, C = Natural> {
    cmp: &'a C,
    lhs_peek: Option<&'a T>,
    rhs_peek: Option<&'a T>,
    lhs_iter: Iter<'a, T>,
    rhs_iter: Iter<'a, T>,
}

impl<T> AvlTreeSet<T> {
    /// Creates an empty set ordered by `T: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> AvlTreeSet<T, C> {
    /// Creates an empty set ordered by the given comparator.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            map: AvlTreeMap::with_comparator(cmp),
        }
    }

    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns the largest number of elements the set could hold.
    pub fn max_size(&self) -> usize {
        self.map.max_size()
    }

    /// Clears the set, deallocating all memory.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Exchanges the contents of two sets in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Gets an iterator over the values of the set in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            map_iter: self.map.iter(),
        }
    }

    /// Returns a cursor pointing to the smallest value.
    pub fn cursor_first(&self) -> Cursor<'_, T, C> {
        Cursor {
            map_cursor: self.map.cursor_first(),
        }
    }

    /// Returns a cursor pointing to the largest value.
    pub fn cursor_last(&self) -> Cursor<'_, T, C> {
        Cursor {
            map_cursor: self.map.cursor_last(),
        }
    }

    /// Returns a cursor pointing to the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T, C> {
        Cursor {
            map_cursor: self.map.cursor_end(),
        }
    }

    /// Returns a mutable cursor pointing to the smallest value.
    pub fn cursor_first_mut(&mut self) -> CursorMut<'_, T, C> {
        CursorMut {
            map_cursor: self.map.cursor_first_mut(),
        }
    }

    /// Returns a mutable cursor pointing to the largest value.
    pub fn cursor_last_mut(&mut self) -> CursorMut<'_, T, C> {
        CursorMut {
            map_cursor: self.map.cursor_last_mut(),
        }
    }

    /// Returns a mutable cursor pointing to the end position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, C> {
        CursorMut {
            map_cursor: self.map.cursor_end_mut(),
        }
    }

    /// Returns the smallest value in the set.
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest value in the set.
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    /// Removes and returns the smallest value in the set.
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, _)| k)
    }

    /// Removes and returns the largest value in the set.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, _)| k)
    }

    /// Retains only the values for which the predicate returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|k, _| keep(k));
    }

    /// Returns a reference to the value in the set that is equal to the given value.
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Returns a cursor pointing to the given value,
    /// or to the end position if it is not in the set.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor {
            map_cursor: self.map.find(value),
        }
    }

    /// Returns a mutable cursor pointing to the given value,
    /// or to the end position if it is not in the set.
    pub fn find_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        CursorMut {
            map_cursor: self.map.find_mut(value),
        }
    }

    /// Returns a cursor pointing to the first value not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor {
            map_cursor: self.map.lower_bound(value),
        }
    }

    /// Returns a cursor pointing to the first value greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor {
            map_cursor: self.map.upper_bound(value),
        }
    }

    /// Removes a value from the set.
    /// Returns whether the value was previously in the set.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.map.remove(value).is_some()
    }

    /// Removes a value from the set.
    /// Returns the value if it was previously in the set.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        C: Compare<T>,
    {
        self.map.check_consistency()
    }
}

impl<T, C: Compare<T>> AvlTreeSet<T, C> {
    /// Inserts a value into the set unless an equal value is present.
    ///
    /// Returns a cursor pointing to the value in the set,
    /// and whether the value has been inserted.
    pub fn insert(&mut self, value: T) -> (Cursor<'_, T, C>, bool) {
        let (map_cursor, inserted) = self.map.insert(value, ());
        (
            Cursor {
                map_cursor: map_cursor.into_cursor(),
            },
            inserted,
        )
    }

    /// Inserts every value yielded by `values`, in order.
    ///
    /// Returns one cursor and inserted flag per value, in the order of the values.
    pub fn insert_many<I>(&mut self, values: I) -> Vec<(Cursor<'_, T, C>, bool)>
    where
        I: IntoIterator<Item = T>,
    {
        self.map
            .insert_many(values.into_iter().map(|value| (value, ())))
            .into_iter()
            .map(|(map_cursor, inserted)| (Cursor { map_cursor }, inserted))
            .collect()
    }

    /// Moves all values of `other` which are not present in `self` into `self`.
    /// Values present in both sets remain in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.map.merge(&mut other.map);
    }

    /// Gets an iterator over the values of the union set,
    /// i.e., all values in `self` or `other`, without duplicates,
    /// in ascending order.
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, T, C> {
        Union::new(self, other)
    }

    /// Gets an iterator over the values of the intersection set,
    /// i.e., all values that are both in `self` and `other`,
    /// in ascending order.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, T, C> {
        Intersection::new(self, other)
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    /// This is equivalent to checking for an empty intersection.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.intersection(other).next().is_none()
    }
}

impl<T, C: Default> Default for AvlTreeSet<T, C> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Clone, C: Clone> Clone for AvlTreeSet<T, C> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for AvlTreeSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTreeSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTreeSet<T, C> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlTreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Eq, C> Eq for AvlTreeSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for AvlTreeSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, C> Ord for AvlTreeSet<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> IntoIterator for AvlTreeSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            map_into_iter: self.map.into_iter(),
        }
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlTreeSet<T, C> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(move |value| {
            self.insert(value);
        });
    }
}

impl<'a, T, C> Extend<&'a T> for AvlTreeSet<T, C>
where
    T: Copy + 'a,
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T, C> Cursor<'a, T, C> {
    /// Returns true if the cursor points to the end position.
    pub fn is_end(&self) -> bool {
        self.map_cursor.is_end()
    }

    /// Moves the cursor to the next value.
    pub fn move_next(&mut self) {
        self.map_cursor.move_next();
    }

    /// Moves the cursor to the previous value.
    pub fn move_prev(&mut self) {
        self.map_cursor.move_prev();
    }

    /// Returns the value the cursor points to, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.map_cursor.key()
    }

    /// Returns the value after the cursor without moving it.
    pub fn peek_next(&self) -> Option<&'a T> {
        self.map_cursor.peek_next().map(|(k, _)| k)
    }

    /// Returns the value before the cursor without moving it.
    pub fn peek_prev(&self) -> Option<&'a T> {
        self.map_cursor.peek_prev().map(|(k, _)| k)
    }
}

impl<T, C> Clone for Cursor<'_, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C> Copy for Cursor<'_, T, C> {}

impl<T, C> PartialEq for Cursor<'_, T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map_cursor == other.map_cursor
    }
}

impl<T, C> Eq for Cursor<'_, T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, T, C> CursorMut<'a, T, C> {
    /// Returns a read-only cursor pointing to the current value.
    pub fn as_cursor(&self) -> Cursor<'_, T, C> {
        Cursor {
            map_cursor: self.map_cursor.as_cursor(),
        }
    }

    /// Returns true if the cursor points to the end position.
    pub fn is_end(&self) -> bool {
        self.map_cursor.is_end()
    }

    /// Moves the cursor to the next value.
    pub fn move_next(&mut self) {
        self.map_cursor.move_next();
    }

    /// Moves the cursor to the previous value.
    pub fn move_prev(&mut self) {
        self.map_cursor.move_prev();
    }

    /// Returns the value the cursor points to, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.map_cursor.key()
    }

    /// Removes the current value and moves the cursor to the next one.
    /// Returns `None` and does nothing at the end position.
    pub fn remove_current(&mut self) -> Option<T> {
        self.map_cursor.remove_current().map(|(k, _)| k)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for CursorMut<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            map_iter: self.map_iter.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.map_iter.fmt_keys(f)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|(k, _)| k)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: fmt::Debug, C> fmt::Debug for IntoIter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.map_into_iter.fmt_keys(f)
    }
}

impl<T, C> Iterator for IntoIter<T, C> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.map_into_iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_into_iter.size_hint()
    }
}

impl<T, C> DoubleEndedIterator for IntoIter<T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_into_iter.next_back().map(|(k, _)| k)
    }
}

impl<T, C> ExactSizeIterator for IntoIter<T, C> {}

impl<T, C> FusedIterator for IntoIter<T, C> {}

impl<'a, T, C: Compare<T>> Union<'a, T, C> {
    fn new(lhs: &'a AvlTreeSet<T, C>, rhs: &'a AvlTreeSet<T, C>) -> Self {
        let mut lhs_iter = lhs.iter();
        let mut rhs_iter = rhs.iter();
        Self {
            cmp: lhs.map.comparator(),
            lhs_peek: lhs_iter.next(),
            rhs_peek: rhs_iter.next(),
            lhs_iter,
            rhs_iter,
        }
    }
}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<'a, T, C> Clone for Union<'a, T, C> {
    fn clone(&self) -> Self {
        Self {
            cmp: self.cmp,
            lhs_peek: self.lhs_peek,
            rhs_peek: self.rhs_peek,
            lhs_iter: self.lhs_iter.clone(),
            rhs_iter: self.rhs_iter.clone(),
        }
    }
}

impl<'a, T: fmt::Debug, C: Compare<T>> fmt::Debug for Union<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Union")?;
        f.debug_set().entries(self.clone()).finish()
    }
}

impl<'a, T, C: Compare<T>> Iterator for Union<'a, T, C> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        match (self.lhs_peek, self.rhs_peek) {
            (None, None) => None,
            (Some(lhs), None) => {
                self.lhs_peek = self.lhs_iter.next();
                Some(lhs)
            }
            (None, Some(rhs)) => {
                self.rhs_peek = self.rhs_iter.next();
                Some(rhs)
            }
            (Some(lhs), Some(rhs)) => match self.cmp.compare(lhs, rhs) {
                Ordering::Less => {
                    self.lhs_peek = self.lhs_iter.next();
                    Some(lhs)
                }
                Ordering::Equal => {
                    self.lhs_peek = self.lhs_iter.next();
                    self.rhs_peek = self.rhs_iter.next();
                    Some(lhs)
                }
                Ordering::Greater => {
                    self.rhs_peek = self.rhs_iter.next();
                    Some(rhs)
                }
            },
        }
    }
}

impl<'a, T, C: Compare<T>> Intersection<'a, T, C> {
    fn new(lhs: &'a AvlTreeSet<T, C>, rhs: &'a AvlTreeSet<T, C>) -> Self {
        let mut lhs_iter = lhs.iter();
        let mut rhs_iter = rhs.iter();
        Self {
            cmp: lhs.map.comparator(),
            lhs_peek: lhs_iter.next(),
            rhs_peek: rhs_iter.next(),
            lhs_iter,
            rhs_iter,
        }
    }
}

// Auto derived Clone seems to have an invalid type bound of T: Clone
impl<'a, T, C> Clone for Intersection<'a, T, C> {
    fn clone(&self) -> Self {
        Self {
            cmp: self.cmp,
            lhs_peek: self.lhs_peek,
            rhs_peek: self.rhs_peek,
            lhs_iter: self.lhs_iter.clone(),
            rhs_iter: self.rhs_iter.clone(),
        }
    }
}

impl<'a, T: fmt::Debug, C: Compare<T>> fmt::Debug for Intersection<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Intersection")?;
        f.debug_set().entries(self.clone()).finish()
    }
}

impl<'a, T, C: Compare<T>> Iterator for Intersection<'a, T, C> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.lhs_peek, self.rhs_peek) {
                (None, _) | (_, None) => return None,
                (Some(lhs), Some(rhs)) => match self.cmp.compare(lhs, rhs) {
                    Ordering::Equal => {
                        self.lhs_peek = self.lhs_iter.next();
                        self.rhs_peek = self.rhs_iter.next();
                        return Some(lhs);
                    }
                    Ordering::Less => {
                        self.lhs_peek = self.lhs_iter.next();
                    }
                    Ordering::Greater => {
                        self.rhs_peek = self.rhs_iter.next();
                    }
                },
            }
        }
    }
}
