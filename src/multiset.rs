//! An ordered multiset implemented with an AVL tree.
//!
//! Equal values share one tree node which counts its occurrences,
//! so every operation keeps the logarithmic cost of the tree.

use std::borrow::Borrow;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::mem;

use crate::compare::{Compare, Natural};
use crate::tree::{self, node_value_mut, NodePtr, Search, Tree};

/// An ordered multiset implemented with an AVL tree.
///
/// Only the first inserted value of a group of equal values is stored;
/// later equal values just increase its count.
///
/// ```
/// use avl_containers::AvlTreeMultiset;
/// let mut bag = AvlTreeMultiset::new();
/// bag.insert(2);
/// bag.insert(1);
/// bag.insert(2);
/// assert_eq!(bag.len(), 3);
/// assert_eq!(bag.count(&2), 2);
/// assert_eq!(bag.iter().copied().collect::<Vec<_>>(), [1, 2, 2]);
/// ```
pub struct AvlTreeMultiset<T, C = Natural> {
    tree: Tree<T, usize, C>,
    len: usize,
}

/// A cursor over the values of a multiset.
///
/// Each occurrence of a value is a separate position.
pub struct Cursor<'a, T, C = Natural> {
    node: tree::Cursor<'a, T, usize, C>,
    occurrence: usize,
}

/// A cursor over the values of a multiset which can remove values.
pub struct CursorMut<'a, T, C = Natural> {
    node: tree::CursorMut<'a, T, usize, C>,
    occurrence: usize,
    len: &'a mut usize,
}

/// An iterator over the values of a multiset, repeating each value
/// once per occurrence.
pub struct Iter<'a, T> {
    nodes: tree::Iter<'a, T, usize>,
    front: Option<(&'a T, usize)>,
    back: Option<(&'a T, usize)>,
    len: usize,
}

/// An owning iterator over the values of a multiset.
/// Repeated occurrences are produced by cloning the stored value.
pub struct IntoIter<T, C = Natural> {
    nodes: tree::IntoIter<T, usize, C>,
    front: Option<(T, usize)>,
    back: Option<(T, usize)>,
    len: usize,
}

impl<T> AvlTreeMultiset<T> {
    /// Creates an empty multiset ordered by `T: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> AvlTreeMultiset<T, C> {
    /// Creates an empty multiset ordered by the given comparator.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: Tree::with_comparator(cmp),
            len: 0,
        }
    }

    /// Returns true if the multiset contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements in the multiset, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the largest number of distinct values the multiset could hold.
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Clears the multiset, deallocating all memory.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Exchanges the contents of two multisets in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Gets an iterator over the values in sorted order, including duplicates.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: tree::Iter::new(&self.tree),
            front: None,
            back: None,
            len: self.len,
        }
    }

    /// Returns a cursor pointing to the first occurrence of the smallest value.
    pub fn cursor_first(&self) -> Cursor<'_, T, C> {
        self.cursor_at(self.tree.first_node())
    }

    /// Returns a cursor pointing to the last occurrence of the largest value.
    pub fn cursor_last(&self) -> Cursor<'_, T, C> {
        let mut cursor = self.cursor_end();
        cursor.move_prev();
        cursor
    }

    /// Returns a cursor pointing to the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T, C> {
        self.cursor_at(self.tree.sentinel())
    }

    /// Returns a mutable cursor pointing to the first occurrence of the smallest value.
    pub fn cursor_first_mut(&mut self) -> CursorMut<'_, T, C> {
        let node_ptr = self.tree.first_node();
        self.cursor_mut_at(node_ptr)
    }

    /// Returns a mutable cursor pointing to the last occurrence of the largest value.
    pub fn cursor_last_mut(&mut self) -> CursorMut<'_, T, C> {
        let mut cursor = self.cursor_end_mut();
        cursor.move_prev();
        cursor
    }

    /// Returns a mutable cursor pointing to the end position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, C> {
        let node_ptr = self.tree.sentinel();
        self.cursor_mut_at(node_ptr)
    }

    /// Returns the smallest value.
    pub fn first(&self) -> Option<&T> {
        self.cursor_first().get()
    }

    /// Returns the largest value.
    pub fn last(&self) -> Option<&T> {
        self.cursor_last().get()
    }

    /// Returns the number of occurrences of a value.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.tree.find(value) {
            Some(node_ptr) => *unsafe { tree::node_value(node_ptr) },
            None => 0,
        }
    }

    /// Returns true if the multiset contains at least one occurrence of a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.find(value).is_some()
    }

    /// Returns a cursor pointing to the first occurrence of a value,
    /// or to the end position if the value is absent.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor_at(self.tree.find(value).unwrap_or_else(|| self.tree.sentinel()))
    }

    /// Returns a mutable cursor pointing to the first occurrence of a value,
    /// or to the end position if the value is absent.
    pub fn find_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let node_ptr = self.tree.find(value).unwrap_or_else(|| self.tree.sentinel());
        self.cursor_mut_at(node_ptr)
    }

    /// Returns a cursor pointing to the first element not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor_at(self.tree.lower_bound(value))
    }

    /// Returns a cursor pointing to the first element greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T, C>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor_at(self.tree.upper_bound(value))
    }

    /// Returns the half-open range of positions holding occurrences of `value`,
    /// as a pair of `lower_bound` and `upper_bound`.
    pub fn equal_range<Q>(&self, value: &Q) -> (Cursor<'_, T, C>, Cursor<'_, T, C>)
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        (self.lower_bound(value), self.upper_bound(value))
    }

    /// Removes one occurrence of a value.
    /// Returns whether the value was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find_mut(value).remove_current()
    }

    /// Removes every occurrence of a value.
    /// Returns the number of removed occurrences.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.tree.find(value) {
            Some(node_ptr) => {
                let (_, count) = self.tree.remove_node(node_ptr);
                self.len -= count;
                count
            }
            None => 0,
        }
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        C: Compare<T>,
    {
        self.tree.check_consistency();
        let mut len = 0;
        for (_, &count) in tree::Iter::new(&self.tree) {
            assert!(count >= 1);
            len += count;
        }
        assert_eq!(len, self.len);
    }

    fn cursor_at(&self, node_ptr: NodePtr<T, usize>) -> Cursor<'_, T, C> {
        Cursor {
            node: tree::Cursor::new(&self.tree, node_ptr),
            occurrence: 0,
        }
    }

    fn cursor_mut_at(&mut self, node_ptr: NodePtr<T, usize>) -> CursorMut<'_, T, C> {
        CursorMut {
            node: tree::CursorMut::new(&mut self.tree, node_ptr),
            occurrence: 0,
            len: &mut self.len,
        }
    }
}

impl<T, C: Compare<T>> AvlTreeMultiset<T, C> {
    /// Inserts a value into the multiset.
    ///
    /// Returns a cursor pointing to the new occurrence,
    /// which follows all occurrences of equal values inserted before.
    pub fn insert(&mut self, value: T) -> Cursor<'_, T, C> {
        let (node_ptr, count) = self.add(value, 1);
        Cursor {
            node: tree::Cursor::new(&self.tree, node_ptr),
            occurrence: count - 1,
        }
    }

    /// Inserts every value yielded by `values`, in order.
    ///
    /// Returns one cursor per value, in the order of the values.
    pub fn insert_many<I>(&mut self, values: I) -> Vec<Cursor<'_, T, C>>
    where
        I: IntoIterator<Item = T>,
    {
        let positions: Vec<_> = values
            .into_iter()
            .map(|value| self.add(value, 1))
            .collect();
        positions
            .into_iter()
            .map(|(node_ptr, count)| Cursor {
                node: tree::Cursor::new(&self.tree, node_ptr),
                occurrence: count - 1,
            })
            .collect()
    }

    /// Moves every element of `other` into `self`, leaving `other` empty.
    pub fn merge(&mut self, other: &mut Self) {
        while let Some((value, count)) = other.tree.pop_first() {
            self.add(value, count);
        }
        other.len = 0;
    }

    /// Adds `n` occurrences of a value, returning its node and new count.
    fn add(&mut self, value: T, n: usize) -> (NodePtr<T, usize>, usize) {
        debug_assert!(n >= 1);
        self.len += n;
        match self.tree.search(&value) {
            Search::Found(node_ptr) => {
                let count = unsafe { node_value_mut(node_ptr) };
                *count += n;
                (node_ptr, *count)
            }
            Search::Vacant { parent, dir } => (self.tree.link_new(parent, dir, value, n), n),
        }
    }
}

impl<T, C: Default> Default for AvlTreeMultiset<T, C> {
    /// Creates an empty multiset.
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Clone, C: Clone> Clone for AvlTreeMultiset<T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            len: self.len,
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for AvlTreeMultiset<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Self::default();
        multiset.extend(iter);
        multiset
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTreeMultiset<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlTreeMultiset<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value, 1);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTreeMultiset<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlTreeMultiset<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.tree.len() == other.tree.len() && {
            tree::Iter::new(&self.tree).eq(tree::Iter::new(&other.tree))
        }
    }
}

impl<T: Eq, C> Eq for AvlTreeMultiset<T, C> {}

impl<'a, T, C> IntoIterator for &'a AvlTreeMultiset<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, C> IntoIterator for AvlTreeMultiset<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            len: self.len,
            nodes: tree::IntoIter::new(self.tree),
            front: None,
            back: None,
        }
    }
}

impl<'a, T, C> Cursor<'a, T, C> {
    /// Returns true if the cursor points to the end position.
    pub fn is_end(&self) -> bool {
        self.node.is_end()
    }

    /// Moves the cursor to the next occurrence.
    pub fn move_next(&mut self) {
        match self.node.value() {
            Some(&count) if self.occurrence + 1 < count => self.occurrence += 1,
            _ => {
                self.node.move_next();
                self.occurrence = 0;
            }
        }
    }

    /// Moves the cursor to the previous occurrence.
    pub fn move_prev(&mut self) {
        if self.occurrence > 0 {
            self.occurrence -= 1;
        } else {
            self.node.move_prev();
            self.occurrence = self.node.value().map_or(0, |&count| count - 1);
        }
    }

    /// Returns the value the cursor points to, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.node.key()
    }

    /// Returns how many occurrences of the current value precede the cursor.
    pub fn occurrence(&self) -> usize {
        self.occurrence
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
        self.node == other.node && self.occurrence == other.occurrence
    }
}

impl<T, C> Eq for Cursor<'_, T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.get())
            .field(&self.occurrence)
            .finish()
    }
}

impl<'a, T, C> CursorMut<'a, T, C> {
    /// Returns a read-only cursor pointing to the current occurrence.
    pub fn as_cursor(&self) -> Cursor<'_, T, C> {
        Cursor {
            node: self.node.as_cursor(),
            occurrence: self.occurrence,
        }
    }

    /// Returns true if the cursor points to the end position.
    pub fn is_end(&self) -> bool {
        self.node.is_end()
    }

    /// Moves the cursor to the next occurrence.
    pub fn move_next(&mut self) {
        let count = self.node.get().map_or(0, |(_, &count)| count);
        if self.occurrence + 1 < count {
            self.occurrence += 1;
        } else {
            self.node.move_next();
            self.occurrence = 0;
        }
    }

    /// Moves the cursor to the previous occurrence.
    pub fn move_prev(&mut self) {
        if self.occurrence > 0 {
            self.occurrence -= 1;
        } else {
            self.node.move_prev();
            self.occurrence = self.node.get().map_or(0, |(_, &count)| count - 1);
        }
    }

    /// Returns the value the cursor points to, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.node.key()
    }

    /// Removes the current occurrence and moves the cursor to the next one.
    /// Returns false and does nothing at the end position.
    pub fn remove_current(&mut self) -> bool {
        let count = match self.node.value_mut() {
            Some(count) => count,
            None => return false,
        };
        if *count > 1 {
            *count -= 1;
            let remaining = *count;
            if self.occurrence == remaining {
                self.node.move_next();
                self.occurrence = 0;
            }
        } else {
            // The last occurrence takes the stored value with it
            let _removed = self.node.remove_current();
            self.occurrence = 0;
        }
        *self.len -= 1;
        true
    }
}

impl<T: fmt::Debug, C> fmt::Debug for CursorMut<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.get())
            .field(&self.occurrence)
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some((value, left)) = &mut self.front {
                if *left > 0 {
                    *left -= 1;
                    self.len -= 1;
                    return Some(*value);
                }
            }
            match self.nodes.next() {
                Some((value, &count)) => self.front = Some((value, count)),
                None => {
                    // Remaining occurrences are parked at the back
                    let (value, left) = self.back.as_mut()?;
                    if *left == 0 {
                        return None;
                    }
                    *left -= 1;
                    self.len -= 1;
                    return Some(*value);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        loop {
            if let Some((value, left)) = &mut self.back {
                if *left > 0 {
                    *left -= 1;
                    self.len -= 1;
                    return Some(*value);
                }
            }
            match self.nodes.next_back() {
                Some((value, &count)) => self.back = Some((value, count)),
                None => {
                    // Remaining occurrences are parked at the front
                    let (value, left) = self.front.as_mut()?;
                    if *left == 0 {
                        return None;
                    }
                    *left -= 1;
                    self.len -= 1;
                    return Some(*value);
                }
            }
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T: Clone, C> IntoIter<T, C> {
    fn take_one(slot: &mut Option<(T, usize)>) -> Option<T> {
        let (value, count) = slot.take()?;
        if count > 1 {
            let copy = value.clone();
            *slot = Some((value, count - 1));
            Some(copy)
        } else {
            Some(value)
        }
    }
}

impl<T: Clone, C> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        if self.front.is_none() {
            self.front = self.nodes.next().or_else(|| self.back.take());
        }
        let value = Self::take_one(&mut self.front)?;
        self.len -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T: Clone, C> DoubleEndedIterator for IntoIter<T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        if self.back.is_none() {
            self.back = self.nodes.next_back().or_else(|| self.front.take());
        }
        let value = Self::take_one(&mut self.back)?;
        self.len -= 1;
        Some(value)
    }
}

impl<T: Clone, C> ExactSizeIterator for IntoIter<T, C> {}

impl<T: Clone, C> FusedIterator for IntoIter<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for IntoIter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IntoIter").field("len", &self.len).finish()
    }
}
