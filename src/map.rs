//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};
use crate::tree::{Search, Tree};

pub use crate::tree::{Cursor, CursorMut, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// An ordered map implemented with an AVL tree.
///
/// Keys are kept unique and sorted by the comparator `C`.
///
/// ```
/// use avl_containers::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
pub struct AvlTreeMap<K, V, C = Natural> {
    tree: Tree<K, V, C>,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Creates an empty map ordered by the given comparator.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: Tree::with_comparator(cmp),
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns the largest number of elements the map could hold.
    /// This is an address space bound, not a preallocated capacity.
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Returns the comparator ordering the keys.
    pub fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.tree.height()
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two maps in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Gets an iterator over the entries of the map in sorted order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.tree)
    }

    /// Gets a mutable iterator over the entries of the map in sorted order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.tree)
    }

    /// Gets an iterator over the keys of the map in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Gets a mutable iterator over the values of the map in key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    /// Returns a cursor pointing to the first entry,
    /// or to the end position if the map is empty.
    pub fn cursor_first(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.tree, self.tree.first_node())
    }

    /// Returns a cursor pointing to the last entry,
    /// or to the end position if the map is empty.
    pub fn cursor_last(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.tree, self.tree.last_node())
    }

    /// Returns a cursor pointing to the end position.
    pub fn cursor_end(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.tree, self.tree.sentinel())
    }

    /// Returns a mutable cursor pointing to the first entry.
    pub fn cursor_first_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let node_ptr = self.tree.first_node();
        CursorMut::new(&mut self.tree, node_ptr)
    }

    /// Returns a mutable cursor pointing to the last entry.
    pub fn cursor_last_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let node_ptr = self.tree.last_node();
        CursorMut::new(&mut self.tree, node_ptr)
    }

    /// Returns a mutable cursor pointing to the end position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let node_ptr = self.tree.sentinel();
        CursorMut::new(&mut self.tree, node_ptr)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.cursor_first().get()
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.cursor_last().get()
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Retains only the entries for which the predicate returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.tree.retain(keep);
    }

    /// Returns a cursor pointing to the entry with the given key,
    /// or to the end position if there is none.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let node_ptr = self.tree.find(key).unwrap_or_else(|| self.tree.sentinel());
        Cursor::new(&self.tree, node_ptr)
    }

    /// Returns a mutable cursor pointing to the entry with the given key,
    /// or to the end position if there is none.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let node_ptr = self.tree.find(key).unwrap_or_else(|| self.tree.sentinel());
        CursorMut::new(&mut self.tree, node_ptr)
    }

    /// Returns a cursor pointing to the first entry whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor::new(&self.tree, self.tree.lower_bound(key))
    }

    /// Returns a cursor pointing to the first entry whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        Cursor::new(&self.tree, self.tree.upper_bound(key))
    }

    /// Returns true if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.find(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find(key).get()
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.find_mut(key).into_value_mut()
    }

    /// Returns a reference to the value corresponding to the key,
    /// or [`Error::OutOfRange`] if the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get(key).ok_or(Error::OutOfRange)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// or [`Error::OutOfRange`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get_mut(key).ok_or(Error::OutOfRange)
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let node_ptr = self.tree.find(key)?;
        Some(self.tree.remove_node(node_ptr))
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        C: Compare<K>,
    {
        self.tree.check_consistency()
    }
}

impl<K, V, C: Compare<K>> AvlTreeMap<K, V, C> {
    /// Inserts a key-value pair into the map unless the key is already present.
    /// An existing value is not overwritten.
    ///
    /// Returns a cursor pointing to the entry with the key,
    /// and whether the pair has been inserted.
    pub fn insert(&mut self, key: K, value: V) -> (CursorMut<'_, K, V, C>, bool) {
        let (node_ptr, inserted) = self.tree.insert(key, value);
        (CursorMut::new(&mut self.tree, node_ptr), inserted)
    }

    /// Inserts a key-value pair into the map, overwriting the value of an
    /// existing entry with an equal key.
    ///
    /// Returns a cursor pointing to the entry,
    /// and whether a new entry has been created.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (CursorMut<'_, K, V, C>, bool) {
        match self.tree.search(&key) {
            Search::Found(node_ptr) => {
                let mut cursor = CursorMut::new(&mut self.tree, node_ptr);
                if let Some(existing) = cursor.value_mut() {
                    *existing = value;
                }
                (cursor, false)
            }
            Search::Vacant { parent, dir } => {
                let node_ptr = self.tree.link_new(parent, dir, key, value);
                (CursorMut::new(&mut self.tree, node_ptr), true)
            }
        }
    }

    /// Inserts every pair yielded by `entries`, in order, without overwriting.
    ///
    /// Returns one cursor and inserted flag per pair, in the order of the pairs.
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<(Cursor<'_, K, V, C>, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let results: Vec<_> = entries
            .into_iter()
            .map(|(key, value)| self.tree.insert(key, value))
            .collect();
        results
            .into_iter()
            .map(|(node_ptr, inserted)| (Cursor::new(&self.tree, node_ptr), inserted))
            .collect()
    }

    /// Returns a mutable reference to the value for the given key,
    /// inserting `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let node_ptr = match self.tree.search(&key) {
            Search::Found(node_ptr) => node_ptr,
            Search::Vacant { parent, dir } => self.tree.link_new(parent, dir, key, V::default()),
        };
        unsafe { crate::tree::node_value_mut(node_ptr) }
    }

    /// Moves all entries of `other` whose keys are not present in `self`
    /// into `self`. Entries with colliding keys remain in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

impl<K, V, C: Default> Default for AvlTreeMap<K, V, C> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for AvlTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for AvlTreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTreeMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for AvlTreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.tree.insert(key, value);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for AvlTreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlTreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for AvlTreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for AvlTreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for AvlTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}
