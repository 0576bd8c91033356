use std::fmt;

use super::{node_key, node_value, node_value_mut, predecessor, successor, NodePtr, Tree};
use crate::compare::Natural;

/// A cursor over the entries of a tree.
///
/// A cursor points either to an entry or to the end position, which sits
/// after the largest and before the smallest entry. Moving past either end
/// wraps around through the end position. Two cursors compare equal when
/// they point to the same entry.
pub struct Cursor<'a, K, V, C = Natural> {
    tree: &'a Tree<K, V, C>,
    node_ptr: NodePtr<K, V>,
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    pub(crate) fn new(tree: &'a Tree<K, V, C>, node_ptr: NodePtr<K, V>) -> Self {
        Self { tree, node_ptr }
    }

    /// Returns true if the cursor points to the end position.
    pub fn is_end(&self) -> bool {
        self.node_ptr == self.tree.sentinel()
    }

    /// Moves the cursor to the next entry in key order.
    pub fn move_next(&mut self) {
        self.node_ptr = unsafe { successor(self.node_ptr) };
    }

    /// Moves the cursor to the previous entry in key order.
    pub fn move_prev(&mut self) {
        self.node_ptr = unsafe { predecessor(self.node_ptr) };
    }

    /// Returns the entry the cursor points to, or `None` at the end position.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.entry_at(self.node_ptr)
    }

    /// Returns the key the cursor points to.
    pub fn key(&self) -> Option<&'a K> {
        self.get().map(|(k, _)| k)
    }

    /// Returns the value the cursor points to.
    pub fn value(&self) -> Option<&'a V> {
        self.get().map(|(_, v)| v)
    }

    /// Returns the entry after the cursor without moving it.
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        self.entry_at(unsafe { successor(self.node_ptr) })
    }

    /// Returns the entry before the cursor without moving it.
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        self.entry_at(unsafe { predecessor(self.node_ptr) })
    }

    fn entry_at(&self, node_ptr: NodePtr<K, V>) -> Option<(&'a K, &'a V)> {
        if node_ptr == self.tree.sentinel() {
            return None;
        }
        unsafe { Some((node_key(node_ptr), node_value(node_ptr))) }
    }
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for Cursor<'_, K, V, C> {}

impl<K, V, C> PartialEq for Cursor<'_, K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.node_ptr == other.node_ptr
    }
}

impl<K, V, C> Eq for Cursor<'_, K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A cursor over the entries of a tree which can mutate values and
/// remove entries.
pub struct CursorMut<'a, K, V, C = Natural> {
    tree: &'a mut Tree<K, V, C>,
    node_ptr: NodePtr<K, V>,
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    pub(crate) fn new(tree: &'a mut Tree<K, V, C>, node_ptr: NodePtr<K, V>) -> Self {
        Self { tree, node_ptr }
    }

    /// Returns a read-only cursor pointing to the current entry.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self.tree, self.node_ptr)
    }

    /// Converts into a read-only cursor pointing to the current entry.
    pub fn into_cursor(self) -> Cursor<'a, K, V, C> {
        Cursor::new(self.tree, self.node_ptr)
    }

    /// Returns true if the cursor points to the end position.
    pub fn is_end(&self) -> bool {
        self.node_ptr == self.tree.sentinel()
    }

    /// Moves the cursor to the next entry in key order.
    pub fn move_next(&mut self) {
        self.node_ptr = unsafe { successor(self.node_ptr) };
    }

    /// Moves the cursor to the previous entry in key order.
    pub fn move_prev(&mut self) {
        self.node_ptr = unsafe { predecessor(self.node_ptr) };
    }

    /// Returns the entry the cursor points to, or `None` at the end position.
    pub fn get(&self) -> Option<(&K, &V)> {
        self.as_cursor().get()
    }

    /// Returns the key the cursor points to.
    pub fn key(&self) -> Option<&K> {
        self.as_cursor().key()
    }

    /// Returns a mutable reference to the value the cursor points to.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        if self.is_end() {
            return None;
        }
        Some(unsafe { node_value_mut(self.node_ptr) })
    }

    /// Converts into a mutable reference to the value the cursor points to.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        if self.is_end() {
            return None;
        }
        Some(unsafe { node_value_mut(self.node_ptr) })
    }

    /// Returns the entry after the cursor without moving it.
    pub fn peek_next(&self) -> Option<(&K, &V)> {
        self.as_cursor().peek_next()
    }

    /// Returns the entry before the cursor without moving it.
    pub fn peek_prev(&self) -> Option<(&K, &V)> {
        self.as_cursor().peek_prev()
    }

    /// Removes the current entry and moves the cursor to the next one.
    /// Returns `None` and does nothing at the end position.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        if self.is_end() {
            return None;
        }
        let next_ptr = unsafe { successor(self.node_ptr) };
        let entry = self.tree.remove_node(self.node_ptr);
        self.node_ptr = next_ptr;
        Some(entry)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for CursorMut<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}
