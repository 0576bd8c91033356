use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{node_key, node_value, node_value_mut, predecessor, successor, Node, NodePtr, Tree};
use crate::compare::Natural;

/// An iterator over the entries of a map, sorted by key.
pub struct Iter<'a, K, V> {
    front: NodePtr<K, V>,
    back: NodePtr<K, V>,
    len: usize,
    _marker: PhantomData<&'a Node<K, V>>,
}

/// A mutable iterator over the entries of a map, sorted by key.
pub struct IterMut<'a, K, V> {
    front: NodePtr<K, V>,
    back: NodePtr<K, V>,
    len: usize,
    _marker: PhantomData<&'a mut Node<K, V>>,
}

/// An owning iterator over the entries of a map, sorted by key.
pub struct IntoIter<K, V, C = Natural> {
    tree: Tree<K, V, C>,
}

/// An iterator over the keys of a map.
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// An iterator over the values of a map.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a map.
pub struct ValuesMut<'a, K, V> {
    iter: IterMut<'a, K, V>,
}

unsafe impl<K: Sync, V: Sync> Send for Iter<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Iter<'_, K, V> {}
unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new<C>(tree: &'a Tree<K, V, C>) -> Self {
        Self {
            front: tree.first_node(),
            back: tree.last_node(),
            len: tree.len(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn fmt_keys(&self, f: &mut fmt::Formatter) -> fmt::Result
    where
        K: fmt::Debug,
    {
        f.debug_list().entries(self.clone().map(|(k, _)| k)).finish()
    }
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new<C>(tree: &'a mut Tree<K, V, C>) -> Self {
        Self {
            front: tree.first_node(),
            back: tree.last_node(),
            len: tree.len(),
            _marker: PhantomData,
        }
    }
}

impl<K, V, C> IntoIter<K, V, C> {
    pub(crate) fn new(tree: Tree<K, V, C>) -> Self {
        Self { tree }
    }

    pub(crate) fn fmt_keys(&self, f: &mut fmt::Formatter) -> fmt::Result
    where
        K: fmt::Debug,
    {
        f.debug_list()
            .entries(Iter::new(&self.tree).map(|(k, _)| k))
            .finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node_ptr = self.front;
        self.len -= 1;
        unsafe {
            self.front = successor(node_ptr);
            Some((node_key(node_ptr), node_value(node_ptr)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node_ptr = self.back;
        self.len -= 1;
        unsafe {
            self.back = predecessor(node_ptr);
            Some((node_key(node_ptr), node_value(node_ptr)))
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// Auto derived clone seems to have an invalid type bound of K: Clone
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node_ptr = self.front;
        self.len -= 1;
        unsafe {
            self.front = successor(node_ptr);
            Some((node_key(node_ptr), node_value_mut(node_ptr)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node_ptr = self.back;
        self.len -= 1;
        unsafe {
            self.back = predecessor(node_ptr);
            Some((node_key(node_ptr), node_value_mut(node_ptr)))
        }
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len).finish()
    }
}

impl<K, V, C> Iterator for IntoIter<K, V, C> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V, C> DoubleEndedIterator for IntoIter<K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<K, V, C> ExactSizeIterator for IntoIter<K, V, C> {}

impl<K, V, C> FusedIterator for IntoIter<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for IntoIter<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(Iter::new(&self.tree)).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.iter.fmt_keys(f)
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ValuesMut").field("len", &self.iter.len).finish()
    }
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> ValuesMut<'a, K, V> {
    pub(crate) fn new(iter: IterMut<'a, K, V>) -> Self {
        Self { iter }
    }
}
