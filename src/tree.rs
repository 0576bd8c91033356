//! The AVL tree engine shared by all containers.
//!
//! Nodes are heap allocated and linked by raw pointers: every node owns its
//! children, the parent link is a non-owning back reference used for
//! traversal and rotations only.
//!
//! Each tree owns one extra node, the sentinel, which stands for the end
//! position. It never carries a key or value. Its left link holds the root
//! node, its right link is always empty and it is the only node without a
//! parent, which lets traversal code detect the end position without a
//! reference to the tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::compare::Compare;

mod cursor;
mod iter;

pub use cursor::{Cursor, CursorMut};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

pub(crate) type NodePtr<K, V> = NonNull<Links<K, V>>;
type Link<K, V> = Option<NodePtr<K, V>>;

/// Structural part of a node, shared by real nodes and the sentinel.
pub(crate) struct Links<K, V> {
    left: Link<K, V>,
    right: Link<K, V>,
    parent: Link<K, V>,
    height: usize,
    _marker: PhantomData<fn() -> (K, V)>,
}

/// A tree element. `links` must stay the first field so that a pointer to
/// the node is also a valid pointer to its links.
#[repr(C)]
struct Node<K, V> {
    links: Links<K, V>,
    key: K,
    value: V,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

/// Result of looking up a key: either the node holding an equal key, or the
/// empty child slot where such a key would be attached.
pub(crate) enum Search<K, V> {
    Found(NodePtr<K, V>),
    Vacant { parent: NodePtr<K, V>, dir: Dir },
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

pub(crate) struct Tree<K, V, C> {
    sentinel: NodePtr<K, V>,
    len: usize,
    cmp: C,
    _marker: PhantomData<Box<Node<K, V>>>,
}

unsafe impl<K: Send, V: Send, C: Send> Send for Tree<K, V, C> {}
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for Tree<K, V, C> {}

impl<K, V, C> Tree<K, V, C> {
    pub fn with_comparator(cmp: C) -> Self {
        let sentinel = Box::new(Links {
            left: None,
            right: None,
            parent: None,
            height: 0,
            _marker: PhantomData,
        });
        Self {
            sentinel: NonNull::from(Box::leak(sentinel)),
            len: 0,
            cmp,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Upper bound for the number of nodes that fit into the address space.
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Node<K, V>>()
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        Self::height_of(self.root())
    }

    pub fn sentinel(&self) -> NodePtr<K, V> {
        self.sentinel
    }

    fn root(&self) -> Link<K, V> {
        unsafe { self.sentinel.as_ref().left }
    }

    /// Returns the node holding the smallest key, or the sentinel if empty.
    pub fn first_node(&self) -> NodePtr<K, V> {
        match self.root() {
            None => self.sentinel,
            Some(root_ptr) => unsafe { leftmost(root_ptr) },
        }
    }

    /// Returns the node holding the largest key, or the sentinel if empty.
    pub fn last_node(&self) -> NodePtr<K, V> {
        unsafe { predecessor(self.sentinel) }
    }

    /// Removes all nodes, deallocating their memory. The sentinel stays.
    pub fn clear(&mut self) {
        self.postorder(|node_ptr| unsafe {
            Node::destroy(node_ptr);
        });
        unsafe { self.sentinel.as_mut().left = None };
        self.len = 0;
    }

    pub fn search<Q>(&self, key: &Q) -> Search<K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut parent = self.sentinel;
        let mut dir = Dir::Left;
        loop {
            let child = unsafe { parent.as_ref().child(dir) };
            match child {
                None => return Search::Vacant { parent, dir },
                Some(node_ptr) => {
                    dir = match self.cmp.compare(key, unsafe { node_key(node_ptr) }.borrow()) {
                        Ordering::Equal => return Search::Found(node_ptr),
                        Ordering::Less => Dir::Left,
                        Ordering::Greater => Dir::Right,
                    };
                    parent = node_ptr;
                }
            }
        }
    }

    pub fn find<Q>(&self, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.search(key) {
            Search::Found(node_ptr) => Some(node_ptr),
            Search::Vacant { .. } => None,
        }
    }

    /// Returns the first node whose key is not less than `key`,
    /// or the sentinel if there is none.
    pub fn lower_bound<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut bound = self.sentinel;
        let mut current = self.root();
        while let Some(node_ptr) = current {
            current = unsafe {
                if self.cmp.compare(node_key(node_ptr).borrow(), key) == Ordering::Less {
                    node_ptr.as_ref().right
                } else {
                    bound = node_ptr;
                    node_ptr.as_ref().left
                }
            };
        }
        bound
    }

    /// Returns the first node whose key is greater than `key`,
    /// or the sentinel if there is none.
    pub fn upper_bound<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut bound = self.sentinel;
        let mut current = self.root();
        while let Some(node_ptr) = current {
            current = unsafe {
                if self.cmp.compare(node_key(node_ptr).borrow(), key) == Ordering::Greater {
                    bound = node_ptr;
                    node_ptr.as_ref().left
                } else {
                    node_ptr.as_ref().right
                }
            };
        }
        bound
    }

    /// Inserts a key-value pair unless an equal key is present.
    /// An existing entry is left untouched and the new pair is dropped.
    /// Returns the node holding the key and whether it was newly inserted.
    pub fn insert(&mut self, key: K, value: V) -> (NodePtr<K, V>, bool)
    where
        C: Compare<K>,
    {
        match self.search(&key) {
            Search::Found(node_ptr) => (node_ptr, false),
            Search::Vacant { parent, dir } => {
                let node_ptr = Node::create(key, value);
                self.link(parent, dir, node_ptr);
                (node_ptr, true)
            }
        }
    }

    /// Attaches a detached node at an empty child slot found by `search`.
    pub fn link(&mut self, mut parent: NodePtr<K, V>, dir: Dir, mut node_ptr: NodePtr<K, V>) {
        unsafe {
            debug_assert!(parent.as_ref().child(dir).is_none());
            let links = node_ptr.as_mut();
            links.left = None;
            links.right = None;
            links.parent = Some(parent);
            links.height = 1;
            parent.as_mut().set_child(dir, Some(node_ptr));
        }
        self.len += 1;
        self.rebalance_once(parent);
    }

    /// Creates a node for a key-value pair and attaches it at an empty child slot.
    pub fn link_new(&mut self, parent: NodePtr<K, V>, dir: Dir, key: K, value: V) -> NodePtr<K, V> {
        let node_ptr = Node::create(key, value);
        self.link(parent, dir, node_ptr);
        node_ptr
    }

    /// Removes a node from the tree and returns its key-value pair.
    /// `node_ptr` must be a node of this tree, not the sentinel.
    pub fn remove_node(&mut self, node_ptr: NodePtr<K, V>) -> (K, V) {
        debug_assert!(node_ptr != self.sentinel);
        debug_assert!(self.len >= 1);
        self.unlink(node_ptr);
        self.len -= 1;
        unsafe { Node::destroy(node_ptr) }
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let node_ptr = self.first_node();
        if node_ptr == self.sentinel {
            return None;
        }
        Some(self.remove_node(node_ptr))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let node_ptr = self.last_node();
        if node_ptr == self.sentinel {
            return None;
        }
        Some(self.remove_node(node_ptr))
    }

    /// Moves every node of `other` whose key is not present in `self`
    /// into `self`. Nodes with colliding keys stay in `other`.
    pub fn merge(&mut self, other: &mut Self)
    where
        C: Compare<K>,
    {
        let mut node_ptr = other.first_node();
        while node_ptr != other.sentinel {
            let next_ptr = unsafe { successor(node_ptr) };
            if let Search::Vacant { parent, dir } = self.search(unsafe { node_key(node_ptr) }) {
                other.unlink(node_ptr);
                other.len -= 1;
                self.link(parent, dir, node_ptr);
            }
            node_ptr = next_ptr;
        }
    }

    /// Removes every node for which `keep` returns false.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut node_ptr = self.first_node();
        while node_ptr != self.sentinel {
            let next_ptr = unsafe { successor(node_ptr) };
            if !keep(unsafe { node_key(node_ptr) }, unsafe { node_value_mut(node_ptr) }) {
                self.remove_node(node_ptr);
            }
            node_ptr = next_ptr;
        }
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        C: Compare<K>,
    {
        unsafe {
            // Check sentinel
            let sentinel = self.sentinel.as_ref();
            assert!(sentinel.parent.is_none());
            assert!(sentinel.right.is_none());
            if let Some(root_ptr) = sentinel.left {
                assert_eq!(root_ptr.as_ref().parent, Some(self.sentinel));
            }

            // Check tree nodes
            let mut num_nodes = 0;
            self.preorder(|node_ptr| {
                let mut left_height = 0;
                let mut right_height = 0;

                // Check link for left child node
                if let Some(left_ptr) = node_ptr.as_ref().left {
                    assert_eq!(left_ptr.as_ref().parent, Some(node_ptr));
                    assert_eq!(
                        self.cmp.compare(node_key(left_ptr), node_key(node_ptr)),
                        Ordering::Less
                    );
                    left_height = left_ptr.as_ref().height;
                }

                // Check link for right child node
                if let Some(right_ptr) = node_ptr.as_ref().right {
                    assert_eq!(right_ptr.as_ref().parent, Some(node_ptr));
                    assert_eq!(
                        self.cmp.compare(node_key(right_ptr), node_key(node_ptr)),
                        Ordering::Greater
                    );
                    right_height = right_ptr.as_ref().height;
                }

                // Check height
                assert_eq!(
                    node_ptr.as_ref().height,
                    1 + cmp::max(left_height, right_height)
                );

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            });

            // Check number of nodes
            assert_eq!(num_nodes, self.len);

            // Check in-order traversal through parent links, both directions
            let mut num_visited = 0;
            let mut node_ptr = self.first_node();
            while node_ptr != self.sentinel {
                let next_ptr = successor(node_ptr);
                if next_ptr != self.sentinel {
                    assert_eq!(
                        self.cmp.compare(node_key(node_ptr), node_key(next_ptr)),
                        Ordering::Less
                    );
                }
                assert_eq!(predecessor(next_ptr), node_ptr);
                node_ptr = next_ptr;
                num_visited += 1;
            }
            assert_eq!(num_visited, self.len);
        }
    }

    /// Replaces `old` by `new` in the matching child slot of `parent`.
    unsafe fn replace_child(parent: Link<K, V>, old: NodePtr<K, V>, new: Link<K, V>) {
        debug_assert!(parent.is_some());
        if let Some(mut parent_ptr) = parent {
            if parent_ptr.as_ref().left == Some(old) {
                parent_ptr.as_mut().left = new;
            } else {
                debug_assert!(parent_ptr.as_ref().right == Some(old));
                parent_ptr.as_mut().right = new;
            }
        }
    }

    /// Detaches a node from the tree and restores balance.
    /// The detached node keeps stale links and must be destroyed or relinked.
    fn unlink(&mut self, node_ptr: NodePtr<K, V>) {
        unsafe {
            let parent = node_ptr.as_ref().parent;
            let rebalance_from = match (node_ptr.as_ref().left, node_ptr.as_ref().right) {
                // Leaf: clear parent slot
                (None, None) => {
                    Self::replace_child(parent, node_ptr, None);
                    parent
                }

                // Stem: splice single child into the node's place
                (Some(mut child_ptr), None) | (None, Some(mut child_ptr)) => {
                    Self::replace_child(parent, node_ptr, Some(child_ptr));
                    child_ptr.as_mut().parent = parent;
                    parent
                }

                // Two children: replace node by its in-order successor
                (Some(mut left_ptr), Some(mut right_ptr)) => {
                    let mut successor_ptr = leftmost(right_ptr);
                    let rebalance_from = if successor_ptr == right_ptr {
                        // Successor is the right child, it keeps its own right subtree
                        Some(successor_ptr)
                    } else {
                        // Successor sits deeper, hand its right subtree (if any) to its parent
                        let mut successor_parent_ptr = successor_ptr.as_ref().parent;
                        if let Some(parent_ptr) = successor_parent_ptr.as_mut() {
                            parent_ptr.as_mut().left = successor_ptr.as_ref().right;
                        }
                        if let Some(mut successor_right_ptr) = successor_ptr.as_ref().right {
                            successor_right_ptr.as_mut().parent = successor_parent_ptr;
                        }
                        successor_ptr.as_mut().right = Some(right_ptr);
                        right_ptr.as_mut().parent = Some(successor_ptr);
                        successor_parent_ptr
                    };
                    successor_ptr.as_mut().left = Some(left_ptr);
                    left_ptr.as_mut().parent = Some(successor_ptr);
                    successor_ptr.as_mut().parent = parent;
                    Self::replace_child(parent, node_ptr, Some(successor_ptr));
                    rebalance_from
                }
            };

            if let Some(rebalance_from) = rebalance_from {
                self.rebalance(rebalance_from);
            }
        }
    }

    fn height_of(link: Link<K, V>) -> usize {
        match link {
            None => 0,
            Some(node_ptr) => unsafe { node_ptr.as_ref().height },
        }
    }

    fn left_height(node_ptr: NodePtr<K, V>) -> usize {
        Self::height_of(unsafe { node_ptr.as_ref().left })
    }

    fn right_height(node_ptr: NodePtr<K, V>) -> usize {
        Self::height_of(unsafe { node_ptr.as_ref().right })
    }

    /// Right subtree height minus left subtree height.
    fn balance_factor(node_ptr: NodePtr<K, V>) -> isize {
        Self::right_height(node_ptr) as isize - Self::left_height(node_ptr) as isize
    }

    fn adjust_height(mut node_ptr: NodePtr<K, V>) {
        let height = 1 + cmp::max(Self::left_height(node_ptr), Self::right_height(node_ptr));
        unsafe { node_ptr.as_mut().height = height };
    }

    fn rotate_left(mut node_ptr: NodePtr<K, V>) {
        unsafe {
            if let Some(mut right_ptr) = node_ptr.as_ref().right {
                node_ptr.as_mut().right = right_ptr.as_ref().left;
                if let Some(mut right_left_ptr) = right_ptr.as_ref().left {
                    right_left_ptr.as_mut().parent = Some(node_ptr);
                }

                let parent = node_ptr.as_ref().parent;
                right_ptr.as_mut().parent = parent;
                Self::replace_child(parent, node_ptr, Some(right_ptr));

                right_ptr.as_mut().left = Some(node_ptr);
                node_ptr.as_mut().parent = Some(right_ptr);

                Self::adjust_height(node_ptr);
                Self::adjust_height(right_ptr);
            }
        }
    }

    fn rotate_right(mut node_ptr: NodePtr<K, V>) {
        unsafe {
            if let Some(mut left_ptr) = node_ptr.as_ref().left {
                node_ptr.as_mut().left = left_ptr.as_ref().right;
                if let Some(mut left_right_ptr) = left_ptr.as_ref().right {
                    left_right_ptr.as_mut().parent = Some(node_ptr);
                }

                let parent = node_ptr.as_ref().parent;
                left_ptr.as_mut().parent = parent;
                Self::replace_child(parent, node_ptr, Some(left_ptr));

                left_ptr.as_mut().right = Some(node_ptr);
                node_ptr.as_mut().parent = Some(left_ptr);

                Self::adjust_height(node_ptr);
                Self::adjust_height(left_ptr);
            }
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    fn rebalance(&mut self, start_from: NodePtr<K, V>) {
        let mut current = start_from;
        while current != self.sentinel {
            let parent = unsafe { current.as_ref().parent };
            Self::rebalance_node(current);
            match parent {
                Some(parent_ptr) => current = parent_ptr,
                None => break,
            }
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after first rebalance operation.
    /// This is enough to restore balance after a single insert operation.
    fn rebalance_once(&mut self, start_from: NodePtr<K, V>) {
        let mut current = start_from;
        while current != self.sentinel {
            let parent = unsafe { current.as_ref().parent };
            if Self::rebalance_node(current) {
                break;
            }
            match parent {
                Some(parent_ptr) => current = parent_ptr,
                None => break,
            }
        }
    }

    /// Restores AVL condition (balance) at given node if necessary and adjusts height.
    /// Resulting balance factor will be +1, 0 or -1.
    /// Initial balance factor must not exceed +2 or -2, which always holds after a single update.
    /// Returns whether a rotation had been necessary.
    fn rebalance_node(node_ptr: NodePtr<K, V>) -> bool {
        let balance = Self::balance_factor(node_ptr);
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            // Right heavy, double rotation if right child leans left
            if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                if Self::balance_factor(right_ptr) < 0 {
                    Self::rotate_right(right_ptr);
                }
            }
            Self::rotate_left(node_ptr);
            true
        } else if balance < -1 {
            // Left heavy, double rotation if left child leans right
            if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                if Self::balance_factor(left_ptr) > 0 {
                    Self::rotate_left(left_ptr);
                }
            }
            Self::rotate_right(node_ptr);
            true
        } else {
            Self::adjust_height(node_ptr);
            false
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<F: FnMut(NodePtr<K, V>)>(&self, f: F) {
        self.traverse(f, |_| {});
    }

    fn postorder<F: FnMut(NodePtr<K, V>)>(&self, f: F) {
        self.traverse(|_| {}, f);
    }

    fn traverse<Pre, Post>(&self, mut preorder: Pre, mut postorder: Post)
    where
        Pre: FnMut(NodePtr<K, V>),
        Post: FnMut(NodePtr<K, V>),
    {
        if let Some(mut node_ptr) = self.root() {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        match unsafe { node_ptr.as_ref().parent } {
                            Some(parent_ptr) if parent_ptr != self.sentinel => {
                                if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                    dir = Direction::FromLeft;
                                } else {
                                    dir = Direction::FromRight;
                                }
                                postorder(node_ptr);
                                node_ptr = parent_ptr;
                            }
                            _ => {
                                postorder(node_ptr);
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Copies the subtree at `source` below `parent`, keeping its exact shape.
    /// Each node is linked before its children are copied, so a panicking
    /// clone leaves a well-formed partial tree for `Drop` to free.
    unsafe fn clone_subtree(&mut self, source: NodePtr<K, V>, mut parent: NodePtr<K, V>, dir: Dir)
    where
        K: Clone,
        V: Clone,
    {
        let mut node_ptr = Node::create(node_key(source).clone(), node_value(source).clone());
        node_ptr.as_mut().parent = Some(parent);
        node_ptr.as_mut().height = source.as_ref().height;
        parent.as_mut().set_child(dir, Some(node_ptr));
        self.len += 1;

        if let Some(left_ptr) = source.as_ref().left {
            self.clone_subtree(left_ptr, node_ptr, Dir::Left);
        }
        if let Some(right_ptr) = source.as_ref().right {
            self.clone_subtree(right_ptr, node_ptr, Dir::Right);
        }
    }
}

impl<K, V, C> Drop for Tree<K, V, C> {
    fn drop(&mut self) {
        self.clear();
        unsafe { drop(Box::from_raw(self.sentinel.as_ptr())) };
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for Tree<K, V, C> {
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.cmp.clone());
        if let Some(root_ptr) = self.root() {
            let sentinel = tree.sentinel;
            unsafe { tree.clone_subtree(root_ptr, sentinel, Dir::Left) };
        }
        tree
    }
}

impl<K, V> Links<K, V> {
    fn child(&self, dir: Dir) -> Link<K, V> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    fn set_child(&mut self, dir: Dir, child: Link<K, V>) {
        match dir {
            Dir::Left => self.left = child,
            Dir::Right => self.right = child,
        }
    }
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> NodePtr<K, V> {
        let boxed = Box::new(Node {
            links: Links {
                left: None,
                right: None,
                parent: None,
                height: 1,
                _marker: PhantomData,
            },
            key,
            value,
        });
        NonNull::from(Box::leak(boxed)).cast()
    }

    unsafe fn destroy(node_ptr: NodePtr<K, V>) -> (K, V) {
        let node = Box::from_raw(node_ptr.cast::<Node<K, V>>().as_ptr());
        (node.key, node.value)
    }
}

/// # Safety
/// `node_ptr` must point to a live node that is not a sentinel.
pub(crate) unsafe fn node_key<'a, K, V>(node_ptr: NodePtr<K, V>) -> &'a K {
    &(*node_ptr.cast::<Node<K, V>>().as_ptr()).key
}

/// # Safety
/// `node_ptr` must point to a live node that is not a sentinel.
pub(crate) unsafe fn node_value<'a, K, V>(node_ptr: NodePtr<K, V>) -> &'a V {
    &(*node_ptr.cast::<Node<K, V>>().as_ptr()).value
}

/// # Safety
/// `node_ptr` must point to a live node that is not a sentinel,
/// and no other reference to its value may exist.
pub(crate) unsafe fn node_value_mut<'a, K, V>(node_ptr: NodePtr<K, V>) -> &'a mut V {
    &mut (*node_ptr.cast::<Node<K, V>>().as_ptr()).value
}

unsafe fn leftmost<K, V>(mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
    while let Some(left_ptr) = node_ptr.as_ref().left {
        node_ptr = left_ptr;
    }
    node_ptr
}

unsafe fn rightmost<K, V>(mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
    while let Some(right_ptr) = node_ptr.as_ref().right {
        node_ptr = right_ptr;
    }
    node_ptr
}

/// Returns the in-order successor of a node.
/// The successor of the largest node is the sentinel,
/// the successor of the sentinel is the smallest node.
///
/// # Safety
/// `node_ptr` must point to a live node or sentinel.
pub(crate) unsafe fn successor<K, V>(node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
    let links = node_ptr.as_ref();
    if links.parent.is_none() {
        return match links.left {
            None => node_ptr,
            Some(root_ptr) => leftmost(root_ptr),
        };
    }
    if let Some(right_ptr) = links.right {
        return leftmost(right_ptr);
    }
    let mut current = node_ptr;
    while let Some(parent_ptr) = current.as_ref().parent {
        if parent_ptr.as_ref().left == Some(current) {
            return parent_ptr;
        }
        current = parent_ptr;
    }
    current
}

/// Returns the in-order predecessor of a node.
/// The predecessor of the smallest node is the sentinel,
/// the predecessor of the sentinel is the largest node.
///
/// # Safety
/// `node_ptr` must point to a live node or sentinel.
pub(crate) unsafe fn predecessor<K, V>(node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
    if let Some(left_ptr) = node_ptr.as_ref().left {
        return rightmost(left_ptr);
    }
    let mut current = node_ptr;
    while let Some(parent_ptr) = current.as_ref().parent {
        if parent_ptr.as_ref().right == Some(current) {
            return parent_ptr;
        }
        current = parent_ptr;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::{predecessor, successor, Tree};
    use crate::compare::Natural;

    const N: i32 = 1_000;

    fn tree_of(keys: &[i32]) -> Tree<i32, (), Natural> {
        let mut tree = Tree::with_comparator(Natural);
        for &key in keys {
            tree.insert(key, ());
            tree.check_consistency();
        }
        tree
    }

    fn keys(tree: &Tree<i32, (), Natural>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut node_ptr = tree.first_node();
        while node_ptr != tree.sentinel() {
            keys.push(*unsafe { super::node_key(node_ptr) });
            node_ptr = unsafe { successor(node_ptr) };
        }
        keys
    }

    #[test]
    fn test_new() {
        let tree = Tree::<i32, (), Natural>::with_comparator(Natural);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.first_node(), tree.sentinel());
        assert_eq!(tree.last_node(), tree.sentinel());
        tree.check_consistency();
    }

    #[test]
    fn test_rebalance_insert() {
        // Single rotations in both directions
        assert_eq!(tree_of(&[3, 2, 1]).height(), 2);
        assert_eq!(tree_of(&[1, 2, 3]).height(), 2);
        // Double rotations in both directions
        assert_eq!(tree_of(&[3, 1, 2]).height(), 2);
        assert_eq!(tree_of(&[1, 3, 2]).height(), 2);
    }

    #[test]
    fn test_rebalance_remove() {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut tree = tree_of(&[3, 2, 4, 1]);
        assert_eq!(tree.height(), 3);
        let node_ptr = tree.find(&4).unwrap();
        assert_eq!(tree.remove_node(node_ptr), (4, ()));
        tree.check_consistency();
        assert_eq!(tree.height(), 2);

        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   3        3       1   3
        //    /        /
        //   2        2
        let mut tree = tree_of(&[1, 0, 3, 2]);
        let node_ptr = tree.find(&0).unwrap();
        tree.remove_node(node_ptr);
        tree.check_consistency();
        assert_eq!(tree.height(), 2);
        assert_eq!(keys(&tree), [1, 2, 3]);
    }

    #[test]
    fn test_remove_two_children() {
        // Successor is the right child
        let mut tree = tree_of(&[2, 1, 3]);
        let node_ptr = tree.find(&2).unwrap();
        tree.remove_node(node_ptr);
        tree.check_consistency();
        assert_eq!(keys(&tree), [1, 3]);

        // Successor is a leaf deeper down
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let node_ptr = tree.find(&4).unwrap();
        tree.remove_node(node_ptr);
        tree.check_consistency();
        assert_eq!(keys(&tree), [1, 2, 3, 5, 6, 7]);

        // Successor has a right child of its own
        let mut tree = tree_of(&[4, 2, 7, 1, 3, 5, 8, 6]);
        let node_ptr = tree.find(&4).unwrap();
        tree.remove_node(node_ptr);
        tree.check_consistency();
        assert_eq!(keys(&tree), [1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_traversal_wraps_at_sentinel() {
        let tree = tree_of(&[5, 3, 8]);
        let sentinel = tree.sentinel();
        unsafe {
            assert_eq!(successor(sentinel), tree.first_node());
            assert_eq!(predecessor(sentinel), tree.last_node());
            assert_eq!(successor(tree.last_node()), sentinel);
            assert_eq!(predecessor(tree.first_node()), sentinel);
        }
    }

    #[test]
    fn test_bounds() {
        let tree = tree_of(&[10, 20, 30]);
        let key_at = |node_ptr: super::NodePtr<i32, ()>| {
            if node_ptr == tree.sentinel() {
                None
            } else {
                Some(*unsafe { super::node_key(node_ptr) })
            }
        };
        assert_eq!(key_at(tree.lower_bound(&5)), Some(10));
        assert_eq!(key_at(tree.lower_bound(&20)), Some(20));
        assert_eq!(key_at(tree.upper_bound(&20)), Some(30));
        assert_eq!(key_at(tree.lower_bound(&31)), None);
        assert_eq!(key_at(tree.upper_bound(&30)), None);
    }

    #[test]
    fn test_insert_remove_sorted_range() {
        let mut tree = Tree::with_comparator(Natural);
        for key in 0..N {
            assert!(tree.insert(key, ()).1);
        }
        tree.check_consistency();
        assert!(tree.height() < 2 * 10 + 1);
        for key in (0..N).step_by(2) {
            let node_ptr = tree.find(&key).unwrap();
            tree.remove_node(node_ptr);
        }
        tree.check_consistency();
        assert_eq!(tree.len(), N as usize / 2);
    }

    #[test]
    fn test_clone_keeps_shape() {
        let tree = tree_of(&[8, 4, 12, 2, 6, 10, 14, 1]);
        let copy = tree.clone();
        copy.check_consistency();
        assert_eq!(copy.height(), tree.height());
        assert_eq!(keys(&copy), keys(&tree));
        assert_ne!(copy.first_node(), tree.first_node());
    }

    #[test]
    fn test_merge_moves_nodes() {
        let mut lhs = tree_of(&[1, 2, 3]);
        let mut rhs = tree_of(&[1, 20, 30]);
        let moved = rhs.find(&20).unwrap();
        lhs.merge(&mut rhs);
        lhs.check_consistency();
        rhs.check_consistency();
        assert_eq!(keys(&lhs), [1, 2, 3, 20, 30]);
        assert_eq!(keys(&rhs), [1]);
        assert_eq!(lhs.find(&20), Some(moved));
    }
}
