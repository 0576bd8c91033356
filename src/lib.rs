//! Ordered containers built on a single AVL tree engine.
//!
//! [`AvlTreeMap`] keeps unique keys with associated values, [`AvlTreeSet`]
//! keeps unique values and [`AvlTreeMultiset`] keeps values with
//! duplicates. All three share one balanced binary search tree whose
//! nodes link to their parents, so cursors can step in either direction
//! without an auxiliary stack.
//!
//! Every container has an end position that follows the largest element.
//! Cursors step from the largest element onto the end position and from
//! the end position around to the smallest element.
//!
//! ```
//! use avl_containers::AvlTreeMap;
//! let mut map = AvlTreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! let mut cursor = map.cursor_end();
//! cursor.move_prev();
//! assert_eq!(cursor.get(), Some((&3, &"three")));
//! ```

mod compare;
mod error;
pub mod map;
pub mod multiset;
pub mod set;
mod tree;

pub use compare::{Compare, Natural};
pub use error::{Error, Result};
pub use map::AvlTreeMap;
pub use multiset::AvlTreeMultiset;
pub use set::AvlTreeSet;

#[cfg(test)]
mod model;
