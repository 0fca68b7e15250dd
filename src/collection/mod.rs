//! Ordered persistent collections.
//!
//! This module provides collections backed by a single sorted slice that is
//! shared between versions:
//!
//! - [`OrderedSet`]: Set of unique elements kept in ascending order
//! - [`OrderedMap`]: Map whose entries are kept in ascending key order
//!
//! # Sharing
//!
//! Cloning a collection is O(1) and shares the underlying slice. Updates
//! (`insert`, `remove`, set algebra) build a fresh slice and return a new
//! collection, leaving every existing version untouched.
//!
//! # Examples
//!
//! ## `OrderedSet`
//!
//! ```rust
//! use fpkit::collection::OrderedSet;
//!
//! let set: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
//! let extended = set.insert(0);
//!
//! assert_eq!(set.len(), 3);
//! assert_eq!(extended.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
//! ```
//!
//! ## `OrderedMap`
//!
//! ```rust
//! use fpkit::collection::OrderedMap;
//!
//! let map = OrderedMap::new()
//!     .insert("b", 2)
//!     .insert("a", 1);
//!
//! let keys: Vec<&&str> = map.keys().collect();
//! assert_eq!(keys, vec![&"a", &"b"]);
//!
//! let updated = map.insert("a", 100);
//! assert_eq!(map.get(&"a"), Some(&1));
//! assert_eq!(updated.get(&"a"), Some(&100));
//! ```

mod map;
mod set;
mod sorted;

pub use map::OrderedMap;
pub use map::OrderedMapIntoIterator;
pub use map::OrderedMapIterator;
pub use set::OrderedSet;
pub use set::OrderedSetIntoIterator;
pub use set::OrderedSetIterator;

static_assertions::assert_impl_all!(OrderedSet<i32>: Send, Sync);
static_assertions::assert_impl_all!(OrderedMap<String, i32>: Send, Sync);
