//! # fpkit
//!
//! A functional programming toolkit for Rust: channel-backed streams with an
//! order-preserving concurrent map, ordered persistent collections, Option
//! helpers, and a collector framework in the spirit of `Stream.collect()`.
//!
//! ## Overview
//!
//! - **Stream**: Lazy and eager pipelines whose stages run as tokio tasks
//!   connected by bounded channels
//! - **Collections**: [`OrderedSet`](collection::OrderedSet) and
//!   [`OrderedMap`](collection::OrderedMap), backed by shared sorted slices
//! - **Optional**: Extension methods on [`Option`]
//! - **Collector**: Reusable accumulation strategies for iterators and streams
//!
//! ## Feature Flags
//!
//! - `collection`: Ordered collections
//! - `collector`: Collector trait and standard collectors
//! - `optional`: Option extension methods
//! - `stream`: Channel-backed streams (pulls in tokio)
//! - `serde`: Serialization for the collections
//! - `rayon`: Parallel iteration over the collections
//! - `tracing`: Pipeline events through the `tracing` crate
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use fpkit::prelude::*;
//!
//! let squares: Vec<i32> = Stream::of(1..=5)
//!     .map_concurrent(2, |value| value * value)
//!     .collect_blocking();
//! assert_eq!(squares, vec![1, 4, 9, 16, 25]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use fpkit::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "collection")]
    pub use crate::collection::*;

    #[cfg(feature = "collector")]
    pub use crate::collector::{Collector, IteratorCollectExt, MergeableCollector};

    #[cfg(feature = "optional")]
    pub use crate::optional::*;

    #[cfg(feature = "stream")]
    pub use crate::stream::{BlockingError, BlockingIter, Stream, StreamConfig, StreamError};
}

#[cfg(feature = "collection")]
pub mod collection;

#[cfg(feature = "collector")]
pub mod collector;

#[cfg(feature = "optional")]
pub mod optional;

#[cfg(feature = "stream")]
pub mod stream;
