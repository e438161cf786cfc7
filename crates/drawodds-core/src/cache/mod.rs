//! Bounded memoization for repeated identical queries.

mod lru;

pub use lru::LruCache;
