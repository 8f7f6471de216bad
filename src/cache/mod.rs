//! Time-bounded response caching for idempotent reads.
//!
//! # Design Decisions
//! - The cache is an explicit object injected into the client, not hidden
//!   module state; independent clients can share or isolate caches
//! - Entries are last-writer-wins; concurrent misses may both populate a
//!   key, which is acceptable because entries are time-bounded
//! - Expired entries are purged lazily on lookup, never served

pub mod key;
pub mod store;

pub use key::cache_key;
pub use store::ResponseCache;
