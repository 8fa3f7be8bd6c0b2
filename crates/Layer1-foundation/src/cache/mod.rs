//! Cache utilities

mod ttl;

pub use ttl::{TtlCache, TtlCacheStats};
