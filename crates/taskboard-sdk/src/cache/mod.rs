//! Query cache
//!
//! - `keys`: structured query keys and prefix matching
//! - `entity_cache`: the keyed store with coalescing, invalidation and
//!   subscriptions

mod entity_cache;
mod keys;

pub use entity_cache::{
    CacheEvent, CacheEventKind, EntityCache, QuerySnapshot, QueryStatus, Subscription,
};
pub use keys::{KeyPrefix, QueryKey};
