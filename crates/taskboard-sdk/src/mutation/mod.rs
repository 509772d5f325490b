//! Writes and the cache invalidation that follows them

mod executor;
mod request;

pub use executor::{MutationExecutor, MutationOutcome};
pub use request::Mutation;
