//! Data gateways
//!
//! - `traits`: the `Gateway` seam consumed by the cache and executor
//! - `http`: REST implementation over `taskboard-client`
//! - `mock`: in-memory implementation for tests

mod http;
mod mock;
mod traits;

pub use http::HttpGateway;
pub use mock::MockGateway;
pub use traits::Gateway;
