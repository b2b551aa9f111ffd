//! A bounded, fixed-capacity session cache for a TLS server: an in-place,
//! dual-indexed (LRU list + ordered tree) structure over a single
//! caller-supplied byte region, with a DoS-resistant keyed-MAC index so an
//! attacker replaying chosen session IDs cannot steer tree shape.

pub mod cache;
pub mod context;
pub mod entry;
pub mod error;
pub mod lru;
pub mod mask;
pub mod store;
mod tree;

pub use cache::{SessionCache, SessionParams};
pub use context::{HashAlgorithm, OsServerContext, ServerContext};
pub use entry::{MASTER_SECRET_LEN, NULL_ADDR, SESSION_ID_LEN};
pub use error::RngError;

pub use log::{debug, info, warn};
