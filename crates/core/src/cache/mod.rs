mod error;
mod events;
mod keys;
mod serialization;

pub use error::{CacheError, Result};
pub use events::SyncEvent;
pub use keys::{EntityKind, QueryKey};
pub use serialization::{from_cache_bytes, to_cache_bytes};
