pub mod memory;
pub mod traits;

pub use memory::{InMemoryStore, SnapshotFile};
pub use traits::ListingStore;
