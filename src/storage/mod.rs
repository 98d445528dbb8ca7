pub mod traits;
pub mod memory;
pub mod sqlite;
pub mod state;

pub use traits::KeyValueStore;
pub use memory::MemoryStore;
pub use sqlite::{SqliteKeyValueStore, SqliteStorage};
pub use state::StateStore;
