mod connection;
mod kv_store;

pub use connection::SqliteStorage;
pub use kv_store::SqliteKeyValueStore;
