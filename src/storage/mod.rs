//! Persistence layer — key-value storage behind the session store.

pub mod file;
pub mod libsql_backend;
pub mod memory;
pub mod traits;

pub use file::JsonFileStore;
pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
