pub mod config_io;
pub mod memory_store;
pub mod recovery;
pub mod store;
pub mod watcher;
pub mod workspace;
