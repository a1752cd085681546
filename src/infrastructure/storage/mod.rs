//! Object storage adapters.

pub mod fs_store;
pub mod memory_store;

pub use fs_store::FsObjectStore;
pub use memory_store::MemoryObjectStore;
