mod db;
mod memory;
mod store;

pub use db::LocalStorage;
pub use memory::MemoryStore;
pub use store::{KeyValueStore, StoreError};
