pub mod storage;

pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, KEY_TOKEN, KEY_USER};
