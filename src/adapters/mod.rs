// Adapters layer: concrete implementations for external systems.

pub mod http;
pub mod storage;

pub use http::HttpShopApi;
pub use storage::{LocalStorage, MemoryStorage};
