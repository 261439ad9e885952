pub mod adapters;
pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpShopApi, LocalStorage, MemoryStorage};
pub use app::Presenter;
pub use config::ShopConfig;
pub use core::{AppState, EventBroker};
pub use utils::error::{Result, ShopError};
