pub mod events;
pub mod state;

pub use crate::domain::model::{OrderDraft, OrderField, PaymentMethod, Product, ValidationErrors};
pub use crate::domain::ports::{BasketStore, ConfigProvider, ShopApi};
pub use crate::utils::error::Result;
pub use events::{names, Event, EventBroker, Handler, Payload, Topic};
pub use state::AppState;
