use crate::domain::model::{OrderReceipt, OrderRequest, Product};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote catalog/order service.
#[async_trait]
pub trait ShopApi: Send + Sync {
    async fn get_product_list(&self) -> Result<Vec<Product>>;
    async fn get_product_item(&self, id: &str) -> Result<Product>;
    async fn order_products(&self, order: &OrderRequest) -> Result<OrderReceipt>;
}

/// The single durable slot mirroring basket ids. Writes replace the whole value.
pub trait BasketStore {
    fn load(&self) -> Result<Option<Vec<String>>>;
    fn save(&self, items: &[String]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn cdn_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn basket_key(&self) -> &str;

    fn timeout_seconds(&self) -> Option<u64> {
        None
    }
}
