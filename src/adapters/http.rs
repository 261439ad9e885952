use crate::core::{ConfigProvider, ShopApi};
use crate::domain::model::{Category, OrderReceipt, OrderRequest, Product};
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Product as the API sends it: relative image path, nullable price.
#[derive(Debug, Deserialize)]
struct ProductDto {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    image: String,
    category: Category,
    price: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProductListDto {
    #[allow(dead_code)]
    total: Option<u64>,
    items: Vec<ProductDto>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

pub struct HttpShopApi {
    client: Client,
    base_url: String,
    cdn_url: String,
}

impl HttpShopApi {
    pub fn new(base_url: impl Into<String>, cdn_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, cdn_url)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        cdn_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cdn_url: cdn_url.into(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Ok(Self::with_client(
            builder.build()?,
            config.api_url(),
            config.cdn_url(),
        ))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute URLs pass through; anything else is appended to the CDN base.
    fn resolve_image(&self, image: &str) -> String {
        if Url::parse(image).is_ok() {
            return image.to_string();
        }
        format!(
            "{}/{}",
            self.cdn_url.trim_end_matches('/'),
            image.trim_start_matches('/')
        )
    }

    fn to_product(&self, dto: ProductDto) -> Product {
        Product {
            image: self.resolve_image(&dto.image),
            id: dto.id,
            title: dto.title,
            description: dto.description,
            category: dto.category,
            price: dto.price.unwrap_or(0),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });

        Err(ShopError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn get_product_list(&self) -> Result<Vec<Product>> {
        let url = self.endpoint("/product/");
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let list: ProductListDto = Self::read_json(response).await?;

        tracing::info!("📦 Fetched {} products", list.items.len());
        Ok(list
            .items
            .into_iter()
            .map(|dto| self.to_product(dto))
            .collect())
    }

    async fn get_product_item(&self, id: &str) -> Result<Product> {
        let url = self.endpoint(&format!("/product/{}", id));
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let dto: ProductDto = Self::read_json(response).await?;
        Ok(self.to_product(dto))
    }

    async fn order_products(&self, order: &OrderRequest) -> Result<OrderReceipt> {
        let url = self.endpoint("/order");
        tracing::debug!(
            "Submitting order with {} items (total {}) to: {}",
            order.items.len(),
            order.total,
            url
        );

        let response = self.client.post(&url).json(order).send().await?;
        let receipt: OrderReceipt = Self::read_json(response).await?;

        tracing::info!("🧾 Order {} accepted, total {}", receipt.order_id, receipt.total);
        Ok(receipt)
    }
}
