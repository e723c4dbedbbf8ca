use crate::models::{Category, Product, SessionContext};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: backend rejected the session")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Product record as the backend sends it
///
/// Listing views send `price`, farmer inventory views send `quantity`;
/// both collapse into [`Product::price`].
#[derive(Debug, Deserialize)]
struct WireProduct {
    #[serde(rename = "productId")]
    product_id: i64,
    name: String,
    category: Category,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    available: Option<bool>,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Product {
            product_id: wire.product_id,
            name: wire.name,
            category: wire.category,
            price: wire.price.or(wire.quantity).unwrap_or(0.0),
            address: wire.address,
            latitude: wire.latitude,
            longitude: wire.longitude,
            available: wire.available.unwrap_or(true),
        }
    }
}

/// Marketplace REST backend client
///
/// Handles the product endpoints the browsing views depend on:
/// - Listing all products
/// - Listing a farmer's products
/// - Fetching a single product
pub struct MarketplaceClient {
    base_url: String,
    client: Client,
}

impl MarketplaceClient {
    /// Create a new backend client
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach the caller's identity to an outgoing request
    fn with_session(&self, request: RequestBuilder, session: &SessionContext) -> RequestBuilder {
        let request = match &session.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match &session.user_id {
            Some(user_id) => request.header("X-User-Id", user_id),
            None => request,
        }
    }

    /// Fetch all product listings
    pub async fn list_products(&self, session: &SessionContext) -> Result<Vec<Product>, BackendError> {
        let url = format!("{}/products", self.base_url);
        self.fetch_products(&url, session).await
    }

    /// Fetch the listings owned by one farmer
    pub async fn list_farmer_products(
        &self,
        session: &SessionContext,
        farmer_id: &str,
    ) -> Result<Vec<Product>, BackendError> {
        let url = format!(
            "{}/products/farmer/{}",
            self.base_url,
            urlencoding::encode(farmer_id)
        );
        self.fetch_products(&url, session).await
    }

    async fn fetch_products(&self, url: &str, session: &SessionContext) -> Result<Vec<Product>, BackendError> {
        tracing::debug!("Fetching products from: {}", url);

        let response = self
            .with_session(self.client.get(url), session)
            .send()
            .await?;

        check_status(response.status(), "list products")?;

        let json: Value = response.json().await?;

        // Either a bare array or `{"products": [...]}`
        let records = json
            .as_array()
            .or_else(|| json.get("products").and_then(|p| p.as_array()))
            .ok_or_else(|| BackendError::InvalidResponse("Missing products array".into()))?;

        let products: Vec<Product> = records
            .iter()
            .filter_map(|record| match serde_json::from_value::<WireProduct>(record.clone()) {
                Ok(wire) => Some(Product::from(wire)),
                Err(e) => {
                    tracing::warn!("Skipping malformed product record: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} products ({} records)", products.len(), records.len());

        Ok(products)
    }

    /// Fetch a single product by id
    pub async fn get_product(&self, session: &SessionContext, product_id: i64) -> Result<Product, BackendError> {
        let url = format!("{}/products/{}", self.base_url, product_id);

        let response = self
            .with_session(self.client.get(&url), session)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(format!("Product {} not found", product_id)));
        }
        check_status(response.status(), "get product")?;

        let wire: WireProduct = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse product: {}", e)))?;

        Ok(wire.into())
    }

    /// Probe the backend; any successful response counts as healthy
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/products", self.base_url);
        match self.client.head(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Backend health probe failed: {}", e);
                false
            }
        }
    }
}

fn check_status(status: StatusCode, action: &str) -> Result<(), BackendError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BackendError::Unauthorized);
    }
    if !status.is_success() {
        return Err(BackendError::ApiError(format!("Failed to {}: {}", action, status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_slash() {
        let client = MarketplaceClient::new(
            "https://market.test/api/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url(), "https://market.test/api");
    }

    #[test]
    fn test_quantity_adapts_to_price() {
        let wire: WireProduct = serde_json::from_str(
            r#"{"productId": 3, "name": "Ghee", "category": "dairyProducts", "quantity": 12}"#,
        )
        .unwrap();

        let product = Product::from(wire);
        assert_eq!(product.price, 12.0);
        assert!(product.available);
    }

    #[test]
    fn test_price_wins_over_quantity() {
        let wire: WireProduct = serde_json::from_str(
            r#"{"productId": 3, "name": "Ghee", "category": "dairyProducts", "price": 450, "quantity": 12}"#,
        )
        .unwrap();

        assert_eq!(Product::from(wire).price, 450.0);
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK, "x").is_ok());
        assert!(matches!(check_status(StatusCode::FORBIDDEN, "x"), Err(BackendError::Unauthorized)));
        assert!(matches!(check_status(StatusCode::BAD_GATEWAY, "x"), Err(BackendError::ApiError(_))));
    }
}
