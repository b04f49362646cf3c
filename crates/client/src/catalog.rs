//! Product catalog endpoints.

use minimarket_core::{NewProduct, Product, ProductId};
use reqwest::Method;
use tracing::{debug, instrument};

use crate::cache::{CacheKey, CacheValue};
use crate::{ApiClient, ApiError, Credential};

/// Decode a product list, skipping entries that are not valid products.
///
/// Each skipped entry is logged with the reason.
pub(crate) fn parse_products(items: Vec<serde_json::Value>) -> Vec<Product> {
    items
        .into_iter()
        .filter_map(|item| {
            let id = item.get("id").cloned();
            match serde_json::from_value::<Product>(item) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(id = ?id, error = %e, "Skipping malformed product");
                    None
                }
            }
        })
        .collect()
}

impl ApiClient {
    /// List the public catalog.
    ///
    /// Cached for 60 seconds. Malformed products are dropped so they can
    /// never reach a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cache().get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let builder = self.request(Method::GET, "/productos", None);
        let items: Vec<serde_json::Value> = self.execute_json(builder, false).await?;
        let products = parse_products(items);

        self.cache()
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Look up a product in the public catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        Ok(self
            .list_products()
            .await?
            .into_iter()
            .find(|product| product.id == id))
    }

    /// Fetch one product with an authenticated call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with status 404 if it does not exist.
    #[instrument(skip(self, credential), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        credential: &Credential,
        id: ProductId,
    ) -> Result<Product, ApiError> {
        let builder = self.request(Method::GET, &format!("/productos/{id}"), Some(credential));
        self.execute_json(builder, true).await
    }

    /// Register a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, credential, product), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        credential: &Credential,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        let builder = self
            .request(Method::POST, "/productos", Some(credential))
            .json(product);
        let created: Product = self.execute_json(builder, true).await?;
        self.invalidate_products().await;
        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Replace a product's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, credential, product), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        credential: &Credential,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/productos/{id}"), Some(credential))
            .json(product);
        let updated: Product = self.execute_json(builder, true).await?;
        self.invalidate_products().await;
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the deletion.
    #[instrument(skip(self, credential), fields(product_id = %id))]
    pub async fn delete_product(&self, credential: &Credential, id: ProductId) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/productos/{id}"), Some(credential));
        self.execute(builder, true).await?;
        self.invalidate_products().await;
        tracing::info!("Product deleted");
        Ok(())
    }

    async fn invalidate_products(&self) {
        self.cache().invalidate(&CacheKey::Products).await;
    }
}
