//! Payment method endpoints.

use minimarket_core::PaymentMethod;
use reqwest::Method;
use tracing::{debug, instrument};

use crate::cache::{CacheKey, CacheValue};
use crate::{ApiClient, ApiError};

impl ApiClient {
    /// List payment methods as configured in the backend, inactive included.
    ///
    /// Cached for 60 seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    #[instrument(skip(self))]
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        if let Some(CacheValue::PaymentMethods(methods)) =
            self.cache().get(&CacheKey::PaymentMethods).await
        {
            debug!("Cache hit for payment methods");
            return Ok(methods);
        }

        let builder = self.request(Method::GET, "/metodos-pago/public", None);
        let methods: Vec<PaymentMethod> = self.execute_json(builder, false).await?;

        self.cache()
            .insert(
                CacheKey::PaymentMethods,
                CacheValue::PaymentMethods(methods.clone()),
            )
            .await;

        Ok(methods)
    }
}
