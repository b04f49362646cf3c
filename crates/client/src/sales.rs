//! Sale finalization.

use std::future::Future;

use minimarket_core::{SaleConfirmation, SaleRequest};
use reqwest::Method;
use tracing::instrument;

use crate::{ApiClient, ApiError};

/// Records sales in the backend.
///
/// Checkout depends on this trait rather than on [`ApiClient`] directly.
pub trait SalesGateway: Clone + Send + Sync + 'static {
    /// Submit a validated sale and return the backend's confirmation.
    fn finalize_sale(
        &self,
        request: &SaleRequest,
    ) -> impl Future<Output = Result<SaleConfirmation, ApiError>> + Send;
}

impl SalesGateway for ApiClient {
    #[instrument(skip(self, request), fields(items = request.items.len(), method_id = %request.metodo_pago_id))]
    async fn finalize_sale(&self, request: &SaleRequest) -> Result<SaleConfirmation, ApiError> {
        let builder = self.request(Method::POST, "/ventas", None).json(request);
        let confirmation: SaleConfirmation = self.execute_json(builder, false).await?;
        tracing::info!(sale_id = %confirmation.id, "Sale recorded");
        Ok(confirmation)
    }
}
