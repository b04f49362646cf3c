//! Dashboard summary endpoint.

use minimarket_core::report::DashboardSummary;
use reqwest::Method;
use tracing::instrument;

use crate::{ApiClient, ApiError, Credential};

impl ApiClient {
    /// Fetch the dashboard metrics and low-stock list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired and
    /// [`ApiError::Forbidden`] for roles other than `ADMIN`.
    #[instrument(skip(self, credential))]
    pub async fn dashboard_summary(
        &self,
        credential: &Credential,
    ) -> Result<DashboardSummary, ApiError> {
        let builder = self.request(Method::GET, "/dashboard/resumen", Some(credential));
        self.execute_json(builder, true).await
    }
}
