//! Sales and inventory report endpoints.
//!
//! Range-based reports send `inicio`/`fin` as full-day timestamps built by
//! [`DateRange`].

use minimarket_core::report::{
    DailySales, DateRange, ExportKind, InventoryStats, PaymentMethodSales, SellerSales,
    TodaySummary, TopProduct,
};
use reqwest::{Method, RequestBuilder};
use tracing::instrument;

use crate::{ApiClient, ApiError, Credential};

fn with_range(builder: RequestBuilder, range: &DateRange) -> RequestBuilder {
    builder.query(&[("inicio", range.start_param()), ("fin", range.end_param())])
}

impl ApiClient {
    /// Daily sales in a date range.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired and
    /// [`ApiError::Forbidden`] if the user's roles may not read reports.
    #[instrument(skip(self, credential))]
    pub async fn sales_by_range(
        &self,
        credential: &Credential,
        range: &DateRange,
    ) -> Result<Vec<DailySales>, ApiError> {
        let builder = with_range(
            self.request(Method::GET, "/reportes/rango", Some(credential)),
            range,
        );
        self.execute_json(builder, true).await
    }

    /// Best-selling products in a date range.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired.
    #[instrument(skip(self, credential))]
    pub async fn top_products(
        &self,
        credential: &Credential,
        range: &DateRange,
        limit: u32,
    ) -> Result<Vec<TopProduct>, ApiError> {
        let builder = with_range(
            self.request(Method::GET, "/reportes/productos/top", Some(credential)),
            range,
        )
        .query(&[("limite", limit)]);
        self.execute_json(builder, true).await
    }

    /// Sales per seller in a date range.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired.
    #[instrument(skip(self, credential))]
    pub async fn sales_by_seller(
        &self,
        credential: &Credential,
        range: &DateRange,
    ) -> Result<Vec<SellerSales>, ApiError> {
        let builder = with_range(
            self.request(Method::GET, "/reportes/vendedores", Some(credential)),
            range,
        );
        self.execute_json(builder, true).await
    }

    /// Collected amounts per payment method in a date range.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired.
    #[instrument(skip(self, credential))]
    pub async fn sales_by_payment_method(
        &self,
        credential: &Credential,
        range: &DateRange,
    ) -> Result<Vec<PaymentMethodSales>, ApiError> {
        let builder = with_range(
            self.request(Method::GET, "/reportes/metodos-pago", Some(credential)),
            range,
        );
        self.execute_json(builder, true).await
    }

    /// Current stock statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired.
    #[instrument(skip(self, credential))]
    pub async fn inventory_stats(&self, credential: &Credential) -> Result<InventoryStats, ApiError> {
        let builder = self.request(
            Method::GET,
            "/reportes/inventario/estadisticas",
            Some(credential),
        );
        self.execute_json(builder, true).await
    }

    /// Today's sales summary.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired.
    #[instrument(skip(self, credential))]
    pub async fn today_summary(&self, credential: &Credential) -> Result<TodaySummary, ApiError> {
        let builder = self.request(Method::GET, "/reportes/resumen/hoy", Some(credential));
        self.execute_json(builder, true).await
    }

    /// Download a spreadsheet export.
    ///
    /// `range` and `limit` are only sent for the kinds that use them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the credential has expired.
    #[instrument(skip(self, credential))]
    pub async fn export_report(
        &self,
        credential: &Credential,
        kind: ExportKind,
        range: &DateRange,
        limit: u32,
    ) -> Result<Vec<u8>, ApiError> {
        let path = format!("/reportes/exportar/{}/excel", kind.slug());
        let mut builder = self.request(Method::GET, &path, Some(credential));
        if kind.uses_range() {
            builder = with_range(builder, range);
        }
        if kind == ExportKind::TopProducts {
            builder = builder.query(&[("limite", limit)]);
        }

        let response = self.execute(builder, true).await?;
        let bytes = response.bytes().await?;
        tracing::info!(size = bytes.len(), "Report exported");
        Ok(bytes.to_vec())
    }
}
