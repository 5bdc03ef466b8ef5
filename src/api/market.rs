//! Market quote endpoint.

use crate::api::client::ApiClient;
use crate::core::envelope::ApiError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub change_pct: Option<f64>,
}

pub async fn fetch_quotes(client: &ApiClient, symbols: &[String]) -> Result<Vec<Quote>, ApiError> {
    let joined = symbols.join(",");
    client
        .get(&format!("/market/quotes/?symbols={joined}"))
        .await
        .decode()
}
