//! Investment holdings endpoint.

use crate::api::client::ApiClient;
use crate::core::envelope::ApiError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Holding {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub units: f64,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub change_pct: Option<f64>,
}

impl Holding {
    pub fn value(&self) -> f64 {
        self.units * self.price
    }
}

pub async fn fetch_holdings(client: &ApiClient) -> Result<Vec<Holding>, ApiError> {
    client.get("/investments/holdings/").await.decode()
}
