//! Crypto asset endpoint.

use crate::api::client::ApiClient;
use crate::core::envelope::ApiError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CryptoAsset {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub change_24h: Option<f64>,
    /// Units held; absent for watch-only assets.
    #[serde(default)]
    pub units: Option<f64>,
}

impl CryptoAsset {
    pub fn value(&self) -> Option<f64> {
        self.units.map(|units| units * self.price)
    }
}

pub async fn fetch_assets(client: &ApiClient) -> Result<Vec<CryptoAsset>, ApiError> {
    client.get("/crypto/assets/").await.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/crypto/assets/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"symbol": "BTC", "name": "Bitcoin", "price": 64000.0,
                 "change_24h": 2.1, "units": 0.05},
                {"symbol": "ETH", "price": 3100.0}
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None);
        let assets = fetch_assets(&client).await.unwrap();

        assert_eq!(assets.len(), 2);
        let value = assets[0].value().unwrap();
        assert!((value - 3200.0).abs() < 1e-6);
        assert!(assets[1].value().is_none());
    }
}
