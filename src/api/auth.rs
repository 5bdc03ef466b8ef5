//! Authentication endpoints.

use crate::api::client::ApiClient;
use crate::core::envelope::ApiError;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access")]
    pub token: String,
    #[serde(default)]
    pub premium: Option<bool>,
}

pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    client
        .post(
            "/auth/login/",
            &json!({"username": username, "password": password}),
        )
        .await
        .decode()
}

pub async fn refresh(client: &ApiClient, token: &str) -> Result<LoginResponse, ApiError> {
    client
        .post("/auth/refresh/", &json!({"token": token}))
        .await
        .decode()
}

pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let envelope = client.post("/auth/logout/", &json!({})).await;
    if envelope.success {
        Ok(())
    } else {
        Err(envelope.decode::<serde_json::Value>().unwrap_err())
    }
}
