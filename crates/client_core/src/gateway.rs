//! HTTP client for the remote RSA gateway.
//!
//! The gateway owns all cryptography. This module only moves opaque strings back and forth,
//! so none of its operations touch session or log state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::KeyPair,
    protocol::{
        DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, DECRYPT_PATH,
        ENCRYPT_PATH, GENERATE_KEYS_PATH,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::error::GatewayError;

#[async_trait]
pub trait CryptoGateway: Send + Sync {
    async fn generate_keys(&self) -> Result<KeyPair, GatewayError>;
    async fn encrypt(&self, public_key: &str, message: &str) -> Result<String, GatewayError>;
    async fn decrypt(&self, private_key: &str, ciphertext: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_client(base_url, Client::new())
    }

    /// Builds a gateway whose requests give up after `timeout`. Without one the transport
    /// default applies and a hung request waits indefinitely.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| GatewayError::Transport {
                endpoint: "client",
                source,
            })?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self, GatewayError> {
        let parsed = Url::parse(base_url).map_err(|source| GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, endpoint: &'static str, body: Option<&B>) -> Result<R, GatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.http.post(format!("{}{endpoint}", self.base_url));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            warn!(endpoint, error = %source, "gateway unreachable");
            GatewayError::Transport { endpoint, source }
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, %status, "gateway rejected request");
            return Err(GatewayError::Rejected {
                endpoint,
                status: status.as_u16(),
            });
        }
        debug!(endpoint, %status, "gateway request completed");

        response
            .json::<R>()
            .await
            .map_err(|source| GatewayError::Decode { endpoint, source })
    }
}

#[async_trait]
impl CryptoGateway for HttpGateway {
    async fn generate_keys(&self) -> Result<KeyPair, GatewayError> {
        self.post::<(), KeyPair>(GENERATE_KEYS_PATH, None).await
    }

    async fn encrypt(&self, public_key: &str, message: &str) -> Result<String, GatewayError> {
        let body = EncryptRequest {
            public_key: public_key.to_string(),
            message: message.to_string(),
        };
        let res: EncryptResponse = self.post(ENCRYPT_PATH, Some(&body)).await?;
        Ok(res.encrypted)
    }

    async fn decrypt(&self, private_key: &str, ciphertext: &str) -> Result<String, GatewayError> {
        let body = DecryptRequest {
            private_key: private_key.to_string(),
            encrypted_message: ciphertext.to_string(),
        };
        let res: DecryptResponse = self.post(DECRYPT_PATH, Some(&body)).await?;
        Ok(res.decrypted)
    }
}
