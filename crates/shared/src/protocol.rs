//! JSON bodies exchanged with the RSA gateway service.
//!
//! The gateway speaks camelCase field names; every operation is a `POST` under
//! [`API_BASE_PATH`]. Key generation takes no request body and answers with a
//! [`KeyPair`](crate::domain::KeyPair).

use serde::{Deserialize, Serialize};

pub const API_BASE_PATH: &str = "/api/rsa";
pub const GENERATE_KEYS_PATH: &str = "/api/rsa/generate-keys";
pub const ENCRYPT_PATH: &str = "/api/rsa/encrypt";
pub const DECRYPT_PATH: &str = "/api/rsa/decrypt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    pub public_key: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptResponse {
    pub encrypted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub private_key: String,
    pub encrypted_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub decrypted: String,
}
