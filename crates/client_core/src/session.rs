//! In-memory working set for a single RSA session.

use std::fmt;

use shared::domain::{AuthorizationStatus, KeyPair};

/// One of the five text fields a user can inspect or copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionField {
    PublicKey,
    PrivateKey,
    Message,
    Encrypted,
    Decrypted,
}

impl SessionField {
    pub const ALL: [SessionField; 5] = [
        Self::PublicKey,
        Self::PrivateKey,
        Self::Message,
        Self::Encrypted,
        Self::Decrypted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PublicKey => "public key",
            Self::PrivateKey => "private key",
            Self::Message => "message",
            Self::Encrypted => "encrypted",
            Self::Decrypted => "decrypted",
        }
    }
}

impl fmt::Display for SessionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key pair, plaintext, ciphertext and recovered plaintext, plus the derived firewall status.
///
/// Downstream values never outlive what they were derived from: installing a key pair
/// clears the message, ciphertext and decryption together, and any change to the
/// ciphertext clears the decryption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    public_key: String,
    private_key: String,
    message: String,
    encrypted: String,
    decrypted: String,
    authorization: AuthorizationStatus,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_key_pair(&mut self, pair: KeyPair) {
        self.public_key = pair.public_key;
        self.private_key = pair.private_key;
        self.message.clear();
        self.encrypted.clear();
        self.decrypted.clear();
        self.authorization = AuthorizationStatus::Idle;
    }

    pub fn set_public_key(&mut self, key: impl Into<String>) {
        self.public_key = key.into();
    }

    pub fn set_private_key(&mut self, key: impl Into<String>) {
        self.private_key = key.into();
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = text.into();
    }

    pub fn record_encryption_success(&mut self, ciphertext: impl Into<String>) {
        self.encrypted = ciphertext.into();
        self.decrypted.clear();
        self.authorization = AuthorizationStatus::Authorized;
    }

    pub fn record_encryption_failure(&mut self) {
        self.authorization = AuthorizationStatus::Unauthorized;
    }

    /// Manual edit of the ciphertext from the decrypt surface. A changed ciphertext has no
    /// decryption yet, so the recovered plaintext is dropped.
    pub fn set_encrypted_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.encrypted {
            self.encrypted = text;
            self.decrypted.clear();
        }
    }

    pub fn record_decryption_success(&mut self, plaintext: impl Into<String>) {
        self.decrypted = plaintext.into();
    }

    // Decryption failures leave the firewall status alone, unlike encryption failures.
    pub fn record_decryption_failure(&mut self) {}

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn encrypted(&self) -> &str {
        &self.encrypted
    }

    pub fn decrypted(&self) -> &str {
        &self.decrypted
    }

    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.authorization
    }

    pub fn field(&self, field: SessionField) -> &str {
        match field {
            SessionField::PublicKey => &self.public_key,
            SessionField::PrivateKey => &self.private_key,
            SessionField::Message => &self.message,
            SessionField::Encrypted => &self.encrypted,
            SessionField::Decrypted => &self.decrypted,
        }
    }
}
