//! Orchestrates user-triggered operations across the gateway, the session and the event log.
//!
//! Every gateway operation performs one request, at most one session update and exactly one
//! log append. State sits behind an async mutex that is released while the request is in
//! flight, so several operations may overlap. Each operation takes a ticket before
//! suspending; a response whose ticket has been overtaken by a newer operation of the same
//! kind, by a key change, or (for decryption) by a ciphertext change, is discarded instead of
//! being applied.

use shared::domain::AuthorizationStatus;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    event_log::{EventLog, LogEntry, LogExport},
    gateway::CryptoGateway,
    session::{Session, SessionField},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GenerateKeys,
    Encrypt,
    Decrypt,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::GenerateKeys => "generate_keys",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::GenerateKeys => 0,
            Self::Encrypt => 1,
            Self::Decrypt => 2,
        }
    }

    fn depends_on_keys(self) -> bool {
        !matches!(self, Self::GenerateKeys)
    }

    fn depends_on_ciphertext(self) -> bool {
        matches!(self, Self::Decrypt)
    }

    fn success_event(self) -> &'static str {
        match self {
            Self::GenerateKeys => "New RSA key pair generated.",
            Self::Encrypt => "Encryption request granted.",
            Self::Decrypt => "Decryption successful.",
        }
    }

    fn failure_event(self) -> &'static str {
        match self {
            Self::GenerateKeys => "RSA key generation failed.",
            Self::Encrypt => "Encryption attempt blocked.",
            Self::Decrypt => "Unauthorized decryption attempt.",
        }
    }

    fn superseded_event(self) -> &'static str {
        match self {
            Self::GenerateKeys => "Key generation response discarded (superseded).",
            Self::Encrypt => "Encryption response discarded (superseded).",
            Self::Decrypt => "Decryption response discarded (superseded).",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed { reason: String },
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Short-lived, user-facing notification for the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: &'static str,
}

impl Notice {
    fn success(text: &'static str) -> Self {
        Self {
            level: NoticeLevel::Success,
            text,
        }
    }

    fn error(text: &'static str) -> Self {
        Self {
            level: NoticeLevel::Error,
            text,
        }
    }

    fn info(text: &'static str) -> Self {
        Self {
            level: NoticeLevel::Info,
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub operation: Operation,
    pub outcome: Outcome,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }

    pub fn notice(&self) -> Notice {
        match (&self.outcome, self.operation) {
            (Outcome::Succeeded, Operation::GenerateKeys) => Notice::success("RSA keys generated!"),
            (Outcome::Succeeded, Operation::Encrypt) => Notice::success("Message encrypted!"),
            (Outcome::Succeeded, Operation::Decrypt) => Notice::success("Message decrypted!"),
            (Outcome::Failed { .. }, Operation::GenerateKeys) => {
                Notice::error("Failed to generate keys")
            }
            (Outcome::Failed { .. }, Operation::Encrypt) => Notice::error("Encryption failed"),
            (Outcome::Failed { .. }, Operation::Decrypt) => Notice::error("Decryption failed"),
            (Outcome::Superseded, _) => Notice::info("Outdated response ignored"),
        }
    }
}

/// Host capability for placing text on the system clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    operation: Operation,
    sequence: u64,
    key_epoch: u64,
    ciphertext_epoch: u64,
}

#[derive(Debug, Default)]
struct WorkflowState {
    session: Session,
    log: EventLog,
    key_epoch: u64,
    ciphertext_epoch: u64,
    issued: [u64; 3],
}

impl WorkflowState {
    fn issue(&mut self, operation: Operation) -> Ticket {
        let slot = &mut self.issued[operation.index()];
        *slot += 1;
        Ticket {
            operation,
            sequence: *slot,
            key_epoch: self.key_epoch,
            ciphertext_epoch: self.ciphertext_epoch,
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        let latest = self.issued[ticket.operation.index()] == ticket.sequence;
        let keys_unchanged =
            !ticket.operation.depends_on_keys() || ticket.key_epoch == self.key_epoch;
        let ciphertext_unchanged = !ticket.operation.depends_on_ciphertext()
            || ticket.ciphertext_epoch == self.ciphertext_epoch;
        latest && keys_unchanged && ciphertext_unchanged
    }

    fn keys_changed(&mut self) {
        self.key_epoch += 1;
    }

    fn ciphertext_changed(&mut self) {
        self.ciphertext_epoch += 1;
    }

    fn supersede(&mut self, ticket: Ticket) -> Report {
        debug!(
            operation = ticket.operation.name(),
            sequence = ticket.sequence,
            "discarding superseded gateway response"
        );
        self.log.append(ticket.operation.superseded_event());
        Report {
            operation: ticket.operation,
            outcome: Outcome::Superseded,
        }
    }

    fn succeed(&mut self, operation: Operation) -> Report {
        info!(operation = operation.name(), "gateway operation succeeded");
        self.log.append(operation.success_event());
        Report {
            operation,
            outcome: Outcome::Succeeded,
        }
    }

    fn fail(&mut self, operation: Operation, reason: String) -> Report {
        warn!(operation = operation.name(), %reason, "gateway operation failed");
        self.log.append(operation.failure_event());
        Report {
            operation,
            outcome: Outcome::Failed { reason },
        }
    }
}

pub struct Workflow<G> {
    gateway: G,
    state: Mutex<WorkflowState>,
}

impl<G: CryptoGateway> Workflow<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Session start: requests the first key pair exactly as a user-triggered generate would.
    pub async fn start(&self) -> Report {
        info!("starting RSA session");
        self.generate_keys().await
    }

    pub async fn generate_keys(&self) -> Report {
        let ticket = self.state.lock().await.issue(Operation::GenerateKeys);
        let result = self.gateway.generate_keys().await;

        let mut state = self.state.lock().await;
        if !state.is_current(&ticket) {
            return state.supersede(ticket);
        }
        match result {
            Ok(pair) => {
                state.session.install_key_pair(pair);
                state.keys_changed();
                state.ciphertext_changed();
                state.succeed(ticket.operation)
            }
            Err(err) => state.fail(ticket.operation, err.to_string()),
        }
    }

    pub async fn encrypt(&self) -> Report {
        let (ticket, public_key, message) = {
            let mut state = self.state.lock().await;
            let ticket = state.issue(Operation::Encrypt);
            (
                ticket,
                state.session.public_key().to_string(),
                state.session.message().to_string(),
            )
        };
        let result = self.gateway.encrypt(&public_key, &message).await;

        let mut state = self.state.lock().await;
        if !state.is_current(&ticket) {
            return state.supersede(ticket);
        }
        match result {
            Ok(ciphertext) => {
                state.session.record_encryption_success(ciphertext);
                state.ciphertext_changed();
                state.succeed(ticket.operation)
            }
            Err(err) => {
                state.session.record_encryption_failure();
                state.fail(ticket.operation, err.to_string())
            }
        }
    }

    pub async fn decrypt(&self) -> Report {
        let (ticket, private_key, ciphertext) = {
            let mut state = self.state.lock().await;
            let ticket = state.issue(Operation::Decrypt);
            (
                ticket,
                state.session.private_key().to_string(),
                state.session.encrypted().to_string(),
            )
        };
        let result = self.gateway.decrypt(&private_key, &ciphertext).await;

        let mut state = self.state.lock().await;
        if !state.is_current(&ticket) {
            return state.supersede(ticket);
        }
        match result {
            Ok(plaintext) => {
                state.session.record_decryption_success(plaintext);
                state.succeed(ticket.operation)
            }
            Err(err) => {
                state.session.record_decryption_failure();
                state.fail(ticket.operation, err.to_string())
            }
        }
    }

    pub async fn set_message(&self, text: impl Into<String>) {
        self.state.lock().await.session.set_message(text);
    }

    pub async fn set_encrypted_input(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.state.lock().await;
        if state.session.encrypted() != text {
            state.session.set_encrypted_input(text);
            state.ciphertext_changed();
        }
    }

    pub async fn set_public_key(&self, key: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.session.set_public_key(key);
        state.keys_changed();
    }

    pub async fn set_private_key(&self, key: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.session.set_private_key(key);
        state.keys_changed();
    }

    /// Copies one session field verbatim to the host clipboard. Neither the session nor the
    /// event log is touched.
    pub async fn copy(&self, field: SessionField, clipboard: &mut dyn Clipboard) -> Notice {
        let text = self.state.lock().await.session.field(field).to_string();
        match clipboard.write_text(&text) {
            Ok(()) => Notice::success("Copied to clipboard"),
            Err(err) => {
                warn!(field = field.label(), error = %err, "clipboard write failed");
                Notice::error("Copy to clipboard failed")
            }
        }
    }

    pub async fn export_logs(&self) -> LogExport {
        LogExport::from_log(&self.state.lock().await.log)
    }

    pub async fn session(&self) -> Session {
        self.state.lock().await.session.clone()
    }

    pub async fn log_snapshot(&self) -> Vec<LogEntry> {
        self.state.lock().await.log.snapshot()
    }

    pub async fn authorization_status(&self) -> AuthorizationStatus {
        self.state.lock().await.session.authorization_status()
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
