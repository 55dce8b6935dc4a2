//! Client-side core for the RSA gateway front end: gateway transport, session state,
//! event log and the workflow that ties them together.

pub mod error;
pub mod event_log;
pub mod gateway;
pub mod session;
pub mod workflow;

pub use error::GatewayError;
pub use event_log::{EventLog, LogEntry, LogExport, EVENT_LOG_CAPACITY, LOG_EXPORT_FILE_NAME};
pub use gateway::{CryptoGateway, HttpGateway};
pub use session::{Session, SessionField};
pub use workflow::{Clipboard, Notice, NoticeLevel, Operation, Outcome, Report, Workflow};

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod gateway_tests;
