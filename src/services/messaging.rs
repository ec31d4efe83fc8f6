use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur when delivering outbound messages
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outgoing port for system-initiated messages
///
/// The engine owns no message entity; accepted match requests hand the
/// first-contact greeting to whatever chat backend the embedding app uses.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_greeting(&self, from: &str, to: &str, body: &str) -> Result<(), GatewayError>;
}

/// Default adapter: logs the greeting and succeeds
///
/// Useful for embeddings that wire chat delivery elsewhere.
#[derive(Debug, Default)]
pub struct LoggingGateway;

impl LoggingGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageGateway for LoggingGateway {
    async fn send_greeting(&self, from: &str, to: &str, body: &str) -> Result<(), GatewayError> {
        tracing::info!("Greeting from {} to {}: {}", from, to, body);
        Ok(())
    }
}

/// Adapter that records greetings for verification
pub struct RecordingGateway {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent_greetings(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send_greeting(&self, from: &str, to: &str, body: &str) -> Result<(), GatewayError> {
        self.sent
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string(), body.to_string()));
        Ok(())
    }
}
