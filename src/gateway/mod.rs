//! Outbound SMS gateway.

pub mod recording;
pub mod twilio;

use async_trait::async_trait;

use crate::error::GatewayError;

/// Outbound SMS send. One operation: destination number and body text;
/// the sending number is fixed at construction.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), GatewayError>;
}

pub use recording::RecordingGateway;
pub use twilio::TwilioGateway;
