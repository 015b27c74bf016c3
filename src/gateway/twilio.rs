//! Twilio gateway — posts to the Messages API with basic auth.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::AppConfig;
use crate::error::GatewayError;
use crate::gateway::SmsGateway;

/// Twilio REST client. No retries: a failed send is reported once and
/// the caller decides whether the failure is visible.
pub struct TwilioGateway {
    client: reqwest::Client,
    account_sid: String,
    auth_token: SecretString,
    from_number: String,
}

impl TwilioGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: config.gateway_sid.clone(),
            auth_token: config.gateway_token.clone(),
            from_number: config.gateway_number.clone(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        let params = [("To", to), ("From", &self.from_number), ("Body", body)];
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError::SendFailed {
                to: to.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::AuthFailed(format!(
                "account {}",
                self.account_sid
            )));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::SendFailed {
                to: to.to_string(),
                reason: format!("{status}: {text}"),
            });
        }
        Ok(())
    }
}
