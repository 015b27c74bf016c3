//! Environment configuration.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Service configuration, read once at startup and shared by handlers.
///
/// Handlers never rebuild clients from the environment; everything they
/// need is constructed from this struct and injected via router state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend (e.g. `https://xyz.supabase.co`).
    pub backend_url: String,
    /// API key used for backend table/storage access.
    ///
    /// Selection rule: the service-role key when present (webhook writes
    /// bypass row-level security), otherwise the anon key.
    pub backend_key: SecretString,
    /// Anon key, always required — used for auth requests made on behalf
    /// of a browser session (magic-link sign-in).
    pub anon_key: SecretString,
    /// SMS gateway account SID.
    pub gateway_sid: String,
    /// SMS gateway auth token.
    pub gateway_token: SecretString,
    /// Phone number outbound SMS are sent from.
    pub gateway_number: String,
    /// Port the HTTP server listens on.
    pub port: u16,
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// Any missing backend or gateway variable is fatal: the webhook cannot
    /// function without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = require("SUPABASE_URL")?;
        let anon_key = require("SUPABASE_ANON_KEY")?;
        let backend_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .unwrap_or_else(|_| anon_key.clone());

        let port = match std::env::var("SAYSO_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SAYSO_PORT".to_string(),
                message: format!("not a port number: {raw}"),
            })?,
            Err(_) => 3000,
        };

        Ok(Self {
            backend_url,
            backend_key: SecretString::from(backend_key),
            anon_key: SecretString::from(anon_key),
            gateway_sid: require("TWILIO_SID")?,
            gateway_token: SecretString::from(require("TWILIO_AUTH_TOKEN")?),
            gateway_number: require("TWILIO_NUMBER")?,
            port,
        })
    }
}
