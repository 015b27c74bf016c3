use std::sync::Arc;

use sayso::config::AppConfig;
use sayso::gateway::{SmsGateway, TwilioGateway};
use sayso::store::{Backend, HttpBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  Required: SUPABASE_URL, SUPABASE_ANON_KEY,");
        eprintln!("            TWILIO_SID, TWILIO_AUTH_TOKEN, TWILIO_NUMBER");
        eprintln!("  Optional: SUPABASE_SERVICE_ROLE_KEY, SAYSO_PORT");
        std::process::exit(1);
    });

    eprintln!("✨ sayso v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.backend_url);
    eprintln!("   Sending from: {}", config.gateway_number);
    eprintln!("   Webhook: http://0.0.0.0:{}/api/sms", config.port);
    eprintln!("   Health:  http://0.0.0.0:{}/health\n", config.port);

    // One client each, shared by every handler.
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config));
    let gateway: Arc<dyn SmsGateway> = Arc::new(TwilioGateway::new(&config));

    let app = sayso::app(backend, gateway);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "sayso server started");
    axum::serve(listener, app).await?;

    Ok(())
}
