use std::sync::Arc;

use axum::routing::get;
use axum::Json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use intake_api::config::AppConfig;
use intake_api::contact::contact_routes;
use intake_api::email::{EmailConfig, HttpMailer};
use intake_api::gateway::GatewayClient;
use intake_api::intake::{IntakeState, TokenService, intake_routes};
use intake_api::waiting_list::{MailerHandle, WaitingListState, waiting_list_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("Intake API v{}", env!("CARGO_PKG_VERSION"));

    let tokens = Arc::new(TokenService::new(&config.jwt_secret));

    let gateway = GatewayClient::from_env();
    match &gateway {
        Some(client) => eprintln!("   Gateway: {}", client.base_url()),
        None => eprintln!("   Gateway: not configured (submit/status will fail)"),
    }

    let mail = EmailConfig::from_env().map(|email_config| {
        eprintln!("   Email: enabled (from: {})", email_config.from_address);
        MailerHandle {
            mailer: Arc::new(HttpMailer::new(&email_config)),
            from_address: email_config.from_address,
            admin_address: email_config.admin_address,
        }
    });
    if mail.is_none() {
        eprintln!("   Email: disabled (waiting-list will report 503)");
    }

    let app = intake_routes(IntakeState {
        tokens,
        gateway,
    })
    .merge(contact_routes())
    .merge(waiting_list_routes(WaitingListState { mail }))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    eprintln!("   Listening: http://0.0.0.0:{}\n", config.port);
    tracing::info!(port = config.port, "intake API started");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "intake-api"
    }))
}
