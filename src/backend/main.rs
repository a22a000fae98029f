/**
 * Anonymous Feedback Server Entry Point
 *
 * Loads `.env`, installs the tracing subscriber, validates settings and
 * serves the Axum app.
 */

use anonbox::backend::server::{config::Settings, create_app};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,anonbox=debug"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = Settings::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app = create_app(settings).await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
