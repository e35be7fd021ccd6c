use std::sync::Arc;

use mock_server::{MockState, ENDPOINT_PATH};
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let domain_count = std::env::var("DOMAIN_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, path = ENDPOINT_PATH, domain_count, "mock namecheap listening");

    let db = Arc::new(RwLock::new(MockState::with_domains(domain_count)));
    mock_server::run_with_state(listener, db).await
}
