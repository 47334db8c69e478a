// crates/server/src/main.rs
//! docflow server binary.
//!
//! Builds the application state, binds the listener, and serves until
//! killed. Jobs live only in process memory; a restart starts empty.

use std::net::SocketAddr;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use docflow_server::create_app;

/// Default port for the server.
const DEFAULT_PORT: u16 = 8000;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("DOCFLOW_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    eprintln!("\ndocflow v{}\n", env!("CARGO_PKG_VERSION"));

    let app = create_app();

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!("  \u{2192} http://localhost:{}\n", port);
    tracing::info!(port, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_port_default() {
        // Neither env var is set under `cargo test`.
        if std::env::var("DOCFLOW_PORT").is_err() && std::env::var("PORT").is_err() {
            assert_eq!(get_port(), DEFAULT_PORT);
        }
    }
}
