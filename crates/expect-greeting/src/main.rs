//! Greeting server
//!
//! Serves the greeting router on `EXPECT_GREETING_ADDR` (default `[::]:8080`).

use anyhow::Result;
use expect_greeting::{serve, ADDR_VAR, DEFAULT_ADDR};
use std::env;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = env::var(ADDR_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    serve(&addr).await?;

    Ok(())
}
