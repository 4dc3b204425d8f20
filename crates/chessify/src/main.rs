use chessify::prelude::*;
use tracing_subscriber::EnvFilter;

/// Listen address used when `CHESSIFY_ADDR` is unset.
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), ChessifyError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = std::env::var("CHESSIFY_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let server = ChessifyServerBuilder::new()
        .bind(&addr)
        .build::<StandardChess>()
        .await?;
    let local = server.local_addr().map_err(TransportError::BindFailed)?;
    tracing::info!(%local, "chessify listening");

    server.run().await
}
