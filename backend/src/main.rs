use anyhow::Result;
use tracing::info;

use khata_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khata_backend=info,tower_http=info".into()),
        )
        .init();

    info!("Starting Khata backend server");

    let app_state = initialize_backend()?;
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    info!("Server listening on http://127.0.0.1:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
