use anyhow::Context;
use hunter_proxy::{router, AppState, Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hunter_proxy=info,tower_http=debug".into()),
        )
        .init();

    info!("Starting Hunter proxy...");

    let config = Config::from_env()?;
    info!("Config loaded: {:?}", config);

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config).context("Failed to build Hunter client")?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("   GET/POST /email_verify                     - Verify an email");
    info!("   GET/POST /domain_search                    - Search a domain");
    info!("   GET      /{{email_verify|domain_search}}/results/:key");
    info!("   PUT      /{{email_verify|domain_search}}/update_results/:key");
    info!("   DELETE   /{{email_verify|domain_search}}/delete_results/:key");
    info!("   GET      /account                          - Account information");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
