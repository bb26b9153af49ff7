use anyhow::Context;

use storefront_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = ApiConfig::from_env().context("failed to load configuration")?;
    let app = storefront_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        page_limit_max = config.page_limit_max,
        sales_tax_rate = config.sales_tax_rate,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
