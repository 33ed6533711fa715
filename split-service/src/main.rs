use service_core::observability::init_tracing;
use split_service::config::SplitConfig;
use split_service::services::init_metrics;
use split_service::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SplitConfig::load()?;

    init_tracing(
        "split-service",
        &config.common.log_level,
        config.common.log_format,
        config.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics();

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start split service: {}", e);
        e
    })?;
    application.run_until_stopped().await?;

    Ok(())
}
