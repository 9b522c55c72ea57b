mod config;

use anyhow::Context;
use common::postgres::{PostgresClient, PostgresSpeciesLoginRepository};
use common::redis::RedisClient;
use common::telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig, TelemetryProviders};
use config::ServiceConfig;
use pot_runner::Runner;
use respawn_worker::RespawnWorker;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    // Initialize configuration and tracing
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry (tracing + OpenTelemetry for traces and logs)
    let telemetry_providers: Option<TelemetryProviders> = match init_telemetry(&TelemetryConfig {
        service_name: config.otel_service_name.clone(),
        otel_endpoint: config.otel_endpoint.clone(),
        otel_enabled: config.otel_enabled,
        log_level: config.log_level.clone(),
    }) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        otel_enabled = config.otel_enabled,
        otel_endpoint = %config.otel_endpoint,
        "Starting pot-all-in-one service"
    );
    debug!("Configuration: {:?}", config);

    let (postgres_client, redis_client) = match initialize_shared_dependencies(&config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!("Failed to initialize shared dependencies: {:#}", e);
            shutdown_telemetry(telemetry_providers);
            std::process::exit(1);
        }
    };

    let repository = Arc::new(PostgresSpeciesLoginRepository::new(postgres_client.clone()));
    let respawn_worker = RespawnWorker::new(redis_client, repository);

    let runner = Runner::new()
        .with_named_process("respawn_worker", respawn_worker.into_runner_process())
        .with_closer(move || {
            Box::pin(async move {
                info!("Running cleanup tasks...");
                postgres_client.close();

                // Shutdown telemetry and flush pending traces and logs
                shutdown_telemetry(telemetry_providers);

                info!("Cleanup complete");
                Ok(())
            })
        })
        .with_closer_timeout(Duration::from_secs(10));

    // Run the service
    runner.run().await;
}

async fn initialize_shared_dependencies(
    config: &ServiceConfig,
) -> anyhow::Result<(PostgresClient, Arc<RedisClient>)> {
    let startup_timeout = Duration::from_secs(config.startup_timeout_secs);

    // PostgreSQL initialization
    info!("Initializing PostgreSQL...");
    let postgres_config = config.postgres_config();
    let postgres_client = PostgresClient::new(&postgres_config)?;
    tokio::time::timeout(startup_timeout, async {
        postgres_client.ping().await?;
        postgres_client
            .warm_up(postgres_config.min_pool_size)
            .await
    })
    .await
    .context("Timed out connecting to PostgreSQL")??;

    // Redis initialization; the connection itself is opened by the worker
    info!("Initializing Redis...");
    let redis_client = Arc::new(RedisClient::new(&config.redis_url, startup_timeout)?);

    Ok((postgres_client, redis_client))
}
