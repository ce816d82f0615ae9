use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use product_actuator::config::AppConfig;
use product_actuator::health::{
    DatabaseHealthIndicator, HealthRegistry, KafkaHealthIndicator, PingHealthIndicator,
    RandomHealthIndicator,
};
use product_actuator::messaging::{
    run_kafka_listener, run_memory_listener, ConnectionProbe, InMemoryBroker, KafkaClient,
    LoggingListener, MessageHandler, MessageSender, TextMessageService,
};
use product_actuator::metrics::Metrics;
use product_actuator::models::{Author, Product, ProductCategory};
use product_actuator::repository::{
    ensure_schema, seed_sample_data, CrudRepository, InMemoryRepository, MemoryStoreProbe,
    PgAuthorRepository, PgProductCategoryRepository, PgProductRepository, PgStoreProbe,
    StoreProbe,
};
use product_actuator::services::ProductServiceImpl;
use product_actuator::web::{run_server, AppState, InMemoryHttpTraceRepository};

struct Repositories {
    products: Arc<dyn CrudRepository<Product>>,
    authors: Arc<dyn CrudRepository<Author>>,
    categories: Arc<dyn CrudRepository<ProductCategory>>,
    probe: Arc<dyn StoreProbe>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();

    // Default to INFO level, can be overridden with RUST_LOG env var
    init_logging(&config);

    tracing::info!("🚀 Starting product actuator");

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created");

    // === 2. Persistence ===
    let repos = connect_repositories(&config).await?;
    if config.seed {
        seed_sample_data(
            repos.products.as_ref(),
            repos.authors.as_ref(),
            repos.categories.as_ref(),
        )
        .await?;
    }

    // === 3. Messaging: sender, probe, listeners ===
    let shutdown = CancellationToken::new();
    let listener: Arc<dyn MessageHandler> = Arc::new(LoggingListener::new(metrics.clone()));
    let listened = [config.listener_topic.clone(), config.text_queue.clone()];

    let (sender, broker_probe): (Arc<dyn MessageSender>, Arc<dyn ConnectionProbe>) =
        match &config.kafka_brokers {
            Some(brokers) => {
                let client = Arc::new(KafkaClient::new(brokers)?);

                let brokers = brokers.clone();
                let group = config.listener_group.clone();
                let token = shutdown.clone();
                tokio::spawn(async move {
                    let topics: Vec<&str> = listened.iter().map(String::as_str).collect();
                    if let Err(e) = run_kafka_listener(&brokers, &group, &topics, listener, token).await {
                        tracing::error!(error = %e, "Kafka listener failed");
                    }
                });

                (
                    client.clone() as Arc<dyn MessageSender>,
                    client as Arc<dyn ConnectionProbe>,
                )
            }
            None => {
                tracing::warn!("No Kafka brokers configured, using in-memory broker");
                let broker = Arc::new(InMemoryBroker::new());

                for topic in listened {
                    let receiver = broker.subscribe(&topic);
                    tokio::spawn(run_memory_listener(
                        topic,
                        receiver,
                        listener.clone(),
                        shutdown.clone(),
                    ));
                }

                (
                    broker.clone() as Arc<dyn MessageSender>,
                    broker as Arc<dyn ConnectionProbe>,
                )
            }
        };

    let messages = Arc::new(TextMessageService::new(
        sender,
        config.text_queue.clone(),
        metrics.clone(),
    ));

    // === 4. Health indicators ===
    let mut health = HealthRegistry::new();
    health
        .register(
            "Kafka",
            Arc::new(KafkaHealthIndicator::new(broker_probe, config.kafka_health_timeout())),
        )
        .register("CustomRandChecks", Arc::new(RandomHealthIndicator))
        .register("ping", Arc::new(PingHealthIndicator))
        .register("db", Arc::new(DatabaseHealthIndicator::new(repos.probe.clone())));
    tracing::info!(indicators = ?health.names(), "Health indicators registered");

    // === 5. HTTP ===
    let state = AppState {
        products: Arc::new(ProductServiceImpl::new(
            repos.products.clone(),
            messages,
            metrics.clone(),
        )),
        authors: repos.authors.clone(),
        categories: repos.categories.clone(),
        health: Arc::new(health),
        metrics,
        traces: Arc::new(InMemoryHttpTraceRepository::new(config.http_trace_capacity)),
    };

    let served = run_server(state, &config.http_addr).await;

    shutdown.cancel();
    tracing::info!("👋 Shutting down");

    served?;
    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,product_actuator=debug"));

    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }
}

async fn connect_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            ensure_schema(&pool).await?;

            Ok(Repositories {
                products: Arc::new(PgProductRepository::new(pool.clone())),
                authors: Arc::new(PgAuthorRepository::new(pool.clone())),
                categories: Arc::new(PgProductCategoryRepository::new(pool.clone())),
                probe: Arc::new(PgStoreProbe::new(pool)),
            })
        }
        None => {
            tracing::warn!("No database configured, records are kept in memory");
            Ok(Repositories {
                products: Arc::new(InMemoryRepository::<Product>::new()),
                authors: Arc::new(InMemoryRepository::<Author>::new()),
                categories: Arc::new(InMemoryRepository::<ProductCategory>::new()),
                probe: Arc::new(MemoryStoreProbe),
            })
        }
    }
}
