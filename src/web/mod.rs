use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

mod api;
mod endpoints;
mod trace;

pub use endpoints::{custom_endpoint_names, CUSTOM_ENDPOINT_ID, CUSTOM_ENDPOINT_NAMES};
pub use trace::{
    record_exchange, HttpExchange, HttpTraceRepository, InMemoryHttpTraceRepository,
    DEFAULT_TRACE_CAPACITY,
};

use crate::health::HealthRegistry;
use crate::metrics::Metrics;
use crate::models::{Author, ProductCategory};
use crate::repository::CrudRepository;
use crate::services::ProductService;

// ============================================================================
// HTTP Surface
// ============================================================================
//
// /actuator/...   management endpoints (health, custom, metrics, trace)
// /products, ...  domain reads
//
// Every exchange passes through `record_exchange`.
//
// ============================================================================

/// Everything the handlers need, wired once in main
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductService>,
    pub authors: Arc<dyn CrudRepository<Author>>,
    pub categories: Arc<dyn CrudRepository<ProductCategory>>,
    pub health: Arc<HealthRegistry>,
    pub metrics: Arc<Metrics>,
    pub traces: Arc<dyn HttpTraceRepository>,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/actuator")
            .route("", web::get().to(endpoints::index))
            .route("/health", web::get().to(endpoints::health))
            .route("/health/{component}", web::get().to(endpoints::health_component))
            .route("/mycustom-endpoint", web::get().to(endpoints::custom_endpoint))
            .route("/metrics", web::get().to(endpoints::metrics))
            .route("/prometheus", web::get().to(endpoints::prometheus))
            .route("/httptrace", web::get().to(endpoints::httptrace)),
    )
    .route("/products", web::get().to(api::list_products))
    .route("/products/{id}", web::get().to(api::get_product))
    .route("/authors", web::get().to(api::list_authors))
    .route("/categories", web::get().to(api::list_categories));
}

/// Serve until the server is stopped (SIGINT/SIGTERM)
pub async fn run_server(state: AppState, addr: &str) -> std::io::Result<()> {
    tracing::info!("🌐 Starting HTTP server on http://{}/actuator", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(from_fn(record_exchange))
            .configure(routes)
    })
    .bind(addr)?
    .run()
    .await
}
