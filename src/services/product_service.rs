use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::messaging::TextMessageService;
use crate::metrics::Metrics;
use crate::models::{Entity, Product};
use crate::repository::CrudRepository;

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn get_product(&self, id: i32) -> Result<Product, ServiceError>;

    async fn list_products(&self) -> Result<Vec<Product>, ServiceError>;
}

pub struct ProductServiceImpl {
    products: Arc<dyn CrudRepository<Product>>,
    messages: Arc<TextMessageService>,
    metrics: Arc<Metrics>,
}

impl ProductServiceImpl {
    pub fn new(
        products: Arc<dyn CrudRepository<Product>>,
        messages: Arc<TextMessageService>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            products,
            messages,
            metrics,
        }
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    /// Notifies first, then looks up. The counter only moves on a hit.
    async fn get_product(&self, id: i32) -> Result<Product, ServiceError> {
        self.messages
            .send_text_message(&format!("Fetching Product ID: {}", id))
            .await;

        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: Product::NAME,
                id,
            })?;

        self.metrics.record_product_get();
        tracing::debug!(product_id = id, "Fetched product");

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.messages.send_text_message("Listing Products").await;

        let products = self.products.find_all().await?;
        self.metrics.record_product_list();
        tracing::debug!(count = products.len(), "Listed products");

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{InMemoryBroker, TEXT_MESSAGE_QUEUE};
    use crate::metrics::PRODUCT_LIST_GAUGE_VALUE;
    use crate::repository::InMemoryRepository;

    struct Fixture {
        service: ProductServiceImpl,
        metrics: Arc<Metrics>,
        broker: Arc<InMemoryBroker>,
    }

    fn product(id: i32) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: "test".to_string(),
            price: Some(10.0 * id as f64),
        }
    }

    fn fixture(records: Vec<Product>) -> Fixture {
        let metrics = Arc::new(Metrics::new().unwrap());
        let broker = Arc::new(InMemoryBroker::new());
        let messages = Arc::new(TextMessageService::new(
            broker.clone(),
            TEXT_MESSAGE_QUEUE,
            metrics.clone(),
        ));
        let service = ProductServiceImpl::new(
            Arc::new(InMemoryRepository::with_records(records)),
            messages,
            metrics.clone(),
        );
        Fixture { service, metrics, broker }
    }

    #[tokio::test]
    async fn test_get_product_increments_counter_once_per_call() {
        let fx = fixture(vec![product(1), product(2)]);

        assert_eq!(fx.service.get_product(1).await.unwrap(), product(1));
        assert_eq!(fx.metrics.product_get_total.get(), 1);

        assert_eq!(fx.service.get_product(2).await.unwrap(), product(2));
        assert_eq!(fx.service.get_product(2).await.unwrap(), product(2));
        assert_eq!(fx.metrics.product_get_total.get(), 3);
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found_without_mutation() {
        let fx = fixture(vec![product(1)]);

        let err = fx.service.get_product(42).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Product", id: 42 }));
        assert_eq!(fx.metrics.product_get_total.get(), 0);
        assert_eq!(fx.metrics.product_list_total.get(), 0);
        assert_eq!(fx.metrics.product_list_gauge.get(), 0);
    }

    #[tokio::test]
    async fn test_list_sets_gauge_regardless_of_size() {
        for records in [vec![], vec![product(1)], (1..=40).map(product).collect()] {
            let fx = fixture(records.clone());

            let listed = fx.service.list_products().await.unwrap();
            assert_eq!(listed.len(), records.len());
            assert_eq!(fx.metrics.product_list_gauge.get(), PRODUCT_LIST_GAUGE_VALUE);
            assert_eq!(fx.metrics.product_list_total.get(), 1);
        }
    }

    #[tokio::test]
    async fn test_reads_announce_themselves_on_the_queue() {
        let fx = fixture(vec![product(7)]);
        let mut rx = fx.broker.subscribe(TEXT_MESSAGE_QUEUE);

        fx.service.get_product(7).await.unwrap();
        fx.service.get_product(8).await.unwrap_err();
        fx.service.list_products().await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "Fetching Product ID: 7");
        assert_eq!(rx.recv().await.unwrap(), "Fetching Product ID: 8");
        assert_eq!(rx.recv().await.unwrap(), "Listing Products");
    }
}
