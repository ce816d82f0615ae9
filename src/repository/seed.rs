use super::CrudRepository;
use crate::error::RepositoryError;
use crate::models::{Author, Product, ProductCategory};

/// Load a small fixed catalogue. Existing ids are overwritten.
pub async fn seed_sample_data(
    products: &dyn CrudRepository<Product>,
    authors: &dyn CrudRepository<Author>,
    categories: &dyn CrudRepository<ProductCategory>,
) -> Result<(), RepositoryError> {
    for (id, name) in [(1, "Karthikeyan"), (2, "Pascal"), (3, "Thomas")] {
        authors.save(Author { id, name: name.to_string() }).await?;
    }

    for (id, name) in [(1, "Spring Introductory"), (2, "Spring Core"), (3, "Spring Boot")] {
        categories.save(ProductCategory { id, name: name.to_string() }).await?;
    }

    let catalogue = [
        (1, "Spring Core Ultimate", "Learn the core of the Spring framework", Some(199.0)),
        (2, "Spring Boot Actuator", "Health, metrics and management endpoints", Some(99.0)),
        (3, "Messaging Basics", "Queues, topics and listeners", None),
    ];
    for (id, name, description, price) in catalogue {
        products
            .save(Product {
                id,
                name: name.to_string(),
                description: description.to_string(),
                price,
            })
            .await?;
    }

    let (product_count, author_count, category_count) =
        (products.count().await?, authors.count().await?, categories.count().await?);
    tracing::info!(
        products = product_count,
        authors = author_count,
        categories = category_count,
        "Sample data loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let products = InMemoryRepository::<Product>::new();
        let authors = InMemoryRepository::<Author>::new();
        let categories = InMemoryRepository::<ProductCategory>::new();

        seed_sample_data(&products, &authors, &categories).await.unwrap();
        seed_sample_data(&products, &authors, &categories).await.unwrap();

        assert_eq!(products.count().await.unwrap(), 3);
        assert_eq!(authors.count().await.unwrap(), 3);
        assert_eq!(categories.count().await.unwrap(), 3);
        assert_eq!(products.find_by_id(3).await.unwrap().unwrap().price, None);
    }
}
