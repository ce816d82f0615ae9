use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Models
// ============================================================================

/// Anything stored in a `CrudRepository`: a flat record keyed by an integer id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in logs and not-found errors
    const NAME: &'static str;

    fn id(&self) -> i32;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductCategory {
    pub id: i32,
    pub name: String,
}

impl Entity for Product {
    const NAME: &'static str = "Product";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for Author {
    const NAME: &'static str = "Author";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Entity for ProductCategory {
    const NAME: &'static str = "ProductCategory";

    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_without_price_serializes_null() {
        let product = Product {
            id: 1,
            name: "Spring Boot".to_string(),
            description: "Course".to_string(),
            price: None,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], serde_json::Value::Null);
        assert_eq!(json["name"], "Spring Boot");
    }

    #[test]
    fn test_entity_ids() {
        let author = Author { id: 4, name: "Pascal".to_string() };
        let category = ProductCategory { id: 9, name: "Books".to_string() };

        assert_eq!(author.id(), 4);
        assert_eq!(category.id(), 9);
        assert_eq!(<ProductCategory as Entity>::NAME, "ProductCategory");
    }
}
