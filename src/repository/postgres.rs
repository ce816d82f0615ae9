use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use super::{CrudRepository, StoreProbe};
use crate::error::RepositoryError;
use crate::models::{Author, Product, ProductCategory};

// ============================================================================
// PostgreSQL Repositories
// ============================================================================
//
// Runtime-checked queries (no compile-time DB access needed). `save` is an
// upsert keyed on id, matching CrudRepository semantics.
//
// ============================================================================

/// Create the three tables if they are missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price DOUBLE PRECISION
        )",
        "CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS product_categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
    })
}

fn author_from_row(row: &PgRow) -> Result<Author, sqlx::Error> {
    Ok(Author {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn category_from_row(row: &PgRow) -> Result<ProductCategory, sqlx::Error> {
    Ok(ProductCategory {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

async fn count_rows(pool: &PgPool, table: &str) -> Result<i64, RepositoryError> {
    let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("n")?)
}

async fn delete_row(pool: &PgPool, table: &str, id: i32) -> Result<bool, RepositoryError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ----------------------------------------------------------------------------
// Product
// ----------------------------------------------------------------------------

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository<Product> for PgProductRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, description, price FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, description, price FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(product_from_row).collect::<Result<_, _>>()?)
    }

    async fn save(&self, entity: Product) -> Result<Product, RepositoryError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, price) VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
             SET name = EXCLUDED.name, description = EXCLUDED.description, price = EXCLUDED.price",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(entity.price)
        .execute(&self.pool)
        .await?;
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, RepositoryError> {
        delete_row(&self.pool, "products", id).await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        count_rows(&self.pool, "products").await
    }
}

// ----------------------------------------------------------------------------
// Author
// ----------------------------------------------------------------------------

pub struct PgAuthorRepository {
    pool: PgPool,
}

impl PgAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository<Author> for PgAuthorRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(author_from_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(author_from_row).collect::<Result<_, _>>()?)
    }

    async fn save(&self, entity: Author) -> Result<Author, RepositoryError> {
        sqlx::query(
            "INSERT INTO authors (id, name) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .execute(&self.pool)
        .await?;
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, RepositoryError> {
        delete_row(&self.pool, "authors", id).await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        count_rows(&self.pool, "authors").await
    }
}

// ----------------------------------------------------------------------------
// ProductCategory
// ----------------------------------------------------------------------------

pub struct PgProductCategoryRepository {
    pool: PgPool,
}

impl PgProductCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository<ProductCategory> for PgProductCategoryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductCategory>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM product_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(category_from_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<ProductCategory>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM product_categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(category_from_row).collect::<Result<_, _>>()?)
    }

    async fn save(&self, entity: ProductCategory) -> Result<ProductCategory, RepositoryError> {
        sqlx::query(
            "INSERT INTO product_categories (id, name) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(entity.id)
        .bind(&entity.name)
        .execute(&self.pool)
        .await?;
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, RepositoryError> {
        delete_row(&self.pool, "product_categories", id).await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        count_rows(&self.pool, "product_categories").await
    }
}

/// `SELECT 1` against the pool
pub struct PgStoreProbe {
    pool: PgPool,
}

impl PgStoreProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreProbe for PgStoreProbe {
    fn backend(&self) -> &str {
        "PostgreSQL"
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
