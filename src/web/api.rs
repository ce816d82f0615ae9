use actix_web::{web, HttpResponse};

use super::AppState;
use crate::error::ServiceError;

// ============================================================================
// Domain API
// ============================================================================

pub(super) async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let products = state.products.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

pub(super) async fn get_product(
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let product = state.products.get_product(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

pub(super) async fn list_authors(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.authors.find_all().await?))
}

pub(super) async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.categories.find_all().await?))
}
