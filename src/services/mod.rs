// ============================================================================
// Services Layer
// ============================================================================
//
// Read paths over the repositories that also emit notifications and metrics.
//
// ============================================================================

mod product_service;

pub use product_service::{ProductService, ProductServiceImpl};
