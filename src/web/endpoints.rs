use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use super::AppState;
use crate::health::HealthStatus;

// ============================================================================
// Management Endpoints (/actuator/...)
// ============================================================================

/// Payload of the custom read-only endpoint
pub const CUSTOM_ENDPOINT_NAMES: [&str; 3] = ["Karthikeyan", "Pascal", "Thomas"];

pub const CUSTOM_ENDPOINT_ID: &str = "mycustom-endpoint";

pub fn custom_endpoint_names() -> Vec<&'static str> {
    CUSTOM_ENDPOINT_NAMES.to_vec()
}

fn status_code_for(status: HealthStatus) -> actix_web::http::StatusCode {
    match status {
        HealthStatus::Up => actix_web::http::StatusCode::OK,
        HealthStatus::Down => actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub(super) async fn index() -> HttpResponse {
    let links: serde_json::Map<String, serde_json::Value> = [
        ("self", "/actuator"),
        ("health", "/actuator/health"),
        ("health-component", "/actuator/health/{component}"),
        (CUSTOM_ENDPOINT_ID, "/actuator/mycustom-endpoint"),
        ("metrics", "/actuator/metrics"),
        ("prometheus", "/actuator/prometheus"),
        ("httptrace", "/actuator/httptrace"),
    ]
    .into_iter()
    .map(|(name, href)| (name.to_string(), serde_json::json!({ "href": href })))
    .collect();

    HttpResponse::Ok().json(serde_json::json!({ "_links": links }))
}

pub(super) async fn health(state: web::Data<AppState>) -> HttpResponse {
    let composite = state.health.aggregate().await;
    HttpResponse::build(status_code_for(composite.status)).json(composite)
}

pub(super) async fn health_component(
    state: web::Data<AppState>,
    component: web::Path<String>,
) -> HttpResponse {
    match state.health.check(&component).await {
        Some(health) => HttpResponse::build(status_code_for(health.status)).json(health),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("unknown health component: {}", component.as_str()),
        })),
    }
}

pub(super) async fn custom_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(custom_endpoint_names())
}

pub(super) async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "names": state.metrics.names() }))
}

pub(super) async fn prometheus(state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let buffer = state.metrics.encode_text().map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer))
}

pub(super) async fn httptrace(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "traces": state.traces.find_all() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_endpoint_names_are_fixed_and_ordered() {
        assert_eq!(custom_endpoint_names(), vec!["Karthikeyan", "Pascal", "Thomas"]);
        assert_eq!(custom_endpoint_names(), custom_endpoint_names());
    }

    #[test]
    fn test_down_maps_to_503() {
        assert_eq!(status_code_for(HealthStatus::Up).as_u16(), 200);
        assert_eq!(status_code_for(HealthStatus::Down).as_u16(), 503);
    }
}
