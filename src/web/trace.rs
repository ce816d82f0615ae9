use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::web;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Instant;
use uuid::Uuid;

use super::AppState;

// ============================================================================
// HTTP Exchange Trace
// ============================================================================
//
// Keeps the most recent request/response pairs in memory for
// /actuator/httptrace. Oldest entries are evicted once capacity is reached.
//
// ============================================================================

pub const DEFAULT_TRACE_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct HttpExchange {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub uri: String,
    pub status: u16,
    pub time_taken_ms: u64,
}

pub trait HttpTraceRepository: Send + Sync {
    fn add(&self, exchange: HttpExchange);

    /// Newest first
    fn find_all(&self) -> Vec<HttpExchange>;
}

pub struct InMemoryHttpTraceRepository {
    capacity: usize,
    exchanges: Mutex<VecDeque<HttpExchange>>,
}

impl InMemoryHttpTraceRepository {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            exchanges: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl Default for InMemoryHttpTraceRepository {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CAPACITY)
    }
}

impl HttpTraceRepository for InMemoryHttpTraceRepository {
    fn add(&self, exchange: HttpExchange) {
        if self.capacity == 0 {
            return;
        }
        let mut exchanges = self.exchanges.lock();
        exchanges.push_front(exchange);
        exchanges.truncate(self.capacity);
    }

    fn find_all(&self) -> Vec<HttpExchange> {
        self.exchanges.lock().iter().cloned().collect()
    }
}

/// Middleware: record every exchange in the trace repository and count it
pub async fn record_exchange(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let started = Instant::now();
    let timestamp = Utc::now();
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let state = req.app_data::<web::Data<AppState>>().cloned();

    let res = next.call(req).await?;
    let status = res.status().as_u16();

    if let Some(state) = state {
        state.metrics.record_http_exchange(&method, status);
        state.traces.add(HttpExchange {
            id: Uuid::now_v7(),
            timestamp,
            method: method.clone(),
            uri: uri.clone(),
            status,
            time_taken_ms: started.elapsed().as_millis() as u64,
        });
    }

    tracing::debug!(method = %method, uri = %uri, status, "HTTP exchange");

    Ok(res)
}
