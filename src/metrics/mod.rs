use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus metrics for the product service
// ============================================================================
//
// Provides:
// - Product read counters (fetch-by-id, list-all)
// - The list gauge (overwritten, never accumulated)
// - Messaging throughput by destination / topic
// - HTTP exchanges by method and status
//
// All metrics are registered with one Registry, exposed on
// /actuator/prometheus and listed on /actuator/metrics.
// ============================================================================

/// Value written to the list gauge on every listing. Placeholder; it does not
/// track the number of products returned.
pub const PRODUCT_LIST_GAUGE_VALUE: i64 = 25;

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Product service
    pub product_get_total: IntCounter,
    pub product_list_total: IntCounter,
    pub product_list_gauge: IntGauge,

    // Messaging
    pub messages_sent: IntCounterVec,
    pub messages_received: IntCounterVec,

    // HTTP
    pub http_requests: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let product_get_total = IntCounter::new(
            "product_get_total",
            "Total product fetch-by-id operations that found a record",
        )?;
        registry.register(Box::new(product_get_total.clone()))?;

        let product_list_total = IntCounter::new(
            "product_list_total",
            "Total product list operations",
        )?;
        registry.register(Box::new(product_list_total.clone()))?;

        let product_list_gauge = IntGauge::new(
            "product_list_gauge",
            "Gauge set on every product listing",
        )?;
        registry.register(Box::new(product_list_gauge.clone()))?;

        let messages_sent = IntCounterVec::new(
            Opts::new("messages_sent_total", "Total outbound messages handed to the broker"),
            &["destination"],
        )?;
        registry.register(Box::new(messages_sent.clone()))?;

        let messages_received = IntCounterVec::new(
            Opts::new("messages_received_total", "Total inbound messages handled by listeners"),
            &["topic"],
        )?;
        registry.register(Box::new(messages_received.clone()))?;

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP exchanges"),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        Ok(Self {
            registry,
            product_get_total,
            product_list_total,
            product_list_gauge,
            messages_sent,
            messages_received,
            http_requests,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_product_get(&self) {
        self.product_get_total.inc();
    }

    pub fn record_product_list(&self) {
        self.product_list_total.inc();
        self.product_list_gauge.set(PRODUCT_LIST_GAUGE_VALUE);
    }

    pub fn record_message_sent(&self, destination: &str) {
        self.messages_sent.with_label_values(&[destination]).inc();
    }

    pub fn record_message_received(&self, topic: &str) {
        self.messages_received.with_label_values(&[topic]).inc();
    }

    pub fn record_http_exchange(&self, method: &str, status: u16) {
        self.http_requests
            .with_label_values(&[method, &status.to_string()])
            .inc();
    }

    /// Names of every registered metric family, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .gather()
            .iter()
            .map(|family| family.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Prometheus text exposition of the whole registry
    pub fn encode_text(&self) -> anyhow::Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.product_get_total.get(), 0);
        assert_eq!(metrics.product_list_gauge.get(), 0);
    }

    #[test]
    fn test_record_product_list_overwrites_gauge() {
        let metrics = Metrics::new().unwrap();
        metrics.product_list_gauge.set(3);
        metrics.record_product_list();
        metrics.record_product_list();

        assert_eq!(metrics.product_list_total.get(), 2);
        assert_eq!(metrics.product_list_gauge.get(), PRODUCT_LIST_GAUGE_VALUE);
    }

    #[test]
    fn test_record_messages_by_label() {
        let metrics = Metrics::new().unwrap();
        metrics.record_message_sent("text.messagequeue");
        metrics.record_message_sent("text.messagequeue");
        metrics.record_message_received("test");

        let gathered = metrics.registry.gather();
        let sent = gathered.iter().find(|m| m.name() == "messages_sent_total").unwrap();
        assert_eq!(sent.metric[0].counter.value, Some(2.0));
        assert_eq!(
            metrics.messages_received.with_label_values(&["test"]).get(),
            1
        );
    }

    #[test]
    fn test_names_lists_labelled_families_once_observed() {
        let metrics = Metrics::new().unwrap();
        metrics.record_http_exchange("GET", 200);

        let names = metrics.names();
        assert!(names.contains(&"product_get_total".to_string()));
        assert!(names.contains(&"http_requests_total".to_string()));
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_encode_text() {
        let metrics = Metrics::new().unwrap();
        metrics.record_product_get();

        let text = String::from_utf8(metrics.encode_text().unwrap()).unwrap();
        assert!(text.contains("product_get_total 1"));
    }
}
