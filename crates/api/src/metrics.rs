use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Request and snapshot counters exposed on `/metrics`.
#[derive(Clone)]
pub struct ApiMetrics {
    registry: Registry,
    requests: IntCounterVec,
    snapshot_refreshes: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("backoffice".to_string()), None)?;

        let requests = IntCounterVec::new(
            Opts::new("api_requests_total", "API requests by endpoint"),
            &["endpoint"],
        )?;
        let snapshot_refreshes = IntCounter::new(
            "snapshot_refreshes_total",
            "Snapshots reloaded from the data source",
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(snapshot_refreshes.clone()))?;

        Ok(Self {
            registry,
            requests,
            snapshot_refreshes,
        })
    }

    pub fn record_request(&self, endpoint: &str) {
        self.requests.with_label_values(&[endpoint]).inc();
    }

    pub fn record_refresh(&self) {
        self.snapshot_refreshes.inc();
    }

    pub fn requests(&self, endpoint: &str) -> u64 {
        self.requests.with_label_values(&[endpoint]).get()
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
