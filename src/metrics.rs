#[derive(Debug, Clone)]
pub struct Metrics {
    pub total_listings: prometheus::IntGauge,
    pub pages_fetched: prometheus::IntCounter,
    pub pages_failed: prometheus::IntCounter,
    pub listings_seen: prometheus::IntCounter,
    pub listings_skipped: prometheus::IntCounter,
    pub inspections_succeeded: prometheus::IntCounter,
    pub inspections_failed: prometheus::IntCounter,
    pub lines_written: prometheus::IntCounter,
}

fn counter(
    registry: &prometheus::Registry,
    name: &str,
    help: &str,
) -> Result<prometheus::IntCounter, prometheus::Error> {
    let counter = prometheus::IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl Metrics {
    pub fn new(registry: &prometheus::Registry) -> Result<Self, prometheus::Error> {
        let total_listings = prometheus::IntGauge::new(
            "total_listings",
            "The number of listings reported by the count probe",
        )?;
        registry.register(Box::new(total_listings.clone()))?;

        Ok(Self {
            total_listings,
            pages_fetched: counter(registry, "pages_fetched", "Listing pages loaded")?,
            pages_failed: counter(registry, "pages_failed", "Listing pages that could not be loaded")?,
            listings_seen: counter(
                registry,
                "listings_seen",
                "Listings turned into an inspect request",
            )?,
            listings_skipped: counter(
                registry,
                "listings_skipped",
                "Listings without a usable inspect link",
            )?,
            inspections_succeeded: counter(
                registry,
                "inspections_succeeded",
                "Inspections that returned item info",
            )?,
            inspections_failed: counter(
                registry,
                "inspections_failed",
                "Inspections that failed or returned no item info",
            )?,
            lines_written: counter(registry, "lines_written", "Lines written to the output file")?,
        })
    }

    /// Share of inspect requests that failed, `0.0` if none were made.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.inspections_failed.get();
        let total = failed + self.inspections_succeeded.get();
        if total == 0 {
            return 0.0;
        }
        failed as f64 / total as f64
    }
}

/// Renders the registry in the prometheus text format.
pub fn encode(registry: &prometheus::Registry) -> String {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let metrics_families = registry.gather();
    let mut buffer = Vec::new();
    match encoder.encode(&metrics_families, &mut buffer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(e) => {
            tracing::error!("Encoding Metrics {:?}", e);

            String::new()
        }
    }
}
