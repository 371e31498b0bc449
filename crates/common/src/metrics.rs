use std::sync::{Arc, OnceLock};

use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

#[derive(Clone, Debug)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    registry: Registry,
    worker_rows_scanned: CounterVec,
    worker_rows_joined: CounterVec,
    phase_time_seconds: HistogramVec,
    lookup_entries: GaugeVec,
    result_groups: GaugeVec,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::new()),
        }
    }

    /// Record one join-aggregate worker's partition totals.
    pub fn record_worker(
        &self,
        query_id: &str,
        worker: usize,
        rows_scanned: u64,
        rows_joined: u64,
    ) {
        let labels = [query_id, &worker.to_string()];
        self.inner
            .worker_rows_scanned
            .with_label_values(&labels)
            .inc_by(rows_scanned as f64);
        self.inner
            .worker_rows_joined
            .with_label_values(&labels)
            .inc_by(rows_joined as f64);
    }

    pub fn record_phase(&self, query_id: &str, phase: &str, secs: f64) {
        self.inner
            .phase_time_seconds
            .with_label_values(&[query_id, phase])
            .observe(secs.max(0.0));
    }

    pub fn set_lookup_entries(&self, query_id: &str, lookup: &str, entries: usize) {
        self.inner
            .lookup_entries
            .with_label_values(&[query_id, lookup])
            .set(entries as f64);
    }

    pub fn set_result_groups(&self, query_id: &str, groups: usize) {
        self.inner
            .result_groups
            .with_label_values(&[query_id])
            .set(groups as f64);
    }

    pub fn render_prometheus(&self) -> String {
        let metric_families = self.inner.registry.gather();
        let mut out = Vec::new();
        let enc = TextEncoder::new();
        if enc.encode(&metric_families, &mut out).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&out).to_string()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsInner {
    fn new() -> Self {
        let registry = Registry::new();

        let worker_rows_scanned = counter_vec(
            &registry,
            "rvq_worker_rows_scanned_total",
            "Line items scanned per join-aggregate worker",
            &["query_id", "worker"],
        );
        let worker_rows_joined = counter_vec(
            &registry,
            "rvq_worker_rows_joined_total",
            "Line items that satisfied every join predicate per worker",
            &["query_id", "worker"],
        );
        let phase_time_seconds = histogram_vec(
            &registry,
            "rvq_phase_time_seconds",
            "Time spent in each query phase",
            &["query_id", "phase"],
        );
        let lookup_entries = gauge_vec(
            &registry,
            "rvq_lookup_entries",
            "Entries in each dimension lookup",
            &["query_id", "lookup"],
        );
        let result_groups = gauge_vec(
            &registry,
            "rvq_result_groups",
            "Nations in the final result",
            &["query_id"],
        );

        Self {
            registry,
            worker_rows_scanned,
            worker_rows_joined,
            phase_time_seconds,
            lookup_entries,
            result_groups,
        }
    }
}

fn counter_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> CounterVec {
    let c = CounterVec::new(Opts::new(name, help), labels).expect("counter vec");
    registry
        .register(Box::new(c.clone()))
        .expect("register counter");
    c
}

fn gauge_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> GaugeVec {
    let g = GaugeVec::new(Opts::new(name, help), labels).expect("gauge vec");
    registry
        .register(Box::new(g.clone()))
        .expect("register gauge");
    g
}

fn histogram_vec(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> HistogramVec {
    let h = HistogramVec::new(HistogramOpts::new(name, help), labels).expect("histogram vec");
    registry
        .register(Box::new(h.clone()))
        .expect("register histogram");
    h
}

static GLOBAL_METRICS: OnceLock<MetricsRegistry> = OnceLock::new();

/// Process-wide registry.
///
/// Every series is labelled with its `query_id`, so each executed query adds series that are
/// never removed. Long-lived callers should give each query its own [`MetricsRegistry`].
pub fn global_metrics() -> &'static MetricsRegistry {
    GLOBAL_METRICS.get_or_init(MetricsRegistry::new)
}
