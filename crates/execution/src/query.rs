//! Query driver: config validation, the three phases, logging and metrics.

use std::time::Instant;

use rvq_common::metrics::global_metrics;
use rvq_common::{MetricsRegistry, QueryConfig, QueryId, Result};
use rvq_storage::RowStore;
use tracing::{debug, info, info_span};

use crate::filter::{DateWindow, build_dimension_lookups};
use crate::join_aggregate::{WorkerStats, parallel_join_aggregate};
use crate::rank::{NationRevenue, rank_by_revenue};

/// Ranked rows plus what the run did to produce them.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub query_id: QueryId,
    pub rows: Vec<NationRevenue>,
    pub workers: Vec<WorkerStats>,
}

/// A validated regional revenue query, reusable across row stores.
#[derive(Debug, Clone)]
pub struct RegionalRevenueQuery {
    config: QueryConfig,
    metrics: MetricsRegistry,
}

impl RegionalRevenueQuery {
    /// Metrics go to [`global_metrics`] unless replaced with [`Self::with_metrics`].
    ///
    /// # Errors
    /// Returns a configuration error if `config` fails [`QueryConfig::validate`].
    pub fn new(config: QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: global_metrics().clone(),
        })
    }

    /// Record this query's metrics into `metrics` instead of the process-wide registry.
    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = metrics;
        self
    }

    /// Filter dimensions, join-aggregate the line items, rank the totals.
    pub fn execute(&self, store: &RowStore) -> Result<QueryOutput> {
        let query_id = QueryId::next();
        let qid = query_id.to_string();
        let span = info_span!(
            "regional_revenue",
            query_id = %query_id,
            region = %self.config.region_name,
            start_date = %self.config.start_date,
            end_date = %self.config.end_date,
            workers = self.config.workers
        );
        let _guard = span.enter();
        let metrics = &self.metrics;

        let started = Instant::now();
        let window = DateWindow::new(&self.config.start_date, &self.config.end_date);
        let lookups = build_dimension_lookups(store, &self.config.region_name, window);
        metrics.record_phase(&qid, "dimension_filter", started.elapsed().as_secs_f64());
        for (lookup, entries) in lookups.sizes() {
            metrics.set_lookup_entries(&qid, lookup, entries);
        }
        debug!(sizes = ?lookups.sizes(), "dimension lookups built");
        if lookups.valid_region_keys.is_empty() {
            info!("no region matched; result will be empty");
        }

        let started = Instant::now();
        let aggregated = parallel_join_aggregate(&lookups, &store.line_items, self.config.workers)?;
        metrics.record_phase(&qid, "join_aggregate", started.elapsed().as_secs_f64());
        for w in &aggregated.workers {
            metrics.record_worker(&qid, w.worker, w.rows_scanned, w.rows_joined);
        }

        let started = Instant::now();
        let rows = rank_by_revenue(aggregated.revenue);
        metrics.record_phase(&qid, "rank", started.elapsed().as_secs_f64());
        metrics.set_result_groups(&qid, rows.len());

        info!(nations = rows.len(), "regional revenue query finished");
        Ok(QueryOutput {
            query_id,
            rows,
            workers: aggregated.workers,
        })
    }
}
