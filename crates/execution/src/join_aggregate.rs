//! Parallel join-aggregate over the line-item table.
//!
//! Execution model (fork-join):
//! - the line items are cut into one contiguous slice per worker ([`partition_ranges`]);
//! - each worker probes the shared, read-only [`DimensionLookups`] and sums revenue into
//!   its own map, so nothing is locked on the per-row path;
//! - after every worker has been joined, the private maps are merged in worker order.
//!
//! Worker maps key on `&str` borrowed from `nation_name_by_key`, so no name is cloned
//! until the ranker builds the final rows.

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use rvq_common::{Result, RvqError};
use rvq_storage::LineItem;
use tracing::{debug, info};

use crate::filter::DimensionLookups;
use crate::partition::partition_ranges;

/// Nation name -> summed revenue.
pub type RevenueByNation<'a> = HashMap<&'a str, f64>;

/// Per-worker counters reported after the join barrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub worker: usize,
    pub rows_scanned: u64,
    pub rows_joined: u64,
    pub elapsed: Duration,
}

/// One worker's private result.
#[derive(Debug, Clone)]
pub struct PartialAggregate<'a> {
    pub stats: WorkerStats,
    pub revenue: RevenueByNation<'a>,
}

/// Merged result of all workers.
#[derive(Debug, Clone, Default)]
pub struct JoinAggregateOutput<'a> {
    pub revenue: RevenueByNation<'a>,
    pub workers: Vec<WorkerStats>,
}

/// `extended_price * (1 - discount)`, unrounded and without tax.
#[inline]
pub fn revenue_contribution(extended_price: f64, discount: f64) -> f64 {
    extended_price * (1.0 - discount)
}

/// Join and aggregate one partition.
///
/// `first_row` is the partition's offset in the full table and is only used in error messages.
///
/// # Errors
/// A qualifying line item with a non-finite price or discount aborts the partition.
pub fn aggregate_partition<'a>(
    lookups: &'a DimensionLookups,
    worker: usize,
    items: &[LineItem],
    first_row: usize,
) -> Result<PartialAggregate<'a>> {
    let started = Instant::now();
    let mut revenue = RevenueByNation::new();
    let mut rows_joined = 0_u64;

    for (offset, item) in items.iter().enumerate() {
        let Some(cust_key) = lookups.order_cust_by_key.get(&item.order_key) else {
            continue;
        };
        let Some(supp_nation) = lookups.supp_nation_by_key.get(&item.supp_key) else {
            continue;
        };
        let Some(cust_nation) = lookups.cust_nation_by_key.get(cust_key) else {
            continue;
        };
        if cust_nation != supp_nation {
            continue;
        }
        let Some(nation_name) = lookups.nation_name_by_key.get(supp_nation) else {
            continue;
        };
        if !item.extended_price.is_finite() || !item.discount.is_finite() {
            return Err(RvqError::InputFormat(format!(
                "line item {} (order {}, supplier {}) has non-finite extended_price={} discount={}",
                first_row + offset,
                item.order_key,
                item.supp_key,
                item.extended_price,
                item.discount
            )));
        }
        *revenue.entry(nation_name.as_str()).or_insert(0.0) +=
            revenue_contribution(item.extended_price, item.discount);
        rows_joined += 1;
    }

    let stats = WorkerStats {
        worker,
        rows_scanned: items.len() as u64,
        rows_joined,
        elapsed: started.elapsed(),
    };
    debug!(
        worker,
        rows_scanned = stats.rows_scanned,
        rows_joined,
        groups = revenue.len(),
        elapsed_us = stats.elapsed.as_micros() as u64,
        "join-aggregate partition finished"
    );
    Ok(PartialAggregate { stats, revenue })
}

/// Sum private maps by nation name, in the order given.
pub fn merge_partials<'a>(partials: Vec<PartialAggregate<'a>>) -> JoinAggregateOutput<'a> {
    let mut out = JoinAggregateOutput {
        revenue: RevenueByNation::new(),
        workers: Vec::with_capacity(partials.len()),
    };
    for partial in partials {
        out.workers.push(partial.stats);
        for (name, value) in partial.revenue {
            *out.revenue.entry(name).or_insert(0.0) += value;
        }
    }
    out
}

/// Run the join-aggregate on `workers` scoped threads and merge their results.
///
/// # Errors
/// - input-format error from any worker (first failing worker in index order wins)
/// - execution error if a worker could not be spawned or panicked
pub fn parallel_join_aggregate<'a>(
    lookups: &'a DimensionLookups,
    line_items: &[LineItem],
    workers: usize,
) -> Result<JoinAggregateOutput<'a>> {
    let ranges = partition_ranges(line_items.len(), workers);
    let worker_count = ranges.len();

    let partials = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        let mut spawn_error = None;
        for (worker, range) in ranges.into_iter().enumerate() {
            let first_row = range.start;
            let slice = &line_items[range];
            let spawned = thread::Builder::new()
                .name(format!("rvq-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    aggregate_partition(lookups, worker, slice, first_row)
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(RvqError::Execution(format!(
                        "failed to spawn join-aggregate worker {worker}: {e}"
                    )));
                    break;
                }
            }
        }

        // Every handle is joined before any result is inspected: a panicked thread
        // left unjoined would panic the whole scope.
        let joined = handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle.join().map_err(|_| {
                    RvqError::Execution(format!("join-aggregate worker {worker} panicked"))
                })?
            })
            .collect::<Vec<Result<PartialAggregate<'a>>>>();

        match spawn_error {
            Some(e) => Err(e),
            None => joined.into_iter().collect::<Result<Vec<_>>>(),
        }
    })?;

    let out = merge_partials(partials);
    info!(
        workers = worker_count,
        line_items = line_items.len(),
        rows_joined = out.workers.iter().map(|w| w.rows_joined).sum::<u64>(),
        groups = out.revenue.len(),
        "join-aggregate merged"
    );
    Ok(out)
}
