//! Regional revenue execution engine.
//!
//! Architecture role:
//! - restrict the five dimension tables to lookups for one region and date window
//! - scan line items on a fixed pool of scoped worker threads and sum revenue per nation
//! - rank the merged totals
//!
//! Key modules:
//! - [`filter`]
//! - [`partition`]
//! - [`join_aggregate`]
//! - [`rank`]
//! - [`query`]

pub mod filter;
pub mod join_aggregate;
pub mod partition;
pub mod query;
pub mod rank;

pub use filter::{DateWindow, DimensionLookups, build_dimension_lookups};
pub use join_aggregate::{
    JoinAggregateOutput, PartialAggregate, WorkerStats, parallel_join_aggregate,
    revenue_contribution,
};
pub use partition::partition_ranges;
pub use query::{QueryOutput, RegionalRevenueQuery};
pub use rank::{NationRevenue, rank_by_revenue};
