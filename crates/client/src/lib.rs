//! Command-line driver: argument parsing, table loading, query execution and result output.

pub mod cli;
pub mod output;

use std::path::Path;

use rvq_common::Result;
use rvq_execution::{QueryOutput, RegionalRevenueQuery};
use rvq_storage::{Catalog, RowSource, TblRowSource};
use tracing::info;

pub use cli::{Command, RunOptions, parse_args, usage};
pub use output::write_results;

/// Load the `.tbl` tables named by `opts`, run the query and write the result file.
///
/// Configuration is validated before any table is read.
pub fn run(opts: &RunOptions) -> Result<QueryOutput> {
    let query = RegionalRevenueQuery::new(opts.query.clone())?;
    let mut catalog = Catalog::for_directory(&opts.table_path);
    if let Some(path) = &opts.catalog {
        catalog.apply_json_overrides(path)?;
    }
    run_with_source(&query, &TblRowSource::new(catalog), &opts.result_path)
}

pub fn run_with_source(
    query: &RegionalRevenueQuery,
    source: &dyn RowSource,
    result_path: &Path,
) -> Result<QueryOutput> {
    let store = source.load()?;
    let out = query.execute(&store)?;
    write_results(result_path, &out.rows)?;
    info!(
        query_id = %out.query_id,
        source = source.name(),
        rows = out.rows.len(),
        result_path = %result_path.display(),
        "wrote result"
    );
    Ok(out)
}
