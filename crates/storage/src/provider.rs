use std::time::Instant;

use rvq_common::Result;
use tracing::{debug, info};

use crate::catalog::{CUSTOMER, Catalog, LINEITEM, NATION, ORDERS, REGION, SUPPLIER};
use crate::rows::RowStore;
use crate::tbl;

/// Source of a fully materialized [`RowStore`].
///
/// The engine never reads files itself; callers hand it whatever a source produced.
pub trait RowSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Load all six tables.
    ///
    /// # Errors
    /// Returns an input-format error for undecodable rows and an IO error for unreadable files.
    fn load(&self) -> Result<RowStore>;
}

/// Loads `.tbl` files located through a [`Catalog`].
#[derive(Debug, Clone)]
pub struct TblRowSource {
    catalog: Catalog,
}

impl TblRowSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl RowSource for TblRowSource {
    fn name(&self) -> &str {
        "tbl"
    }

    fn load(&self) -> Result<RowStore> {
        let started = Instant::now();
        let store = RowStore {
            regions: timed(REGION, || tbl::read_regions(&self.catalog.get(REGION)?.path))?,
            nations: timed(NATION, || tbl::read_nations(&self.catalog.get(NATION)?.path))?,
            customers: timed(CUSTOMER, || {
                tbl::read_customers(&self.catalog.get(CUSTOMER)?.path)
            })?,
            suppliers: timed(SUPPLIER, || {
                tbl::read_suppliers(&self.catalog.get(SUPPLIER)?.path)
            })?,
            orders: timed(ORDERS, || tbl::read_orders(&self.catalog.get(ORDERS)?.path))?,
            line_items: timed(LINEITEM, || {
                tbl::read_line_items(&self.catalog.get(LINEITEM)?.path)
            })?,
        };
        info!(
            counts = ?store.row_counts(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded tbl tables"
        );
        Ok(store)
    }
}

fn timed<T>(table: &str, load: impl FnOnce() -> Result<Vec<T>>) -> Result<Vec<T>> {
    let started = Instant::now();
    let rows = load()?;
    debug!(
        table,
        rows = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded table"
    );
    Ok(rows)
}
