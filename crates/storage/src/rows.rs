//! Decoded records for the six tables the query reads.
//!
//! Only the columns the query touches are kept; everything else in the
//! dbgen layout is dropped at load time.

use rvq_common::{CustKey, NationKey, OrderKey, RegionKey, SuppKey};

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub region_key: RegionKey,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nation {
    pub nation_key: NationKey,
    pub name: String,
    pub region_key: RegionKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub cust_key: CustKey,
    pub nation_key: NationKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub supp_key: SuppKey,
    pub nation_key: NationKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_key: OrderKey,
    pub cust_key: CustKey,
    /// `YYYY-MM-DD`.
    pub order_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub order_key: OrderKey,
    pub supp_key: SuppKey,
    pub extended_price: f64,
    pub discount: f64,
}

/// All six collections, fully materialized and read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    pub regions: Vec<Region>,
    pub nations: Vec<Nation>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<Order>,
    pub line_items: Vec<LineItem>,
}

/// Per-table row counts, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableRowCounts {
    pub regions: usize,
    pub nations: usize,
    pub customers: usize,
    pub suppliers: usize,
    pub orders: usize,
    pub line_items: usize,
}

impl RowStore {
    pub fn row_counts(&self) -> TableRowCounts {
        TableRowCounts {
            regions: self.regions.len(),
            nations: self.nations.len(),
            customers: self.customers.len(),
            suppliers: self.suppliers.len(),
            orders: self.orders.len(),
            line_items: self.line_items.len(),
        }
    }
}
