//! Reader for TPC-H dbgen `.tbl` files (`|`-delimited, optional trailing `|`).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rvq_common::{CustKey, NationKey, OrderKey, RegionKey, Result, RvqError, SuppKey};

use crate::rows::{Customer, LineItem, Nation, Order, Region, Supplier};

/// One non-blank line of a `.tbl` file, split into borrowed fields.
pub struct TblRow<'a> {
    path: &'a Path,
    line_no: usize,
    fields: Vec<&'a str>,
}

impl<'a> TblRow<'a> {
    fn field(&self, idx: usize, name: &str) -> Result<&'a str> {
        self.fields.get(idx).copied().ok_or_else(|| {
            RvqError::InputFormat(format!(
                "{}:{}: missing field {name} at index {idx}",
                self.path.display(),
                self.line_no
            ))
        })
    }

    pub fn parse_i64(&self, idx: usize, name: &str) -> Result<i64> {
        let v = self.field(idx, name)?;
        v.parse::<i64>().map_err(|e| {
            RvqError::InputFormat(format!(
                "{}:{}: parse i64 failed for {name} ({v:?}): {e}",
                self.path.display(),
                self.line_no
            ))
        })
    }

    pub fn parse_f64(&self, idx: usize, name: &str) -> Result<f64> {
        let v = self.field(idx, name)?;
        v.parse::<f64>().map_err(|e| {
            RvqError::InputFormat(format!(
                "{}:{}: parse f64 failed for {name} ({v:?}): {e}",
                self.path.display(),
                self.line_no
            ))
        })
    }

    pub fn parse_string(&self, idx: usize, name: &str) -> Result<String> {
        self.field(idx, name).map(str::to_string)
    }
}

/// Decode every non-blank line of `path` with `decode`, failing on the first bad row.
pub fn read_tbl<T, F>(path: &Path, mut decode: F) -> Result<Vec<T>>
where
    F: FnMut(&TblRow<'_>) -> Result<T>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("open {} failed: {e}", path.display()))
    })?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    for (line_idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let trimmed = line.trim_end_matches(['\n', '\r']);
        let body = trimmed.strip_suffix('|').unwrap_or(trimmed);
        if body.is_empty() {
            continue;
        }
        let row = TblRow {
            path,
            line_no: line_idx + 1,
            fields: body.split('|').collect(),
        };
        rows.push(decode(&row)?);
    }
    Ok(rows)
}

pub fn read_regions(path: &Path) -> Result<Vec<Region>> {
    read_tbl(path, |row| {
        Ok(Region {
            region_key: RegionKey(row.parse_i64(0, "region.r_regionkey")?),
            name: row.parse_string(1, "region.r_name")?,
        })
    })
}

pub fn read_nations(path: &Path) -> Result<Vec<Nation>> {
    read_tbl(path, |row| {
        Ok(Nation {
            nation_key: NationKey(row.parse_i64(0, "nation.n_nationkey")?),
            name: row.parse_string(1, "nation.n_name")?,
            region_key: RegionKey(row.parse_i64(2, "nation.n_regionkey")?),
        })
    })
}

pub fn read_customers(path: &Path) -> Result<Vec<Customer>> {
    read_tbl(path, |row| {
        Ok(Customer {
            cust_key: CustKey(row.parse_i64(0, "customer.c_custkey")?),
            nation_key: NationKey(row.parse_i64(3, "customer.c_nationkey")?),
        })
    })
}

pub fn read_suppliers(path: &Path) -> Result<Vec<Supplier>> {
    read_tbl(path, |row| {
        Ok(Supplier {
            supp_key: SuppKey(row.parse_i64(0, "supplier.s_suppkey")?),
            nation_key: NationKey(row.parse_i64(3, "supplier.s_nationkey")?),
        })
    })
}

pub fn read_orders(path: &Path) -> Result<Vec<Order>> {
    read_tbl(path, |row| {
        Ok(Order {
            order_key: OrderKey(row.parse_i64(0, "orders.o_orderkey")?),
            cust_key: CustKey(row.parse_i64(1, "orders.o_custkey")?),
            order_date: row.parse_string(4, "orders.o_orderdate")?,
        })
    })
}

pub fn read_line_items(path: &Path) -> Result<Vec<LineItem>> {
    read_tbl(path, |row| {
        Ok(LineItem {
            order_key: OrderKey(row.parse_i64(0, "lineitem.l_orderkey")?),
            supp_key: SuppKey(row.parse_i64(2, "lineitem.l_suppkey")?),
            extended_price: row.parse_f64(5, "lineitem.l_extendedprice")?,
            discount: row.parse_f64(6, "lineitem.l_discount")?,
        })
    })
}
