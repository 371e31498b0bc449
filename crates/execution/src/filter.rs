//! Dimension filter: restricted lookups built from the five small tables.
//!
//! Each lookup narrows the previous one:
//! region name -> region keys -> nations -> customers / suppliers -> orders.
//! An unmatched region is not an error; every lookup just ends up empty.

use std::collections::{HashMap, HashSet};

use rvq_common::{CustKey, NationKey, OrderKey, RegionKey, SuppKey};
use rvq_storage::RowStore;

/// Half-open `[start, end)` window over ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

impl<'a> DateWindow<'a> {
    pub fn new(start: &'a str, end: &'a str) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: &str) -> bool {
        date >= self.start && date < self.end
    }
}

/// Read-only lookups shared by every join-aggregate worker.
#[derive(Debug, Clone, Default)]
pub struct DimensionLookups {
    pub valid_region_keys: HashSet<RegionKey>,
    pub nation_name_by_key: HashMap<NationKey, String>,
    pub cust_nation_by_key: HashMap<CustKey, NationKey>,
    pub supp_nation_by_key: HashMap<SuppKey, NationKey>,
    pub order_cust_by_key: HashMap<OrderKey, CustKey>,
}

impl DimensionLookups {
    /// `(lookup name, entry count)` pairs, for logs and gauges.
    pub fn sizes(&self) -> [(&'static str, usize); 5] {
        [
            ("valid_region_keys", self.valid_region_keys.len()),
            ("nation_name_by_key", self.nation_name_by_key.len()),
            ("cust_nation_by_key", self.cust_nation_by_key.len()),
            ("supp_nation_by_key", self.supp_nation_by_key.len()),
            ("order_cust_by_key", self.order_cust_by_key.len()),
        ]
    }
}

/// Build the lookups for `region_name` (exact, case-sensitive match) and `window`.
pub fn build_dimension_lookups(
    store: &RowStore,
    region_name: &str,
    window: DateWindow<'_>,
) -> DimensionLookups {
    let valid_region_keys = store
        .regions
        .iter()
        .filter(|r| r.name == region_name)
        .map(|r| r.region_key)
        .collect::<HashSet<_>>();

    let nation_name_by_key = store
        .nations
        .iter()
        .filter(|n| valid_region_keys.contains(&n.region_key))
        .map(|n| (n.nation_key, n.name.clone()))
        .collect::<HashMap<_, _>>();

    let cust_nation_by_key = store
        .customers
        .iter()
        .filter(|c| nation_name_by_key.contains_key(&c.nation_key))
        .map(|c| (c.cust_key, c.nation_key))
        .collect::<HashMap<_, _>>();

    let supp_nation_by_key = store
        .suppliers
        .iter()
        .filter(|s| nation_name_by_key.contains_key(&s.nation_key))
        .map(|s| (s.supp_key, s.nation_key))
        .collect::<HashMap<_, _>>();

    let order_cust_by_key = store
        .orders
        .iter()
        .filter(|o| window.contains(&o.order_date) && cust_nation_by_key.contains_key(&o.cust_key))
        .map(|o| (o.order_key, o.cust_key))
        .collect::<HashMap<_, _>>();

    DimensionLookups {
        valid_region_keys,
        nation_name_by_key,
        cust_nation_by_key,
        supp_nation_by_key,
        order_cust_by_key,
    }
}
