use std::collections::HashMap;

use rvq_common::metrics::global_metrics;
use rvq_common::{
    CustKey, MetricsRegistry, NationKey, OrderKey, QueryConfig, RegionKey, RvqError, SuppKey,
};
use rvq_execution::{NationRevenue, RegionalRevenueQuery, revenue_contribution};
use rvq_storage::{Customer, LineItem, Nation, Order, Region, RowStore, Supplier};

fn config(region: &str, workers: usize) -> QueryConfig {
    QueryConfig {
        region_name: region.to_string(),
        start_date: "1994-01-01".to_string(),
        end_date: "1995-01-01".to_string(),
        workers,
    }
}

fn run(store: &RowStore, cfg: QueryConfig) -> Vec<NationRevenue> {
    RegionalRevenueQuery::new(cfg)
        .expect("valid config")
        .execute(store)
        .expect("execute")
        .rows
}

fn names(rows: &[NationRevenue]) -> Vec<&str> {
    rows.iter().map(|r| r.nation_name.as_str()).collect()
}

/// Nations A, B, C in region TEST, one customer, supplier and in-window order each.
fn three_nation_store() -> RowStore {
    let mut store = RowStore {
        regions: vec![
            Region { region_key: RegionKey(0), name: "TEST".to_string() },
            Region { region_key: RegionKey(1), name: "OTHER".to_string() },
        ],
        ..Default::default()
    };
    for (i, name) in ["A", "B", "C"].into_iter().enumerate() {
        let k = i as i64 + 1;
        store.nations.push(Nation {
            nation_key: NationKey(k),
            name: name.to_string(),
            region_key: RegionKey(0),
        });
        store.customers.push(Customer { cust_key: CustKey(k), nation_key: NationKey(k) });
        store.suppliers.push(Supplier { supp_key: SuppKey(k), nation_key: NationKey(k) });
        store.orders.push(Order {
            order_key: OrderKey(k),
            cust_key: CustKey(k),
            order_date: "1994-06-15".to_string(),
        });
    }
    for (k, price) in [(1, 50.0), (2, 200.0), (3, 10.0)] {
        store.line_items.push(LineItem {
            order_key: OrderKey(k),
            supp_key: SuppKey(k),
            extended_price: price,
            discount: 0.0,
        });
    }
    store
}

#[test]
fn ranks_nations_by_revenue_descending() {
    let rows = run(&three_nation_store(), config("TEST", 2));
    assert_eq!(names(&rows), vec!["B", "A", "C"]);
    assert_eq!(rows[0].revenue, 200.0);
    assert_eq!(rows[1].revenue, 50.0);
    assert_eq!(rows[2].revenue, 10.0);
}

#[test]
fn order_outside_window_contributes_nothing() {
    let mut store = three_nation_store();
    for (key, date) in [(4, "1993-12-31"), (5, "1995-01-01")] {
        store.orders.push(Order {
            order_key: OrderKey(key),
            cust_key: CustKey(1),
            order_date: date.to_string(),
        });
        store.line_items.push(LineItem {
            order_key: OrderKey(key),
            supp_key: SuppKey(1),
            extended_price: 1_000_000.0,
            discount: 0.0,
        });
    }
    let rows = run(&store, config("TEST", 3));
    assert_eq!(names(&rows), vec!["B", "A", "C"]);
    assert_eq!(rows[1].revenue, 50.0);
}

#[test]
fn unmatched_region_yields_empty_result() {
    let out = RegionalRevenueQuery::new(config("NOWHERE", 4))
        .expect("valid config")
        .execute(&three_nation_store())
        .expect("empty result is not an error");
    assert!(out.rows.is_empty());
    assert_eq!(out.workers.len(), 4);
}

#[test]
fn invalid_config_is_rejected_before_execution() {
    let err = RegionalRevenueQuery::new(config("TEST", 0)).expect_err("zero workers");
    assert!(matches!(err, RvqError::InvalidConfig(_)));
}

#[test]
fn caller_supplied_registry_receives_query_metrics() {
    let registry = MetricsRegistry::new();
    let out = RegionalRevenueQuery::new(config("TEST", 2))
        .expect("valid config")
        .with_metrics(registry.clone())
        .execute(&three_nation_store())
        .expect("execute");

    let label = format!("query_id=\"{}\"", out.query_id);
    let text = registry.render_prometheus();
    assert!(text.contains("rvq_result_groups"), "{text}");
    assert!(text.contains(&label), "{text}");
    assert!(!global_metrics().render_prometheus().contains(&label));
}

#[test]
fn cross_nation_line_item_is_skipped() {
    let mut store = three_nation_store();
    // customer of A buys from supplier of B
    store.line_items.push(LineItem {
        order_key: OrderKey(1),
        supp_key: SuppKey(2),
        extended_price: 500.0,
        discount: 0.0,
    });
    let rows = run(&store, config("TEST", 1));
    assert_eq!(names(&rows), vec!["B", "A", "C"]);
    assert_eq!(rows[0].revenue, 200.0);
}

#[test]
fn non_finite_price_aborts_the_run() {
    let mut store = three_nation_store();
    store.line_items[1].extended_price = f64::NAN;
    let err = RegionalRevenueQuery::new(config("TEST", 2))
        .expect("valid config")
        .execute(&store)
        .expect_err("nan price");
    assert!(matches!(err, RvqError::InputFormat(_)));
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// TPC-H shaped data: 5 regions, 25 nations, skewed dates across 1992-1998.
fn synthetic_store(seed: u64, line_items: usize) -> RowStore {
    let mut rng = Lcg(seed);
    let region_names = ["AFRICA", "AMERICA", "ASIA", "EUROPE", "MIDDLE EAST"];
    let mut store = RowStore::default();
    for (i, name) in region_names.into_iter().enumerate() {
        store.regions.push(Region { region_key: RegionKey(i as i64), name: name.to_string() });
    }
    for n in 0..25_i64 {
        store.nations.push(Nation {
            nation_key: NationKey(n),
            name: format!("NATION_{n:02}"),
            region_key: RegionKey(n % 5),
        });
    }
    for c in 0..300_i64 {
        store.customers.push(Customer {
            cust_key: CustKey(c),
            nation_key: NationKey((rng.next() % 25) as i64),
        });
    }
    for s in 0..40_i64 {
        store.suppliers.push(Supplier {
            supp_key: SuppKey(s),
            nation_key: NationKey((rng.next() % 25) as i64),
        });
    }
    for o in 0..2_000_i64 {
        let year = 1992 + rng.next() % 7;
        let month = 1 + rng.next() % 12;
        let day = 1 + rng.next() % 28;
        store.orders.push(Order {
            order_key: OrderKey(o),
            // a few orders reference customers that do not exist
            cust_key: CustKey((rng.next() % 310) as i64),
            order_date: format!("{year:04}-{month:02}-{day:02}"),
        });
    }
    for _ in 0..line_items {
        store.line_items.push(LineItem {
            order_key: OrderKey((rng.next() % 2_050) as i64),
            supp_key: SuppKey((rng.next() % 40) as i64),
            extended_price: 900.0 + (rng.next() % 100_000) as f64 / 100.0,
            discount: (rng.next() % 11) as f64 / 100.0,
        });
    }
    store
}

/// Row-at-a-time evaluation straight off the base tables.
fn reference_revenue(store: &RowStore, cfg: &QueryConfig) -> HashMap<String, f64> {
    let region_keys = store
        .regions
        .iter()
        .filter(|r| r.name == cfg.region_name)
        .map(|r| r.region_key)
        .collect::<Vec<_>>();
    let nation = |k: NationKey| store.nations.iter().find(|n| n.nation_key == k);
    let orders = store
        .orders
        .iter()
        .map(|o| (o.order_key, o))
        .collect::<HashMap<_, _>>();
    let customers = store
        .customers
        .iter()
        .map(|c| (c.cust_key, c.nation_key))
        .collect::<HashMap<_, _>>();
    let suppliers = store
        .suppliers
        .iter()
        .map(|s| (s.supp_key, s.nation_key))
        .collect::<HashMap<_, _>>();

    let mut out = HashMap::new();
    for item in &store.line_items {
        let Some(order) = orders.get(&item.order_key) else { continue };
        if order.order_date.as_str() < cfg.start_date.as_str()
            || order.order_date.as_str() >= cfg.end_date.as_str()
        {
            continue;
        }
        let (Some(c_nation), Some(s_nation)) =
            (customers.get(&order.cust_key), suppliers.get(&item.supp_key))
        else {
            continue;
        };
        if c_nation != s_nation {
            continue;
        }
        let Some(n) = nation(*c_nation) else { continue };
        if !region_keys.contains(&n.region_key) {
            continue;
        }
        *out.entry(n.name.clone()).or_insert(0.0) +=
            revenue_contribution(item.extended_price, item.discount);
    }
    out
}

fn assert_close(a: f64, b: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() / scale < 1e-9, "{a} vs {b}");
}

#[test]
fn result_is_independent_of_worker_count() {
    let store = synthetic_store(42, 20_000);
    let single = run(&store, config("ASIA", 1));
    let eight = run(&store, config("ASIA", 8));
    assert!(!single.is_empty());
    assert_eq!(names(&single), names(&eight));
    for (a, b) in single.iter().zip(eight.iter()) {
        assert_close(a.revenue, b.revenue);
    }

    let many = run(&store, config("ASIA", 33));
    assert_eq!(names(&single), names(&many));
}

#[test]
fn matches_row_at_a_time_reference() {
    let store = synthetic_store(7, 10_000);
    for region in ["AFRICA", "ASIA", "MIDDLE EAST"] {
        let cfg = config(region, 6);
        let expected = reference_revenue(&store, &cfg);
        let rows = run(&store, cfg);

        assert_eq!(rows.len(), expected.len(), "{region}");
        for row in &rows {
            let want = expected.get(&row.nation_name).expect("nation in reference");
            assert_close(row.revenue, *want);
            // only nations of the target region can appear
            let nation = store
                .nations
                .iter()
                .find(|n| n.name == row.nation_name)
                .expect("known nation");
            let region_key = store
                .regions
                .iter()
                .find(|r| r.name == region)
                .expect("known region")
                .region_key;
            assert_eq!(nation.region_key, region_key);
        }
        assert!(rows.windows(2).all(|w| w[0].revenue >= w[1].revenue));
    }
}

#[test]
fn more_workers_than_line_items() {
    let store = three_nation_store();
    let rows = run(&store, config("TEST", 64));
    assert_eq!(names(&rows), vec!["B", "A", "C"]);
}
