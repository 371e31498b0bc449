//! Typed identifiers for table keys and query executions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! table_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(
            /// Raw key value as stored in the source table.
            pub i64,
        );

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

table_key!(
    /// `r_regionkey`.
    RegionKey
);
table_key!(
    /// `n_nationkey`; also the target of `c_nationkey` and `s_nationkey`.
    NationKey
);
table_key!(
    /// `c_custkey`; also the target of `o_custkey`.
    CustKey
);
table_key!(
    /// `s_suppkey`; also the target of `l_suppkey`.
    SuppKey
);
table_key!(
    /// `o_orderkey`; also the target of `l_orderkey`.
    OrderKey
);

/// Identifier of one query execution, used to label logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryId(
    /// Raw numeric id value.
    pub u64,
);

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);

impl QueryId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}
