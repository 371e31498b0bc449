//! Row store and `.tbl` loading for the regional revenue query.
//!
//! Key modules:
//! - [`rows`]: typed records and the [`RowStore`] container
//! - [`tbl`]: dbgen `.tbl` decoding
//! - [`catalog`]: table name to file mapping
//! - [`provider`]: the [`RowSource`] seam consumed by the client

pub mod catalog;
pub mod provider;
pub mod rows;
pub mod tbl;

pub use catalog::*;
pub use provider::*;
pub use rows::*;
