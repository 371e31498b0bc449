use rvq_common::{Result, RvqError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const REGION: &str = "region";
pub const NATION: &str = "nation";
pub const CUSTOMER: &str = "customer";
pub const SUPPLIER: &str = "supplier";
pub const ORDERS: &str = "orders";
pub const LINEITEM: &str = "lineitem";

/// Every table the query reads, in load order.
pub const QUERY_TABLES: [&str; 6] = [REGION, NATION, CUSTOMER, SUPPLIER, ORDERS, LINEITEM];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub path: PathBuf,
}

/// Table name to `.tbl` file mapping.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    tables: HashMap<String, TableDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// `<dir>/<name>.tbl` for every query table.
    pub fn for_directory(dir: &Path) -> Self {
        let mut cat = Catalog::new();
        for name in QUERY_TABLES {
            cat.register_table(TableDef {
                name: name.to_string(),
                path: dir.join(format!("{name}.tbl")),
            });
        }
        cat
    }

    pub fn register_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Result<&TableDef> {
        self.tables
            .get(name)
            .ok_or_else(|| RvqError::InvalidConfig(format!("unknown table: {name}")))
    }

    /// Apply a JSON list of `{"name": ..., "path": ...}` overrides on top of `self`.
    ///
    /// Relative paths resolve against the catalog file's directory.
    ///
    /// # Errors
    /// An unreadable file, malformed JSON or an unknown table name is a configuration error.
    pub fn apply_json_overrides(&mut self, path: &Path) -> Result<()> {
        let s = fs::read_to_string(path).map_err(|e| {
            RvqError::InvalidConfig(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let tables: Vec<TableDef> = serde_json::from_str(&s)
            .map_err(|e| RvqError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for mut t in tables {
            if !QUERY_TABLES.contains(&t.name.as_str()) {
                return Err(RvqError::InvalidConfig(format!(
                    "catalog {} names unknown table {}",
                    path.display(),
                    t.name
                )));
            }
            if t.path.is_relative() {
                t.path = base.join(&t.path);
            }
            self.register_table(t);
        }
        Ok(())
    }
}
