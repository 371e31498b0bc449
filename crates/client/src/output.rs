use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rvq_common::Result;
use rvq_execution::NationRevenue;

/// Write `name|revenue` lines (revenue with 4 decimals) in the given order.
///
/// The file is created or truncated; an empty result leaves it empty.
pub fn write_results(path: &Path, rows: &[NationRevenue]) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("create {} failed: {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

pub fn write_rows<W: Write>(out: &mut W, rows: &[NationRevenue]) -> Result<()> {
    for row in rows {
        writeln!(out, "{}|{:.4}", row.nation_name, row.revenue)?;
    }
    Ok(())
}
