use std::path::PathBuf;

use rvq_common::{QueryConfig, QuerySettings, Result, RvqError, default_workers};

/// Everything one `rvq` invocation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub query: QueryConfig,
    pub table_path: PathBuf,
    pub result_path: PathBuf,
    pub catalog: Option<PathBuf>,
    pub print_metrics: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunOptions),
    Help,
}

pub fn usage() -> &'static str {
    "Usage:
  rvq --r_name NAME --start_date YYYY-MM-DD --end_date YYYY-MM-DD
      --table_path DIR --result_path FILE [--threads N]
      [--catalog FILE.json] [--config FILE.json] [--metrics]

  --threads defaults to the number of available CPUs.
  --config supplies query settings as JSON; explicit flags override it.
  Set RUST_LOG (e.g. RUST_LOG=debug) to adjust logging."
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<Command> {
    let mut region_name = None;
    let mut start_date = None;
    let mut end_date = None;
    let mut threads = None;
    let mut table_path = None;
    let mut result_path = None;
    let mut catalog = None;
    let mut config_path = None;
    let mut print_metrics = false;

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => return Ok(Command::Help),
            "--metrics" => print_metrics = true,
            "--r_name" => region_name = Some(value(args, &mut i, flag)?),
            "--start_date" => start_date = Some(value(args, &mut i, flag)?),
            "--end_date" => end_date = Some(value(args, &mut i, flag)?),
            "--threads" => {
                let raw = value(args, &mut i, flag)?;
                let n = raw.parse::<usize>().map_err(|e| {
                    RvqError::InvalidConfig(format!("invalid value for --threads ({raw:?}): {e}"))
                })?;
                threads = Some(n);
            }
            "--table_path" => table_path = Some(PathBuf::from(value(args, &mut i, flag)?)),
            "--result_path" => result_path = Some(PathBuf::from(value(args, &mut i, flag)?)),
            "--catalog" => catalog = Some(PathBuf::from(value(args, &mut i, flag)?)),
            "--config" => config_path = Some(PathBuf::from(value(args, &mut i, flag)?)),
            other => {
                return Err(RvqError::InvalidConfig(format!("unknown argument: {other}")));
            }
        }
        i += 1;
    }

    // Flags win over the config file; region and both dates must come from one of them.
    let settings = match &config_path {
        Some(path) => QuerySettings::load_from_json(path)?,
        None => QuerySettings::default(),
    };
    let query = QueryConfig {
        region_name: required(region_name.or(settings.region_name), "--r_name")?,
        start_date: required(start_date.or(settings.start_date), "--start_date")?,
        end_date: required(end_date.or(settings.end_date), "--end_date")?,
        workers: threads.or(settings.workers).unwrap_or_else(default_workers),
    };

    Ok(Command::Run(RunOptions {
        query,
        table_path: required(table_path, "--table_path")?,
        result_path: required(result_path, "--result_path")?,
        catalog,
        print_metrics,
    }))
}

fn value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| RvqError::InvalidConfig(format!("missing value for {flag}")))
}

fn required<T>(v: Option<T>, flag: &str) -> Result<T> {
    v.ok_or_else(|| RvqError::InvalidConfig(format!("missing required argument {flag}")))
}
