use thiserror::Error;

/// Canonical error taxonomy shared by the loader, engine and client.
///
/// Classification guidance:
/// - [`RvqError::InvalidConfig`]: bad region/date/worker settings, CLI flags or catalog entries,
///   all detected before any row is processed
/// - [`RvqError::InputFormat`]: table data that cannot be decoded (unparseable numeric, short row,
///   non-finite price or discount on a qualifying line item)
/// - [`RvqError::Execution`]: runtime failures of the engine itself (worker panic/spawn failure)
/// - [`RvqError::Io`]: raw filesystem failures from std APIs
///
/// Every variant is fatal for the run; there is no retry path.
#[derive(Debug, Error)]
pub enum RvqError {
    /// Invalid or inconsistent query configuration.
    ///
    /// Examples:
    /// - empty region name
    /// - date bound not in `YYYY-MM-DD` form, or start after end
    /// - zero worker threads
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed table input.
    ///
    /// Examples:
    /// - `l_extendedprice` is not a number
    /// - row has fewer columns than the table layout requires
    #[error("input format error: {0}")]
    InputFormat(String),

    /// Engine failures after configuration and input were accepted.
    #[error("execution error: {0}")]
    Execution(String),

    /// Transparent std IO failures.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Standard result alias.
pub type Result<T> = std::result::Result<T, RvqError>;
