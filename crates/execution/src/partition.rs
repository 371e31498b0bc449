use std::ops::Range;

/// Split `[0, len)` into `workers` contiguous ranges.
///
/// Every range but the last has `len / workers` rows; the last one absorbs the
/// remainder. With more workers than rows the leading ranges are empty.
/// `workers == 0` is treated as one worker.
pub fn partition_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = len / workers;
    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == workers { len } else { start + chunk };
            start..end
        })
        .collect()
}
