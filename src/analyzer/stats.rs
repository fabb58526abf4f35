//! Shared numeric helpers for the aggregators.

/// Arithmetic mean. Returns 0.0 for an empty slice, which is also the
/// fill value the metric tables use for missing groups.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fractional days between two instants measured in seconds. Negative
/// inputs (dirty data where resolution precedes creation) pass through
/// unchanged so the caller still gets a computable mean.
pub fn seconds_to_days(seconds: i64) -> f64 {
    seconds as f64 / 86_400.0
}
