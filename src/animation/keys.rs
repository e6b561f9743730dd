use std::cmp::Ordering;

use crate::errors::{Result, RigError};

/// Checks that a track has at least one key and strictly ascending times.
pub(crate) fn validate_key_times(label: impl FnOnce() -> String, times: &[f32]) -> Result<()> {
    if times.is_empty() {
        return Err(RigError::EmptyTrack(label()));
    }

    for (index, pair) in times.windows(2).enumerate() {
        // NaN keys compare as `None` and are rejected too.
        if pair[0].partial_cmp(&pair[1]) != Some(Ordering::Less) {
            return Err(RigError::NonAscendingKeyframes {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    Ok(())
}

/// Index of the interval `[times[i], times[i + 1]]` to blend in, given the
/// count of keys satisfying the search predicate.
///
/// Only valid once the clamp branches (including NaN) have been taken, which
/// guarantees `times.len() >= 2` and a query strictly inside the key range.
#[inline]
pub(crate) fn interval_start(partition: usize, key_count: usize) -> usize {
    partition.saturating_sub(1).min(key_count.saturating_sub(2))
}
