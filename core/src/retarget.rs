//! # Difficulty Retarget
//!
//! Averaging window difficulty adjustment. The next target is the average
//! target of the last `N` blocks scaled by how long those blocks took,
//! measured between two medians of `M` timestamps rather than raw block
//! times.
//!
//! Targets are computed with unbounded precision while the mainchain
//! truncates to 256 bits at every division, so a computed value may differ
//! from the mainchain's by one compact unit. [`BITS_TOLERANCE`] absorbs that.

use crate::config::NetworkParams;
use crate::target::target_to_bits;
use crate::timestamp::median_time_past;
use crate::window::PowWindow;
use num_bigint::BigUint;

/// Largest accepted distance between computed and claimed compact bits.
///
/// The distance is taken between the raw `u32` encodings, so one unit is a
/// different target delta for every exponent.
pub const BITS_TOLERANCE: u32 = 1;

/// Computes the compact target of the next block from the average target of
/// the averaging window and the medians at its two ends.
pub fn calculate_next_work_required(
    avg_target: &BigUint,
    first_time: i32,
    last_time: i32,
    params: &NetworkParams,
) -> u32 {
    let averaging_window_timespan = params.averaging_window_timespan();

    let mut actual_timespan = last_time as i64 - first_time as i64;
    // Only a quarter of the deviation is applied. `/` truncates toward zero.
    actual_timespan =
        averaging_window_timespan + (actual_timespan - averaging_window_timespan) / 4;
    actual_timespan = actual_timespan
        .max(params.min_actual_timespan())
        .min(params.max_actual_timespan());

    // Only reachable with a paramset that fails validation.
    let actual_timespan = u64::try_from(actual_timespan).unwrap_or(0);
    let averaging_window_timespan = u64::try_from(averaging_window_timespan).unwrap_or(1).max(1);

    let mut new_target = avg_target * actual_timespan / averaging_window_timespan;

    let pow_limit = params.pow_limit();
    if new_target > pow_limit {
        new_target = pow_limit;
    }

    target_to_bits(&new_target)
}

/// Bits the header following `window` must carry.
pub fn next_bits(window: &PowWindow, params: &NetworkParams) -> u32 {
    let times = window.times();
    let first_time = median_time_past(
        &times,
        times.len() - params.pow_averaging_window(),
        params.median_time_span(),
    );
    let last_time = median_time_past(&times, times.len(), params.median_time_span());

    calculate_next_work_required(&window.average_target(), first_time, last_time, params)
}

/// Returns true if `claimed` is within [`BITS_TOLERANCE`] of `expected`.
pub fn bits_within_tolerance(expected: u32, claimed: u32) -> bool {
    expected.abs_diff(claimed) <= BITS_TOLERANCE
}
