/// Median of `times[end - span..end]`.
///
/// The slice is copied before sorting. For an even `span` the upper middle
/// element is returned.
///
/// # Panics
///
/// Panics if `span` is zero or the range does not lie inside `times`.
pub fn median_time_past(times: &[i32], end: usize, span: usize) -> i32 {
    assert!(span > 0, "Median span must be positive");
    assert!(
        end >= span && end <= times.len(),
        "Median range {}..{} is outside of {} timestamps",
        end.wrapping_sub(span),
        end,
        times.len()
    );

    let mut sorted = times[end - span..end].to_vec();
    sorted.sort_unstable();
    sorted[span / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median_time_past(&[5, 3, 9, 1, 7], 5, 5), 5);

        let arr = [3, 7, 2, 10, 1, 5, 9, 4, 8, 6, 11];
        assert_eq!(median_time_past(&arr, 11, 11), 6);
    }

    #[test]
    fn test_median_of_sub_window() {
        let times = [100, 1, 2, 3, 200];
        assert_eq!(median_time_past(&times, 4, 3), 2);
        assert_eq!(median_time_past(&times, 5, 3), 3);
        // Input order is left untouched.
        assert_eq!(times, [100, 1, 2, 3, 200]);
    }

    #[test]
    fn test_even_span_takes_upper_middle() {
        assert_eq!(median_time_past(&[4, 1, 3, 2], 4, 4), 3);
    }

    #[test]
    #[should_panic(expected = "Median range")]
    fn test_median_range_too_short() {
        median_time_past(&[1, 2], 2, 3);
    }

    #[test]
    #[should_panic(expected = "Median span must be positive")]
    fn test_median_zero_span() {
        median_time_past(&[1, 2], 2, 0);
    }
}
