//! Per-criterion application quota.
//!
//! Spreads a bounded daily application allowance across however many concurrent
//! search criteria a user maintains: the more criteria, the smaller each
//! criterion's slice.

/// Cap on applications one criterion run may produce, derived from the
/// user's active-criterion count. Monotonic step function.
pub fn per_criterion(active_criteria: usize) -> usize {
    if active_criteria <= 4 {
        7
    } else if active_criteria >= 8 {
        2
    } else {
        6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_few_criteria_get_the_largest_cap() {
        assert_eq!(per_criterion(0), 7);
        assert_eq!(per_criterion(1), 7);
        assert_eq!(per_criterion(4), 7);
    }

    #[test]
    fn test_mid_range_gets_six() {
        assert_eq!(per_criterion(5), 6);
        assert_eq!(per_criterion(6), 6);
        assert_eq!(per_criterion(7), 6);
    }

    #[test]
    fn test_many_criteria_get_two() {
        assert_eq!(per_criterion(8), 2);
        assert_eq!(per_criterion(12), 2);
    }

    #[test]
    fn test_step_function_is_monotonically_non_increasing() {
        let mut prev = per_criterion(0);
        for count in 1..=16 {
            let cap = per_criterion(count);
            assert!(cap <= prev, "cap increased at count {count}");
            prev = cap;
        }
    }
}
