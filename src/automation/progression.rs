//! Level/interval progression — pure step functions of the monotonic
//! total-processed counter.
//!
//! The first levels come from a configured threshold table; past the table
//! the gap to the next level is an arithmetic progression (a constant
//! increment that itself grows by a fixed step each level). Implemented as
//! a table lookup with a closed-form fallback rather than a per-tick loop.

use crate::shared::*;

/// Total-processed counts required to reach automation levels 2..=6.
pub const AUTOMATION_THRESHOLDS: [u64; 5] = [10, 25, 50, 100, 200];
/// First post-table gap between levels.
pub const AUTOMATION_INCREMENT: u64 = 150;
/// Growth of that gap per further level.
pub const AUTOMATION_STEP: u64 = 50;

/// Total-processed counts required to reach processing levels 2..=6.
pub const PROCESSING_THRESHOLDS: [u64; 5] = [5, 15, 40, 90, 180];
pub const PROCESSING_INCREMENT: u64 = 120;
pub const PROCESSING_STEP: u64 = 40;

/// Cumulative counter needed beyond the table for `n` extra levels:
/// increments are `increment, increment + step, increment + 2*step, …`.
fn extra_required(n: u64, increment: u64, step: u64) -> u64 {
    n * increment + step * n.saturating_sub(1) * n / 2
}

fn level_from_counter(counter: u64, thresholds: &[u64], increment: u64, step: u64) -> u32 {
    let within = thresholds.iter().filter(|&&t| counter >= t).count() as u32;
    if (within as usize) < thresholds.len() {
        return 1 + within;
    }

    let last = *thresholds.last().unwrap_or(&0);
    let rem = counter - last;

    // Closed-form estimate for the largest n with extra_required(n) <= rem,
    // from the quadratic step*n^2 + (2*increment - step)*n - 2*rem = 0.
    let mut n = if step == 0 {
        if increment == 0 { 0 } else { rem / increment }
    } else {
        let b = (2 * increment) as f64 - step as f64;
        let disc = b * b + 8.0 * step as f64 * rem as f64;
        (((-b + disc.sqrt()) / (2.0 * step as f64)).floor()).max(0.0) as u64
    };
    // Correct for float rounding at the boundary.
    while extra_required(n + 1, increment, step) <= rem {
        n += 1;
    }
    while n > 0 && extra_required(n, increment, step) > rem {
        n -= 1;
    }

    1 + thresholds.len() as u32 + n as u32
}

/// Automation level for a given total-processed count. Non-decreasing.
pub fn automation_level(total_processed: u64) -> u32 {
    level_from_counter(
        total_processed,
        &AUTOMATION_THRESHOLDS,
        AUTOMATION_INCREMENT,
        AUTOMATION_STEP,
    )
}

/// Scheduler interval for a level. Non-increasing, floored at the minimum.
pub fn automation_interval(level: u32) -> f32 {
    (AUTOMATION_BASE_INTERVAL - (level.saturating_sub(1)) as f32 * AUTOMATION_INTERVAL_DECAY)
        .max(AUTOMATION_MIN_INTERVAL)
}

/// Processing (coop) level for a given total-processed count.
pub fn processing_level(total_processed: u64) -> u32 {
    level_from_counter(
        total_processed,
        &PROCESSING_THRESHOLDS,
        PROCESSING_INCREMENT,
        PROCESSING_STEP,
    )
}

pub fn processing_interval(level: u32) -> f32 {
    (PROCESSING_BASE_INTERVAL - (level.saturating_sub(1)) as f32 * PROCESSING_INTERVAL_DECAY)
        .max(PROCESSING_MIN_INTERVAL)
}

/// Coop queue capacity at a processing level. Non-decreasing, capped.
pub fn coop_capacity(level: u32) -> usize {
    (COOP_BASE_CAPACITY + level.saturating_sub(1) as usize).min(COOP_MAX_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference implementation: walk thresholds one level at a time.
    fn brute_force_level(counter: u64, thresholds: &[u64], increment: u64, step: u64) -> u32 {
        let mut level = 1u32;
        let mut next = match thresholds.first() {
            Some(&t) => t,
            None => return level,
        };
        let mut idx = 0usize;
        let mut gap = increment;
        loop {
            if counter < next {
                return level;
            }
            level += 1;
            idx += 1;
            if idx < thresholds.len() {
                next = thresholds[idx];
            } else {
                next += gap;
                gap += step;
            }
            if level > 10_000 {
                panic!("runaway level derivation");
            }
        }
    }

    #[test]
    fn test_table_levels() {
        assert_eq!(automation_level(0), 1);
        assert_eq!(automation_level(9), 1);
        assert_eq!(automation_level(10), 2);
        assert_eq!(automation_level(25), 3);
        assert_eq!(automation_level(199), 5);
        assert_eq!(automation_level(200), 6);
    }

    #[test]
    fn test_closed_form_matches_brute_force() {
        for counter in (0..5000).step_by(7) {
            assert_eq!(
                automation_level(counter),
                brute_force_level(
                    counter,
                    &AUTOMATION_THRESHOLDS,
                    AUTOMATION_INCREMENT,
                    AUTOMATION_STEP
                ),
                "mismatch at counter {}",
                counter
            );
            assert_eq!(
                processing_level(counter),
                brute_force_level(
                    counter,
                    &PROCESSING_THRESHOLDS,
                    PROCESSING_INCREMENT,
                    PROCESSING_STEP
                ),
                "processing mismatch at counter {}",
                counter
            );
        }
    }

    #[test]
    fn test_level_monotonic_in_counter() {
        let mut last = 0;
        for counter in 0..3000 {
            let level = automation_level(counter);
            assert!(level >= last, "level regressed at counter {}", counter);
            last = level;
        }
    }

    #[test]
    fn test_interval_non_increasing_in_level() {
        let mut last = f32::MAX;
        for level in 1..60 {
            let interval = automation_interval(level);
            assert!(interval <= last);
            assert!(interval >= AUTOMATION_MIN_INTERVAL);
            last = interval;
        }
    }

    #[test]
    fn test_capacity_non_decreasing_and_capped() {
        let mut last = 0;
        for level in 1..40 {
            let cap = coop_capacity(level);
            assert!(cap >= last);
            assert!(cap <= COOP_MAX_CAPACITY);
            last = cap;
        }
    }
}
