/*!
Design hyetogram synthesis.

The storm lasts `D = 12 * tc / 7` hours and is discretised into `ceil(D / d)` steps of
length `d`. Cumulative depths come from the regional depth-duration-frequency relation
(`coefficients`), increments are their first difference, and the increments are then
rearranged with the alternating block method so the most intense block sits in the
middle of the storm.
*/
use crate::coefficients::{area_factor, duration_factor, return_period_factor};
use crate::error::{HydroResult, require_non_negative, require_positive};

// Storm duration as a multiple of tc / 7
const STORM_BLOCKS: f64 = 12.0;

/// Total storm duration `D = tc / 7 * 12` [h].
pub fn storm_duration(tc: f64) -> HydroResult<f64> {
    let tc = require_positive("tc", tc)?;
    Ok(tc / 7.0 * STORM_BLOCKS)
}

// Uniform grid of storm time marks k*d, k = 1..=intervals [h]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    pub step: f64,       // Step d [h]
    pub times: Vec<f64>, // Time marks, no sample at t = 0
}

impl TimeGrid {
    pub fn new(duration: f64, step: f64) -> HydroResult<Self> {
        let duration = require_positive("duration", duration)?;
        let step = require_positive("step", step)?;
        let intervals = (duration / step).ceil() as usize;
        let times = (1..=intervals).map(|k| k as f64 * step).collect();
        Ok(TimeGrid { step, times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Synthesised storm on its grid, before infiltration losses.
#[derive(Debug, Clone)]
pub struct DesignHyetogram {
    pub grid: TimeGrid,
    pub cumulative: Vec<f64>, // Cumulative depth at each time mark [mm]
    pub increments: Vec<f64>, // Depth fallen during each step, chronological [mm]
    pub ordered: Vec<f64>,    // Increments rearranged by the alternating block rule [mm]
}

impl DesignHyetogram {
    /// Builds the design hyetogram of a basin.
    ///
    /// - `tc` - time of concentration [h]
    /// - `step` - hyetogram step `d` [h]
    /// - `reference_depth` - maximum 3 h depth for a 10 year return period [mm]
    /// - `return_period` - design return period [years]
    /// - `area` - basin area [km²]
    pub fn synthesize(
        tc: f64,
        step: f64,
        reference_depth: f64,
        return_period: f64,
        area: f64,
    ) -> HydroResult<Self> {
        let duration = storm_duration(tc)?;
        let grid = TimeGrid::new(duration, step)?;
        log::debug!(
            "storm of {duration:.3} h split into {} steps of {step:.4} h, grid ends at {:.3} h",
            grid.len(),
            grid.times.last().copied().unwrap_or(0.0)
        );
        let cumulative = cumulative_depths(&grid, reference_depth, return_period, area)?;
        let increments = increments(&cumulative);
        let ordered = alternating_block(&increments);
        Ok(DesignHyetogram {
            grid,
            cumulative,
            increments,
            ordered,
        })
    }

    pub fn total_depth(&self) -> f64 {
        self.ordered.iter().sum()
    }
}

/// Cumulative design depth `P = P_ref * CT(Tr) * CA(A, t) * CD(t)` at each grid time.
pub fn cumulative_depths(
    grid: &TimeGrid,
    reference_depth: f64,
    return_period: f64,
    area: f64,
) -> HydroResult<Vec<f64>> {
    let reference_depth = require_non_negative("reference_depth", reference_depth)?;
    let ct = return_period_factor(return_period)?;
    grid.times
        .iter()
        .map(|&t| -> HydroResult<f64> {
            Ok(reference_depth * ct * area_factor(area, t)? * duration_factor(t)?)
        })
        .collect()
}

/// First difference of a cumulative series with an implicit leading zero.
pub fn increments(cumulative: &[f64]) -> Vec<f64> {
    let mut previous = 0.0;
    cumulative
        .iter()
        .map(|&p| {
            let inc = p - previous;
            previous = p;
            inc
        })
        .collect()
}

/**
Alternating block arrangement of precipitation increments.

The increments are sorted in descending order (stable, so ties keep their original
order). The largest goes to slot `n / 2`; the rest are dealt alternately to the left
(odd rank) and to the right (even rank) of the centre, each side filling outwards.
An increment whose side has already walked off the array is dropped and its slot
keeps the initial zero.
*/
pub fn alternating_block(increments: &[f64]) -> Vec<f64> {
    let n = increments.len();
    let mut blocks = vec![0.0; n];
    if n == 0 {
        return blocks;
    }

    let mut sorted = increments.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mid = n / 2;
    blocks[mid] = sorted[0];

    let mut left = mid.checked_sub(1);
    let mut right = mid + 1;
    for (rank, &depth) in sorted.iter().enumerate().skip(1) {
        if rank % 2 == 0 {
            if right < n {
                blocks[right] = depth;
                right += 1;
            } else {
                log::warn!("alternating block: rank {rank} ({depth:.4} mm) dropped on the right");
            }
        } else if let Some(slot) = left {
            blocks[slot] = depth;
            left = slot.checked_sub(1);
        } else {
            log::warn!("alternating block: rank {rank} ({depth:.4} mm) dropped on the left");
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sorted_desc(values: &[f64]) -> Vec<f64> {
        let mut v = values.to_vec();
        v.sort_by(|a, b| b.total_cmp(a));
        v
    }

    #[test]
    fn storm_duration_is_twelve_sevenths_of_tc() {
        assert_relative_eq!(storm_duration(1.0).unwrap(), 12.0 / 7.0);
        assert!(storm_duration(0.0).unwrap_err().is_invalid_parameter());
        assert!(storm_duration(-1.0).is_err());
    }

    #[test]
    fn grid_rounds_intervals_up() {
        let grid = TimeGrid::new(12.0 / 7.0, 0.2).unwrap();
        assert_eq!(grid.len(), 9);
        assert_relative_eq!(grid.times[0], 0.2);
        assert_relative_eq!(grid.times[8], 1.8, epsilon = 1e-12);
    }

    #[test]
    fn grid_with_step_longer_than_storm_has_one_point() {
        let grid = TimeGrid::new(0.5, 2.0).unwrap();
        assert_eq!(grid.times, vec![2.0]);
    }

    #[test]
    fn grid_end_overshoots_duration_by_less_than_a_step() {
        for (tc, step) in [(1.0, 0.2), (11.515759553631511, 0.0833333333), (0.7, 0.05)] {
            let duration = storm_duration(tc).unwrap();
            let hyeto = DesignHyetogram::synthesize(tc, step, 79.0, 100.0, 546.0).unwrap();
            let end = *hyeto.grid.times.last().unwrap();
            assert!(end >= duration - 1e-9, "tc = {tc}");
            assert!(end - step < duration, "tc = {tc}");
        }
        // 12/7 h on a 0.2 h grid ends at 1.8 h, not at D
        let hyeto = DesignHyetogram::synthesize(1.0, 0.2, 79.0, 100.0, 546.0).unwrap();
        assert!(hyeto.grid.times[8] - storm_duration(1.0).unwrap() > 0.08);
    }

    #[test]
    fn grid_rejects_bad_step() {
        assert!(TimeGrid::new(1.0, 0.0).is_err());
        assert!(TimeGrid::new(1.0, -0.1).is_err());
    }

    #[test]
    fn increments_difference_with_leading_zero() {
        assert_eq!(increments(&[2.0, 5.0, 5.0, 9.0]), vec![2.0, 3.0, 0.0, 4.0]);
        assert!(increments(&[]).is_empty());
    }

    #[test]
    fn alternating_block_four_increments() {
        assert_eq!(
            alternating_block(&[10.0, 5.0, 3.0, 1.0]),
            vec![1.0, 5.0, 10.0, 3.0]
        );
    }

    #[test]
    fn alternating_block_is_order_independent() {
        assert_eq!(
            alternating_block(&[3.0, 1.0, 10.0, 5.0]),
            vec![1.0, 5.0, 10.0, 3.0]
        );
    }

    #[test]
    fn alternating_block_single_and_empty() {
        assert_eq!(alternating_block(&[7.5]), vec![7.5]);
        assert!(alternating_block(&[]).is_empty());
    }

    #[test]
    fn alternating_block_two_and_three() {
        // n = 2: centre is index 1, the second value goes left
        assert_eq!(alternating_block(&[1.0, 4.0]), vec![1.0, 4.0]);
        assert_eq!(alternating_block(&[1.0, 4.0, 2.0]), vec![2.0, 4.0, 1.0]);
    }

    #[test]
    fn alternating_block_five() {
        assert_eq!(
            alternating_block(&[5.0, 4.0, 3.0, 2.0, 1.0]),
            vec![2.0, 4.0, 5.0, 3.0, 1.0]
        );
    }

    #[test]
    fn alternating_block_conserves_values_and_centres_peak() {
        for n in 1..=60 {
            let incs: Vec<f64> = (0..n).map(|k| 1.0 + ((k * 37) % 11) as f64 * 0.5).collect();
            let blocks = alternating_block(&incs);
            assert_eq!(blocks.len(), n);
            assert_eq!(sorted_desc(&blocks), sorted_desc(&incs), "n = {n}");
            let max = incs.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(blocks[n / 2], max, "n = {n}");
            // Every slot is filled, none is left at the initial zero
            assert!(blocks.iter().all(|&b| b > 0.0), "n = {n}");
        }
    }

    #[test]
    fn alternating_block_keeps_duplicates() {
        let blocks = alternating_block(&[2.0, 2.0, 2.0, 1.0]);
        assert_eq!(blocks, vec![1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn cumulative_depths_reference_scenario() {
        let grid = TimeGrid::new(storm_duration(1.0).unwrap(), 0.2).unwrap();
        let cum = cumulative_depths(&grid, 79.0, 100.0, 546.0).unwrap();
        assert_eq!(cum.len(), 9);
        assert_relative_eq!(cum[0], 10.927037201686336, max_relative = 1e-10);
        assert_relative_eq!(cum[8], 66.84430316514329, max_relative = 1e-10);
        assert!(cum.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn cumulative_depths_propagate_bad_return_period() {
        let grid = TimeGrid::new(1.0, 0.5).unwrap();
        assert!(cumulative_depths(&grid, 79.0, 1.0, 546.0).is_err());
        assert!(cumulative_depths(&grid, -1.0, 10.0, 546.0).is_err());
    }

    #[test]
    fn synthesize_reference_scenario() {
        let storm = DesignHyetogram::synthesize(1.0, 0.2, 79.0, 100.0, 546.0).unwrap();
        assert_eq!(storm.increments.len(), 9);
        let total: f64 = storm.increments.iter().sum();
        assert_abs_diff_eq!(total, storm.cumulative[8], epsilon = 1e-9);
        assert_abs_diff_eq!(storm.total_depth(), total, epsilon = 1e-9);
        // Largest increment (the second step here) lands in slot 4
        assert_relative_eq!(storm.ordered[4], 12.181493353444985, max_relative = 1e-10);
        assert_relative_eq!(storm.ordered[0], 4.891356071578649, max_relative = 1e-10);
        assert_relative_eq!(storm.ordered[8], 4.557753987439753, max_relative = 1e-10);
    }

    #[test]
    fn synthesize_rejects_zero_tc() {
        let err = DesignHyetogram::synthesize(0.0, 0.2, 79.0, 100.0, 546.0).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
