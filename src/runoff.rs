/*!
NRCS curve number losses.

This module provides the curve number (CN) lookup for common covers and the loss model
that splits a design hyetogram into effective precipitation and infiltration.
Depths are in millimetres, rates in mm/h and steps in hours.
*/
use crate::error::{HydroError, HydroResult, require_non_negative, require_positive};

/**
Looks up the NRCS curve number for average antecedent moisture condition (AMC II).

Covers the agricultural and natural covers most used in design studies. For anything
else pass the curve number directly.

# Arguments
* `soil_group` - Hydrologic soil group ("A", "B", "C", "D").
* `land_use` - Land use description (e.g., "row crops good", "pasture fair").

# Errors
`UnknownCover` if the combination is not in the table.
*/
pub fn curve_number(soil_group: &str, land_use: &str) -> HydroResult<f64> {
    let group = soil_group.trim().to_uppercase();
    let cover = land_use.trim().to_lowercase();
    let row = match cover.as_str() {
        // Row crops, straight row
        "row crops poor" => [72.0, 81.0, 88.0, 91.0],
        "row crops good" => [67.0, 78.0, 85.0, 89.0],

        // Pasture, grassland or range
        "pasture poor" => [68.0, 79.0, 86.0, 89.0],
        "pasture fair" => [49.0, 69.0, 79.0, 84.0],
        "pasture good" => [39.0, 61.0, 74.0, 80.0],

        "meadow" => [30.0, 58.0, 71.0, 78.0],

        "woods poor" => [45.0, 66.0, 77.0, 83.0],
        "woods fair" => [36.0, 60.0, 73.0, 79.0],
        "woods good" => [30.0, 55.0, 70.0, 77.0],

        "impervious" => [98.0, 98.0, 98.0, 98.0],
        _ => return Err(unknown_cover(soil_group, land_use)),
    };
    match group.as_str() {
        "A" => Ok(row[0]),
        "B" => Ok(row[1]),
        "C" => Ok(row[2]),
        "D" => Ok(row[3]),
        _ => Err(unknown_cover(soil_group, land_use)),
    }
}

fn unknown_cover(soil_group: &str, land_use: &str) -> HydroError {
    HydroError::UnknownCover {
        soil_group: soil_group.to_string(),
        land_use: land_use.to_string(),
    }
}

fn check_curve_number(cn: f64) -> HydroResult<f64> {
    if cn.is_finite() && cn > 0.0 && cn <= 100.0 {
        Ok(cn)
    } else {
        Err(HydroError::invalid("curve_number", cn, "must lie in (0, 100]"))
    }
}

// Maximum potential retention S [mm]
pub fn max_retention(cn: f64) -> HydroResult<f64> {
    Ok((25400.0 / check_curve_number(cn)?) - 254.0)
}

// Runoff depth Q = (P - Ia)^2 / (P + 0.8 S), zero until P exceeds Ia = 0.2 S
fn runoff_depth(p: f64, s: f64) -> f64 {
    let ia = 0.2 * s;
    if p <= ia {
        0.0
    } else {
        (p - ia).powi(2) / (p + 0.8 * s)
    }
}

/**
Calculates the runoff depth of a single event using the NRCS Curve Number method.

# Arguments
- `precipitation` - Total event depth in mm.
- `cn` - Curve number.

# Returns
The estimated runoff depth in mm.
*/
pub fn cumulative_runoff(precipitation: f64, cn: f64) -> HydroResult<f64> {
    let s = max_retention(cn)?;
    let p = require_non_negative("precipitation", precipitation)?;
    Ok(runoff_depth(p, s))
}

/// Per-step split of a hyetogram into runoff-producing and infiltrated depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LossSeries {
    pub effective: Vec<f64>,               // Effective precipitation [mm]
    pub infiltration: Vec<f64>,            // Corrected deficit per step [mm]
    pub cumulative_infiltration: Vec<f64>, // [mm]
}

impl LossSeries {
    pub fn total_effective(&self) -> f64 {
        self.effective.iter().sum()
    }

    pub fn total_infiltration(&self) -> f64 {
        self.cumulative_infiltration.last().copied().unwrap_or(0.0)
    }
}

// Running totals carried through the hyetogram
#[derive(Debug, Clone, Copy, Default)]
struct LossState {
    depth: f64,  // Cumulative precipitation [mm]
    runoff: f64, // Cumulative runoff [mm]
    infiltration: f64,
}

/**
Applies curve number losses to an ordered hyetogram.

Each step adds its depth to the running precipitation total; the increase of the
cumulative CN runoff is the step's runoff. The remainder (the deficit) is floored at
the minimum infiltration volume `i_min * step`, and what is left after the floored
deficit is the effective precipitation.

When the floor exceeds the rainfall of a step the effective depth comes out negative.
That value is returned as is.

# Arguments
- `ordered` - Hyetogram depths per step [mm].
- `cn` - Curve number, in (0, 100].
- `step` - Step length [h].
- `min_infiltration` - Minimum infiltration rate [mm/h].
*/
pub fn effective_precipitation(
    ordered: &[f64],
    cn: f64,
    step: f64,
    min_infiltration: f64,
) -> HydroResult<LossSeries> {
    let s = max_retention(cn)?;
    let step = require_positive("step", step)?;
    let floor = require_non_negative("min_infiltration", min_infiltration)? * step;
    log::debug!(
        "curve number {cn}: S = {s:.3} mm, Ia = {:.3} mm, infiltration floor {floor:.3} mm/step",
        0.2 * s
    );

    let mut losses = LossSeries {
        effective: Vec::with_capacity(ordered.len()),
        infiltration: Vec::with_capacity(ordered.len()),
        cumulative_infiltration: Vec::with_capacity(ordered.len()),
    };

    let end = ordered
        .iter()
        .enumerate()
        .fold(LossState::default(), |state, (i, &p)| {
            let depth = state.depth + p;
            let runoff = runoff_depth(depth, s);
            let deficit = p - (runoff - state.runoff);
            let corrected = deficit.max(floor);
            let effective = p - corrected;
            if effective < 0.0 {
                log::warn!(
                    "step {i}: infiltration floor {floor:.3} mm exceeds rainfall {p:.3} mm, effective depth {effective:.3} mm"
                );
            }
            log::trace!("step {i}: P = {p:.3}, R = {runoff:.3}, Pe = {effective:.3}");

            let infiltration = state.infiltration + corrected;
            losses.effective.push(effective);
            losses.infiltration.push(corrected);
            losses.cumulative_infiltration.push(infiltration);
            LossState {
                depth,
                runoff,
                infiltration,
            }
        });
    log::debug!(
        "losses: {:.3} mm rainfall, {:.3} mm runoff, {:.3} mm infiltrated",
        end.depth,
        end.runoff,
        end.infiltration
    );
    Ok(losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn cumsum(values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .scan(0.0, |acc, &v| {
                *acc += v;
                Some(*acc)
            })
            .collect()
    }

    #[test]
    fn curve_number_lookup() {
        assert_eq!(curve_number("B", "row crops good").unwrap(), 78.0);
        assert_eq!(curve_number("c", "Pasture Fair").unwrap(), 79.0);
        assert_eq!(curve_number("D", "woods good").unwrap(), 77.0);
    }

    #[test]
    fn curve_number_unknown_cover() {
        let err = curve_number("E", "row crops good").unwrap_err();
        assert!(matches!(err, HydroError::UnknownCover { .. }));
        assert!(curve_number("A", "parking lot").is_err());
    }

    #[test]
    fn retention_and_abstraction() {
        assert_relative_eq!(max_retention(80.0).unwrap(), 63.5);
        assert_eq!(max_retention(100.0).unwrap(), 0.0);
    }

    #[test]
    fn curve_number_out_of_range_fails() {
        for cn in [0.0, -10.0, 100.5, f64::NAN] {
            assert!(max_retention(cn).unwrap_err().is_invalid_parameter());
            assert!(effective_precipitation(&[10.0], cn, 0.5, 1.0).is_err());
        }
    }

    #[test]
    fn single_event_runoff() {
        // Below the initial abstraction nothing runs off
        assert_eq!(cumulative_runoff(12.0, 80.0).unwrap(), 0.0);
        // (50 - 12.7)^2 / (50 + 50.8)
        assert_relative_eq!(
            cumulative_runoff(50.0, 80.0).unwrap(),
            37.3 * 37.3 / 100.8,
            max_relative = 1e-12
        );
        // Impervious basin: everything runs off
        assert_relative_eq!(cumulative_runoff(25.0, 100.0).unwrap(), 25.0);
    }

    #[test]
    fn hyetogram_losses() {
        let losses = effective_precipitation(&[10.0, 20.0, 30.0, 5.0], 80.0, 0.5, 2.0).unwrap();
        let expected = [0.0, 3.7040841584158386, 16.48806385602459, 3.4286637299464395];
        for (got, want) in losses.effective.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-10);
        }
        for i in 0..4 {
            assert_abs_diff_eq!(
                losses.effective[i] + losses.infiltration[i],
                [10.0, 20.0, 30.0, 5.0][i],
                epsilon = 1e-12
            );
        }
        assert_abs_diff_eq!(
            losses.total_infiltration(),
            65.0 - losses.total_effective(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn effective_never_exceeds_rainfall() {
        let ordered = [4.9, 5.8, 7.5, 10.9, 12.2, 9.1, 6.5, 5.3, 4.6];
        let losses = effective_precipitation(&ordered, 60.0, 0.2, 2.4).unwrap();
        for (e, p) in losses.effective.iter().zip(ordered) {
            assert!(*e <= p);
        }
        let cum = cumsum(&losses.effective);
        assert!(cum.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn floor_above_rainfall_gives_negative_effective() {
        // Floor of 1 mm per step against 0.1 mm of rain
        let losses = effective_precipitation(&[0.1, 50.0, 0.1], 90.0, 1.0, 1.0).unwrap();
        assert_relative_eq!(losses.effective[0], -0.9, max_relative = 1e-12);
        assert_relative_eq!(losses.infiltration[0], 1.0);
        assert!(losses.effective[2] < 0.0);
        assert!(losses.effective[1] > 0.0);
    }

    #[test]
    fn zero_floor_matches_cn_runoff() {
        let ordered = [3.0, 8.0, 25.0, 11.0, 2.0];
        let losses = effective_precipitation(&ordered, 75.0, 0.25, 0.0).unwrap();
        let total = cumulative_runoff(49.0, 75.0).unwrap();
        assert_abs_diff_eq!(losses.total_effective(), total, epsilon = 1e-10);
    }

    #[test]
    fn cumulative_effective_is_monotone_in_each_increment() {
        let base = [2.0, 5.0, 12.0, 8.0, 3.0];
        let reference = cumsum(
            &effective_precipitation(&base, 70.0, 0.5, 2.0)
                .unwrap()
                .effective,
        );
        for j in 0..base.len() {
            let mut bumped = base;
            bumped[j] += 1.5;
            let cum = cumsum(
                &effective_precipitation(&bumped, 70.0, 0.5, 2.0)
                    .unwrap()
                    .effective,
            );
            for i in j..base.len() {
                assert!(cum[i] >= reference[i] - 1e-12, "bump {j}, step {i}");
            }
        }
    }

    #[test]
    fn empty_hyetogram_has_no_losses() {
        let losses = effective_precipitation(&[], 70.0, 0.5, 2.0).unwrap();
        assert_eq!(losses, LossSeries::default());
        assert_eq!(losses.total_infiltration(), 0.0);
    }

    #[test]
    fn bad_step_or_rate_fails() {
        assert!(effective_precipitation(&[1.0], 70.0, 0.0, 2.0).is_err());
        assert!(effective_precipitation(&[1.0], 70.0, 0.5, -2.0).is_err());
    }
}
