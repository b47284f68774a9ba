/*!
Discrete convolution of effective precipitation with a unit hydrograph.

The convolution runs over sample indices: ordinate `k` of the unit hydrograph is taken
to lag `k` steps of the effective-precipitation grid. Both series should therefore be
sampled at the same step for the result to be physically meaningful; neither input is
resampled here. The outflow is truncated to the length of the effective series and
stamped with its time grid.
*/
use crate::error::{HydroError, HydroResult};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub struct OutflowHydrograph {
    pub times: Vec<f64>, // [h]
    pub flows: Vec<f64>, // [m³/s]
}

impl OutflowHydrograph {
    /// Largest flow and the time it occurs at.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.times
            .iter()
            .zip(&self.flows)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&t, &q)| (t, q))
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// `out[i] = sum_{j <= i} unit[i - j] * effective[j]` for `i < effective.len()`.
///
/// Assembled as an `n x m` matrix of lagged effective precipitation, row `i` holding
/// `effective[i - k]` for lag `k`, times the first `m = min(unit.len(), n)` unit
/// hydrograph ordinates. Ordinates past `n` never reach the truncated output.
pub fn convolve(unit: &[f64], effective: &[f64]) -> HydroResult<Vec<f64>> {
    if unit.is_empty() {
        return Err(HydroError::EmptySeries {
            name: "unit_hydrograph",
        });
    }
    if effective.is_empty() {
        return Err(HydroError::EmptySeries {
            name: "effective_precipitation",
        });
    }

    let n = effective.len();
    let m = unit.len().min(n);
    let lagged = DMatrix::from_fn(n, m, |i, k| if k <= i { effective[i - k] } else { 0.0 });
    let ordinates = DVector::from_column_slice(&unit[..m]);
    let outflow = lagged * ordinates;
    Ok(outflow.as_slice().to_vec())
}

/// Convolves and stamps the result with the effective-precipitation times.
pub fn outflow_hydrograph(
    times: &[f64],
    effective: &[f64],
    unit: &[f64],
) -> HydroResult<OutflowHydrograph> {
    if times.len() != effective.len() {
        return Err(HydroError::LengthMismatch {
            name: "effective_precipitation",
            expected: times.len(),
            actual: effective.len(),
        });
    }
    let flows = convolve(unit, effective)?;
    if unit.len() < effective.len() {
        log::debug!(
            "unit hydrograph has {} ordinates for {} rainfall steps, tail is zero-padded",
            unit.len(),
            effective.len()
        );
    }
    Ok(OutflowHydrograph {
        times: times.to_vec(),
        flows,
    })
}
