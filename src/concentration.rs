// Time of concentration formulas [h]
use crate::error::{HydroError, HydroResult, require_non_negative, require_positive};

/// Kirpich: `tc = 0.066 * L^0.77 * S^-0.385`
///
/// `length` is the main channel length [km], `slope` its mean slope [m/m].
pub fn kirpich(length: f64, slope: f64) -> HydroResult<f64> {
    let length = require_positive("channel_length", length)?;
    let slope = require_positive("slope", slope)?;
    Ok(0.066 * length.powf(0.77) * slope.powf(-0.385))
}

/// Uruguayan regional formula: `tc = 6.625 * A^0.3 * S^-0.38 * C^-0.45`
///
/// `area` in km², `slope` [m/m], `runoff_coefficient` [-].
pub fn uruguay(area: f64, slope: f64, runoff_coefficient: f64) -> HydroResult<f64> {
    let area = require_positive("area", area)?;
    let slope = require_positive("slope", slope)?;
    let c = require_positive("runoff_coefficient", runoff_coefficient)?;
    Ok(6.625 * area.powf(0.3) * slope.powf(-0.38) * c.powf(-0.45))
}

/// Mean channel slope [m/m] from the basin relief [m] over the channel length [km].
pub fn channel_slope(max_elevation: f64, min_elevation: f64, length: f64) -> HydroResult<f64> {
    let length = require_positive("channel_length", length)?;
    let relief = max_elevation - min_elevation;
    if !relief.is_finite() || relief <= 0.0 {
        return Err(HydroError::invalid(
            "relief",
            relief,
            "max elevation must exceed min elevation",
        ));
    }
    Ok(relief / 1000.0 / length)
}

// Adds an entry (lag) time to a formula result
pub fn with_lag(tc: f64, lag: f64) -> HydroResult<f64> {
    let tc = require_positive("tc", tc)?;
    let lag = require_non_negative("lag", lag)?;
    Ok(tc + lag)
}
