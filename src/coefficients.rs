/*!
Regional adjustment factors for the reference rainfall depth.

The design depth for a storm of duration `d` is the reference depth (maximum 3-hour
rainfall with a 10-year return period) scaled by three empirical factors:

- `CT(Tr)` adjusts for the return period,
- `CA(A, d)` reduces point rainfall over a basin of area `A` (km²),
- `CD(d)` converts the 3-hour depth to a depth of duration `d` (hours).

The formulas are fixed regional fits; nothing here is calibrated.
*/
use crate::error::{HydroError, HydroResult, require_non_negative, require_positive};

// Breakpoint between the short- and long-duration CD fits [h]
pub const DURATION_BREAKPOINT: f64 = 3.0;

/**
Return-period factor `CT(Tr) = 0.5786 - 0.4312 * log10(ln(Tr / (Tr - 1)))`.

# Errors
`InvalidParameter` when `Tr <= 1` (the Gumbel term is undefined).
*/
pub fn return_period_factor(return_period: f64) -> HydroResult<f64> {
    if !return_period.is_finite() || return_period <= 1.0 {
        return Err(HydroError::invalid(
            "return_period",
            return_period,
            "must be greater than 1 year",
        ));
    }
    let ln_term = (return_period / (return_period - 1.0)).ln();
    Ok(0.5786 - 0.4312 * ln_term.log10())
}

/**
Areal reduction factor `CA(A, d) = 1 - 0.3549 * d^-0.4272 * (1 - e^(-0.005792 A))`.

Tends to 1 for small basins or long durations.

# Errors
`InvalidParameter` when `duration <= 0` or `area < 0`.
*/
pub fn area_factor(area: f64, duration: f64) -> HydroResult<f64> {
    let area = require_non_negative("area", area)?;
    let duration = require_positive("duration", duration)?;
    Ok(1.0 - (0.3549 * duration.powf(-0.4272)) * (1.0 - (-0.005792 * area).exp()))
}

/**
Duration factor `CD(d)`, piecewise around 3 hours.

The two branches do not meet exactly at the breakpoint; the small jump is part of
the regional fit and is kept as is.
*/
pub fn duration_factor(duration: f64) -> HydroResult<f64> {
    let d = require_positive("duration", duration)?;
    if d <= DURATION_BREAKPOINT {
        Ok((0.6208 * d) / (d + 0.0137).powf(0.5639))
    } else {
        Ok((1.0287 * d) / (d + 1.0293).powf(0.8083))
    }
}
