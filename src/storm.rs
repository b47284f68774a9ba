//! End-to-end design storm: hyetogram, losses, unit hydrograph and outflow.

use crate::convolution::{OutflowHydrograph, outflow_hydrograph};
use crate::error::HydroResult;
use crate::precipitation::DesignHyetogram;
use crate::resample::{Hyetogram, resample};
use crate::runoff::{LossSeries, effective_precipitation};
use crate::unit_hydrograph::{DEFAULT_SAMPLES, UnitHydrograph};

/// Inputs of one synthesis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormParameters {
    pub tc: f64,               // Time of concentration [h]
    pub step: f64,             // Hyetogram step d [h]
    pub reference_depth: f64,  // Max 3 h depth, 10 year return period [mm]
    pub return_period: f64,    // [years]
    pub area: f64,             // Basin area [km²]
    pub curve_number: f64,     // CN, (0, 100]
    pub min_infiltration: f64, // Minimum infiltration rate [mm/h]
    pub uh_samples: usize,     // Unit hydrograph samples over [0, Tb]
}

impl StormParameters {
    pub fn new(
        tc: f64,
        step: f64,
        reference_depth: f64,
        return_period: f64,
        area: f64,
        curve_number: f64,
        min_infiltration: f64,
    ) -> Self {
        StormParameters {
            tc,
            step,
            reference_depth,
            return_period,
            area,
            curve_number,
            min_infiltration,
            uh_samples: DEFAULT_SAMPLES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DesignStorm {
    pub params: StormParameters,
    pub hyetogram: DesignHyetogram,
    pub losses: LossSeries,
    pub unit_hydrograph: UnitHydrograph,
    pub outflow: OutflowHydrograph,
}

impl DesignStorm {
    /// Runs the whole chain for one basin and keeps every intermediate series.
    pub fn synthesize(params: &StormParameters) -> HydroResult<Self> {
        let hyetogram = DesignHyetogram::synthesize(
            params.tc,
            params.step,
            params.reference_depth,
            params.return_period,
            params.area,
        )?;
        let losses = effective_precipitation(
            &hyetogram.ordered,
            params.curve_number,
            params.step,
            params.min_infiltration,
        )?;
        let unit_hydrograph = UnitHydrograph::synthesize(params.tc, params.area, params.uh_samples)?;
        let outflow = outflow_hydrograph(
            &hyetogram.grid.times,
            &losses.effective,
            &unit_hydrograph.flows,
        )?;

        if let Some((t, q)) = outflow.peak() {
            log::info!(
                "design storm: {:.2} mm rainfall, {:.2} mm effective, peak {q:.2} m3/s at {t:.2} h",
                hyetogram.total_depth(),
                losses.total_effective()
            );
        }

        Ok(DesignStorm {
            params: *params,
            hyetogram,
            losses,
            unit_hydrograph,
            outflow,
        })
    }

    /// The ordered hyetogram resampled to `step` hours, total depth preserved.
    pub fn resampled(&self, step: f64) -> HydroResult<Hyetogram> {
        resample(&self.hyetogram.grid.times, &self.hyetogram.ordered, step)
    }
}
