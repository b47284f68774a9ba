//! NRCS triangular unit hydrograph.
//!
//! Rises linearly from zero to the peak `qp` at `Tp` and recedes linearly back to zero
//! at the base time `Tb = 2.67 Tp`.

use crate::error::{HydroError, HydroResult, require_positive};

// Default number of samples over [0, Tb]
pub const DEFAULT_SAMPLES: usize = 100;

// Recession factor, Tb = (1 + X) * Tp
const RECESSION: f64 = 1.67;

// Peak factor, qp = 0.208 * A / Tp with A in km² and Tp in h
const PEAK_FACTOR: f64 = 0.208;

#[derive(Debug, Clone)]
pub struct UnitHydrograph {
    pub peak_time: f64, // Tp [h]
    pub base_time: f64, // Tb [h]
    pub peak_flow: f64, // qp [m³/s per mm]
    pub times: Vec<f64>,
    pub flows: Vec<f64>,
}

impl UnitHydrograph {
    /// Triangular unit hydrograph of a basin sampled at `samples` points on `[0, Tb]`.
    pub fn synthesize(tc: f64, area: f64, samples: usize) -> HydroResult<Self> {
        let tc = require_positive("tc", tc)?;
        let area = require_positive("area", area)?;
        if samples < 2 {
            return Err(HydroError::invalid(
                "samples",
                samples as f64,
                "need at least two samples",
            ));
        }

        let d = tc / 7.0;
        let peak_time = d / 2.0 + 0.6 * tc;
        let base_time = (1.0 + RECESSION) * peak_time;
        let peak_flow = PEAK_FACTOR * (area / peak_time);
        log::debug!(
            "unit hydrograph: Tp = {peak_time:.3} h, Tb = {base_time:.3} h, qp = {peak_flow:.3} m3/s"
        );

        let mut uh = UnitHydrograph {
            peak_time,
            base_time,
            peak_flow,
            times: Vec::with_capacity(samples),
            flows: Vec::with_capacity(samples),
        };
        let last = (samples - 1) as f64;
        for k in 0..samples {
            let t = if k == samples - 1 {
                base_time
            } else {
                base_time * k as f64 / last
            };
            let q = uh.flow_at(t);
            uh.times.push(t);
            uh.flows.push(q);
        }
        Ok(uh)
    }

    pub fn with_default_samples(tc: f64, area: f64) -> HydroResult<Self> {
        Self::synthesize(tc, area, DEFAULT_SAMPLES)
    }

    /// Flow of the triangle at time `t`, zero outside `[0, Tb]`.
    pub fn flow_at(&self, t: f64) -> f64 {
        if t <= 0.0 || t >= self.base_time {
            0.0
        } else if t <= self.peak_time {
            self.peak_flow * (t / self.peak_time)
        } else {
            self.peak_flow * (1.0 - (t - self.peak_time) / (self.base_time - self.peak_time))
        }
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}
