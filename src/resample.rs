// Volume-conserving resampling of a hyetogram onto a uniform step
use crate::error::{HydroError, HydroResult, require_positive};

#[derive(Debug, Clone, PartialEq)]
pub struct Hyetogram {
    pub times: Vec<f64>,  // [h]
    pub depths: Vec<f64>, // [mm]
}

impl Hyetogram {
    pub fn total_depth(&self) -> f64 {
        self.depths.iter().sum()
    }
}

/**
Reinterpolates a hyetogram onto a uniform grid of roughly `step` hours.

The new grid spans the first to the last original time with
`trunc((t_last - t_first) / step)` intervals. Depths are linearly interpolated and
then rescaled so that the total depth equals the original total.

# Errors
`InvalidParameter` when the step is not positive, the span holds no whole step, the
times are not strictly increasing, or the interpolated depths carry no rain while the
original does.
*/
pub fn resample(times: &[f64], depths: &[f64], step: f64) -> HydroResult<Hyetogram> {
    let step = require_positive("step", step)?;
    if times.is_empty() {
        return Err(HydroError::EmptySeries { name: "times" });
    }
    if times.len() != depths.len() {
        return Err(HydroError::LengthMismatch {
            name: "depths",
            expected: times.len(),
            actual: depths.len(),
        });
    }
    if let Some(w) = times.windows(2).find(|w| !(w[1] > w[0])) {
        return Err(HydroError::invalid(
            "times",
            w[1],
            "must be strictly increasing",
        ));
    }

    let start = times[0];
    let end = times[times.len() - 1];
    let intervals = ((end - start) / step) as usize;
    if intervals == 0 {
        return Err(HydroError::invalid(
            "step",
            step,
            "longer than the hyetogram span",
        ));
    }

    let new_times: Vec<f64> = (0..=intervals)
        .map(|k| {
            if k == intervals {
                end
            } else {
                start + (end - start) * k as f64 / intervals as f64
            }
        })
        .collect();
    let mut new_depths: Vec<f64> = new_times
        .iter()
        .map(|&t| interpolate(times, depths, t))
        .collect();

    let original: f64 = depths.iter().sum();
    let interpolated: f64 = new_depths.iter().sum();
    if interpolated == 0.0 {
        if original != 0.0 {
            return Err(HydroError::invalid(
                "step",
                step,
                "resampled grid misses all the rainfall",
            ));
        }
    } else {
        let scale = original / interpolated;
        new_depths.iter_mut().for_each(|d| *d *= scale);
    }
    log::debug!(
        "resampled {} steps to {} (step {step} h, {original:.3} mm)",
        times.len(),
        new_times.len()
    );

    Ok(Hyetogram {
        times: new_times,
        depths: new_depths,
    })
}

// Piecewise linear interpolation, clamped to the end values outside the range
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // First index with xs[i] > x; 1 <= i <= last here
    let i = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
