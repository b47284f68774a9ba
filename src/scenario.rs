/*!
Basin scenarios read from TOML.

A scenario gathers the physical description of one basin and one design event:

```toml
name = "Arroyo basin, Tr 100"

[basin]
channel_length_km = 58.75
area_km2 = 546.0
max_elevation_m = 310.0
min_elevation_m = 5.0

[concentration]
method = "kirpich"      # "kirpich", "uruguay" or "fixed"

[storm]
reference_depth_mm = 79.0
return_period_years = 100.0
step_hours = 0.0833333333

[soil]
curve_number = 60.0
min_infiltration_mm_h = 2.4
```

`Scenario::to_parameters` resolves the time of concentration and the curve number and
returns the `StormParameters` of the run.
*/
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::concentration::{channel_slope, kirpich, uruguay, with_lag};
use crate::error::{HydroError, HydroResult};
use crate::runoff::curve_number;
use crate::storm::StormParameters;
use crate::unit_hydrograph::DEFAULT_SAMPLES;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub basin: BasinSection,
    pub concentration: ConcentrationSection,
    pub storm: StormSection,
    pub soil: SoilSection,
    #[serde(default)]
    pub unit_hydrograph: UnitHydrographSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasinSection {
    pub area_km2: f64,
    pub channel_length_km: Option<f64>,
    pub max_elevation_m: Option<f64>,
    pub min_elevation_m: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationMethod {
    Kirpich,
    Uruguay,
    Fixed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConcentrationSection {
    pub method: ConcentrationMethod,
    pub runoff_coefficient: Option<f64>, // Uruguay only
    pub hours: Option<f64>,              // Fixed only
    #[serde(default)]
    pub lag_hours: f64, // Entry time added to the formula result
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StormSection {
    pub reference_depth_mm: f64,
    pub return_period_years: f64,
    pub step_hours: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoilSection {
    pub curve_number: Option<f64>,
    pub soil_group: Option<String>,
    pub land_use: Option<String>,
    pub min_infiltration_mm_h: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitHydrographSection {
    pub samples: usize,
}

impl Default for UnitHydrographSection {
    fn default() -> Self {
        UnitHydrographSection {
            samples: DEFAULT_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    pub resample_step_hours: Option<f64>,
}

fn required(name: &'static str, value: Option<f64>, reason: &'static str) -> HydroResult<f64> {
    value.ok_or(HydroError::invalid(name, f64::NAN, reason))
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> HydroResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> HydroResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| HydroError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded scenario from {}", path.display());
        Self::from_toml_str(&text)
    }

    fn slope(&self) -> HydroResult<f64> {
        let basin = &self.basin;
        channel_slope(
            required("max_elevation_m", basin.max_elevation_m, "required to derive the slope")?,
            required("min_elevation_m", basin.min_elevation_m, "required to derive the slope")?,
            required("channel_length_km", basin.channel_length_km, "required to derive the slope")?,
        )
    }

    /// Time of concentration [h], lag included.
    pub fn time_of_concentration(&self) -> HydroResult<f64> {
        let section = &self.concentration;
        let tc = match section.method {
            ConcentrationMethod::Kirpich => {
                let length = required(
                    "channel_length_km",
                    self.basin.channel_length_km,
                    "required by the kirpich method",
                )?;
                kirpich(length, self.slope()?)?
            }
            ConcentrationMethod::Uruguay => {
                let c = required(
                    "runoff_coefficient",
                    section.runoff_coefficient,
                    "required by the uruguay method",
                )?;
                uruguay(self.basin.area_km2, self.slope()?, c)?
            }
            ConcentrationMethod::Fixed => {
                required("hours", section.hours, "required by the fixed method")?
            }
        };
        let tc = with_lag(tc, section.lag_hours)?;
        log::debug!("time of concentration ({:?}): {tc:.3} h", section.method);
        Ok(tc)
    }

    /// Curve number, given directly or looked up from soil group and land use.
    pub fn curve_number(&self) -> HydroResult<f64> {
        let soil = &self.soil;
        match (soil.curve_number, &soil.soil_group, &soil.land_use) {
            (Some(cn), _, _) => Ok(cn),
            (None, Some(group), Some(land_use)) => curve_number(group, land_use),
            _ => Err(HydroError::invalid(
                "curve_number",
                f64::NAN,
                "give curve_number or both soil_group and land_use",
            )),
        }
    }

    pub fn to_parameters(&self) -> HydroResult<StormParameters> {
        Ok(StormParameters {
            tc: self.time_of_concentration()?,
            step: self.storm.step_hours,
            reference_depth: self.storm.reference_depth_mm,
            return_period: self.storm.return_period_years,
            area: self.basin.area_km2,
            curve_number: self.curve_number()?,
            min_infiltration: self.soil.min_infiltration_mm_h,
            uh_samples: self.unit_hydrograph.samples,
        })
    }
}
