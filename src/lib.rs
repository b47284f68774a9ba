pub mod coefficients;
pub mod concentration;
pub mod convolution;
pub mod error;
pub mod precipitation;
pub mod resample;
pub mod runoff;
pub mod scenario;
pub mod storm;
pub mod unit_hydrograph;

pub use convolution::OutflowHydrograph;
pub use error::{HydroError, HydroResult};
pub use precipitation::DesignHyetogram;
pub use resample::Hyetogram;
pub use runoff::LossSeries;
pub use scenario::Scenario;
pub use storm::{DesignStorm, StormParameters};
pub use unit_hydrograph::UnitHydrograph;
