//! Solver configuration

use serde::{Deserialize, Serialize};
use uq_core::{Error, Result};
use uq_persistence::Advocate;

/// Stopping rules shared by every solver
///
/// Can be read from JSON; missing fields take their default.
///
/// ```rust
/// use uq_optim::SolverSettings;
///
/// let settings = SolverSettings::from_json_str(r#"{ "maximum_iterations_number": 500 }"#)?;
/// assert_eq!(settings.maximum_iterations_number, 500);
/// assert_eq!(settings.maximum_absolute_error, 1e-5);
/// # Ok::<(), uq_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Evaluation budget handed to the routine
    pub maximum_iterations_number: usize,
    pub maximum_absolute_error: f64,
    pub maximum_relative_error: f64,
    pub maximum_residual_error: f64,
    pub maximum_constraint_error: f64,
    pub verbose: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            maximum_iterations_number: 100,
            maximum_absolute_error: 1e-5,
            maximum_relative_error: 1e-5,
            maximum_residual_error: 1e-5,
            maximum_constraint_error: 1e-5,
            verbose: false,
        }
    }
}

impl SolverSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Serialization(format!("invalid solver settings: {e}")))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("cannot encode solver settings: {e}")))
    }

    pub(crate) fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_attribute("maximum_iterations_number", &self.maximum_iterations_number)?;
        adv.save_attribute("maximum_absolute_error", &self.maximum_absolute_error)?;
        adv.save_attribute("maximum_relative_error", &self.maximum_relative_error)?;
        adv.save_attribute("maximum_residual_error", &self.maximum_residual_error)?;
        adv.save_attribute("maximum_constraint_error", &self.maximum_constraint_error)?;
        adv.save_attribute("verbose", &self.verbose)
    }

    pub(crate) fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.load_attribute("maximum_iterations_number", &mut self.maximum_iterations_number)?;
        adv.load_attribute("maximum_absolute_error", &mut self.maximum_absolute_error)?;
        adv.load_attribute("maximum_relative_error", &mut self.maximum_relative_error)?;
        adv.load_attribute("maximum_residual_error", &mut self.maximum_residual_error)?;
        adv.load_attribute("maximum_constraint_error", &mut self.maximum_constraint_error)?;
        adv.load_attribute("verbose", &mut self.verbose)
    }
}
