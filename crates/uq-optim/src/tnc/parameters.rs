//! Routine-specific parameters of the TNC solver

use super::routine::{Messages, RoutineOptions};
use crate::config::SolverSettings;
use uq_core::{Id, PersistentId, Point, Result};
use uq_persistence::{Advocate, Buildable, PersistentObject};

/// Parameters of the truncated-Newton routine that the generic
/// [`SolverSettings`] do not cover
///
/// Empty `scale` and `offset` let the routine derive them from the bounds.
#[derive(Debug, Clone)]
pub struct TncParameters {
    id: PersistentId,
    pub scale: Point,
    pub offset: Point,
    /// Hessian-vector products per iteration, `0` for steepest descent
    pub max_cg_iterations: u32,
    pub eta: f64,
    pub stepmx: f64,
    pub accuracy: f64,
    pub fmin: f64,
    pub rescale: f64,
}

impl Default for TncParameters {
    fn default() -> Self {
        Self {
            id: PersistentId::new(),
            scale: Point::default(),
            offset: Point::default(),
            max_cg_iterations: 50,
            eta: 0.25,
            stepmx: 10.0,
            accuracy: 1e-4,
            fmin: 1.0,
            rescale: 1.3,
        }
    }
}

impl PartialEq for TncParameters {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale
            && self.offset == other.offset
            && self.max_cg_iterations == other.max_cg_iterations
            && self.eta == other.eta
            && self.stepmx == other.stepmx
            && self.accuracy == other.accuracy
            && self.fmin == other.fmin
            && self.rescale == other.rescale
    }
}

impl TncParameters {
    /// Routine options for a run under `settings`
    ///
    /// The stopping tolerances come from the settings: f-tolerance from the
    /// residual error, x-tolerance from the absolute error and projected
    /// gradient tolerance from the constraint error.
    pub fn routine_options(&self, settings: &SolverSettings) -> RoutineOptions {
        RoutineOptions {
            messages: if settings.verbose {
                Messages::ALL
            } else {
                Messages::empty()
            },
            max_cg_iterations: i32::try_from(self.max_cg_iterations).unwrap_or(i32::MAX),
            max_evaluations: settings.maximum_iterations_number,
            eta: self.eta,
            stepmx: self.stepmx,
            accuracy: self.accuracy,
            fmin: self.fmin,
            ftol: settings.maximum_residual_error,
            xtol: settings.maximum_absolute_error,
            pgtol: settings.maximum_constraint_error,
            rescale: self.rescale,
            scale: (!self.scale.is_empty()).then(|| self.scale.to_vec()),
            offset: (!self.offset.is_empty()).then(|| self.offset.to_vec()),
        }
    }
}

impl PersistentObject for TncParameters {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_values("scale", self.scale.as_slice())?;
        adv.save_values("offset", self.offset.as_slice())?;
        adv.save_attribute("max_cg_iterations", &self.max_cg_iterations)?;
        adv.save_attribute("eta", &self.eta)?;
        adv.save_attribute("stepmx", &self.stepmx)?;
        adv.save_attribute("accuracy", &self.accuracy)?;
        adv.save_attribute("fmin", &self.fmin)?;
        adv.save_attribute("rescale", &self.rescale)
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        let mut scale: Vec<f64> = Vec::new();
        let mut offset: Vec<f64> = Vec::new();
        adv.load_values("scale", &mut scale)?;
        adv.load_values("offset", &mut offset)?;
        self.scale = Point::new(scale);
        self.offset = Point::new(offset);
        adv.load_attribute("max_cg_iterations", &mut self.max_cg_iterations)?;
        adv.load_attribute("eta", &mut self.eta)?;
        adv.load_attribute("stepmx", &mut self.stepmx)?;
        adv.load_attribute("accuracy", &mut self.accuracy)?;
        adv.load_attribute("fmin", &mut self.fmin)?;
        adv.load_attribute("rescale", &mut self.rescale)
    }
}

impl Buildable for TncParameters {
    const CLASS_NAME: &'static str = "TncParameters";
}
