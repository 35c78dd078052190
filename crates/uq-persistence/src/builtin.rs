//! Persistence of the core containers

use crate::advocate::Advocate;
use crate::object::{Buildable, PersistentObject};
use uq_core::{Description, Id, Interval, Point, Result, Sample};

impl PersistentObject for Interval {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        Interval::id(self)
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_attribute("dimension", &self.dimension())?;
        adv.save_values("lower_bound", self.lower_bound().as_slice())?;
        adv.save_values("upper_bound", self.upper_bound().as_slice())?;
        adv.save_values("finite_lower_bound", self.finite_lower_bound())?;
        adv.save_values("finite_upper_bound", self.finite_upper_bound())
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        let mut lower: Vec<f64> = Vec::new();
        let mut upper: Vec<f64> = Vec::new();
        let mut finite_lower: Vec<bool> = Vec::new();
        let mut finite_upper: Vec<bool> = Vec::new();
        adv.load_values("lower_bound", &mut lower)?;
        adv.load_values("upper_bound", &mut upper)?;
        adv.load_values("finite_lower_bound", &mut finite_lower)?;
        adv.load_values("finite_upper_bound", &mut finite_upper)?;
        *self = Interval::with_finiteness(
            Point::new(lower),
            Point::new(upper),
            finite_lower,
            finite_upper,
        )?;
        Ok(())
    }
}

impl Buildable for Interval {
    const CLASS_NAME: &'static str = "Interval";
}

impl PersistentObject for Sample {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        Sample::id(self)
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_attribute("dimension", &self.dimension())?;
        adv.save_attribute("size", &self.len())?;
        adv.save_values("description", self.description().labels())?;
        adv.save_values("data", self.as_flat())
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        let mut dimension = 0usize;
        let mut labels: Vec<String> = Vec::new();
        let mut data: Vec<f64> = Vec::new();
        adv.load_attribute("dimension", &mut dimension)?;
        adv.load_values("description", &mut labels)?;
        adv.load_values("data", &mut data)?;
        let mut sample = Sample::from_flat(dimension, data)?;
        if !labels.is_empty() {
            sample.set_description(Description::new(labels))?;
        }
        *self = sample;
        Ok(())
    }
}

impl Buildable for Sample {
    const CLASS_NAME: &'static str = "Sample";
}
