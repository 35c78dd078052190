//! Shared object types for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use num_complex::Complex64;
use std::sync::Arc;
use uq_core::{Error, Id, Interval, PersistentId, Point, Result};
use uq_persistence::{Advocate, Buildable, Handle, PersistentObject, StorageManager};

/// Leaf object holding one value of each scalar kind
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    pub id: PersistentId,
    pub name: String,
    pub level: f64,
    pub impedance: Complex64,
    pub count: u32,
    pub enabled: bool,
}

impl Gauge {
    pub fn new(name: &str, level: f64) -> Self {
        Self {
            id: PersistentId::new(),
            name: name.to_string(),
            level,
            impedance: Complex64::new(level, -1.5),
            count: 7,
            enabled: true,
        }
    }
}

impl PersistentObject for Gauge {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_attribute("name", &self.name)?;
        adv.save_attribute("level", &self.level)?;
        adv.save_attribute("impedance", &self.impedance)?;
        adv.save_attribute("count", &self.count)?;
        adv.save_attribute("enabled", &self.enabled)
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.load_attribute("name", &mut self.name)?;
        adv.load_attribute("level", &mut self.level)?;
        adv.load_attribute("impedance", &mut self.impedance)?;
        adv.load_attribute("count", &mut self.count)?;
        adv.load_attribute("enabled", &mut self.enabled)
    }
}

impl Buildable for Gauge {
    const CLASS_NAME: &'static str = "Gauge";
}

/// Composite object sharing its bounds with other owners
#[derive(Debug, Default)]
pub struct Domain {
    pub id: PersistentId,
    pub bounds: Option<Arc<Interval>>,
    pub gauges: Vec<Arc<Gauge>>,
    pub weights: Vec<f64>,
}

impl PersistentObject for Domain {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        if let Some(bounds) = &self.bounds {
            adv.save_object_attribute("bounds", bounds.as_ref())?;
        }
        adv.save_attribute("gauge_count", &self.gauges.len())?;
        for (index, gauge) in self.gauges.iter().enumerate() {
            adv.save_indexed_object(index, gauge.as_ref())?;
        }
        adv.save_values("weights", &self.weights)
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        self.bounds = adv.load_object_attribute::<Interval>("bounds")?;
        let mut count = 0usize;
        adv.load_attribute("gauge_count", &mut count)?;
        self.gauges.clear();
        for index in 0..count {
            if let Some(gauge) = adv.load_indexed_object::<Gauge>(index)? {
                self.gauges.push(gauge);
            }
        }
        adv.load_values("weights", &mut self.weights)
    }
}

impl Buildable for Domain {
    const CLASS_NAME: &'static str = "Domain";
}

/// Object exposing its implementation through an interface
#[derive(Debug, Default)]
pub struct Holder {
    pub id: PersistentId,
    pub gauge: Handle<Gauge>,
}

impl PersistentObject for Holder {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_interface_attribute("gauge", &self.gauge)
    }

    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.load_interface_attribute("gauge", &mut self.gauge)
    }
}

impl Buildable for Holder {
    const CLASS_NAME: &'static str = "Holder";
}

/// Object trying to overwrite the reserved `class` attribute
#[derive(Debug, Default)]
pub struct Impostor {
    pub id: PersistentId,
}

impl PersistentObject for Impostor {
    fn class_name(&self) -> &'static str {
        "Impostor"
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        adv.save_attribute("class", &"Gauge".to_string())
    }

    fn load(&mut self, _adv: &mut Advocate<'_>) -> Result<()> {
        Ok(())
    }
}

/// Object whose save fails after writing part of its body
#[derive(Debug, Default)]
pub struct Flaky {
    pub id: PersistentId,
    pub gauge: Option<Arc<Gauge>>,
}

impl PersistentObject for Flaky {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> Id {
        self.id.get()
    }

    fn save(&self, adv: &mut Advocate<'_>) -> Result<()> {
        if let Some(gauge) = &self.gauge {
            adv.save_object_attribute("gauge", gauge.as_ref())?;
        }
        adv.save_attribute("half", &0.5)?;
        Err(Error::Internal("flaky object refuses to finish".to_string()))
    }

    fn load(&mut self, _adv: &mut Advocate<'_>) -> Result<()> {
        Ok(())
    }
}

impl Buildable for Flaky {
    const CLASS_NAME: &'static str = "Flaky";
}

pub fn unit_square() -> Arc<Interval> {
    Arc::new(Interval::new(Point::zeros(2), Point::filled(2, 1.0)).unwrap())
}

/// Manager knowing every test class
pub fn register_all(manager: &mut StorageManager) {
    manager.register::<Gauge>();
    manager.register::<Domain>();
    manager.register::<Holder>();
    manager.register::<Flaky>();
}
