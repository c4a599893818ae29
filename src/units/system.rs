use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use super::{Unit, CENTIMETER, DEGREE, KILOELECTRONVOLT, SECOND};

/// The set of units physical quantities are expressed in.
///
/// Catalog functions read this when they need a unit that is not given by the
/// coordinate axes, e.g. the energy unit of a synchrotron particle distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSystem {
    pub photon_energy: Unit,
    pub time: Unit,
    pub area: Unit,
    pub particle_energy: Unit,
    pub angle: Unit,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            photon_energy: Unit::from(&KILOELECTRONVOLT),
            time: Unit::from(&SECOND),
            area: Unit::from(&CENTIMETER).powi(2),
            particle_energy: Unit::from(&KILOELECTRONVOLT),
            angle: Unit::from(&DEGREE),
        }
    }
}

impl UnitSystem {
    /// Differential photon flux, `1 / (photon_energy time area)`
    pub fn differential_flux(&self) -> Unit {
        (&(&self.photon_energy * &self.time) * &self.area).inverse()
    }

    pub fn with_photon_energy(mut self, unit: Unit) -> Self {
        self.photon_energy = unit;
        self
    }

    pub fn with_time(mut self, unit: Unit) -> Self {
        self.time = unit;
        self
    }

    pub fn with_area(mut self, unit: Unit) -> Self {
        self.area = unit;
        self
    }

    pub fn with_particle_energy(mut self, unit: Unit) -> Self {
        self.particle_energy = unit;
        self
    }

    pub fn with_angle(mut self, unit: Unit) -> Self {
        self.angle = unit;
        self
    }
}

lazy_static! {
    static ref UNITS: RwLock<UnitSystem> = RwLock::new(UnitSystem::default());
}

/// Current process-wide unit system
pub fn get_units() -> UnitSystem {
    UNITS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Replace the process-wide unit system
pub fn set_units(system: UnitSystem) {
    *UNITS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = system;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_differential_flux() {
        let system = UnitSystem::default();
        assert_eq!(
            system.differential_flux(),
            Unit::parse("keV-1 s-1 cm-2").unwrap()
        );
    }

    #[test]
    fn roundtrips_through_json() {
        let system = UnitSystem::default().with_particle_energy(Unit::parse("GeV").unwrap());
        let json = serde_json::to_string(&system).unwrap();
        assert!(json.contains("\"particle_energy\":\"GeV\""));
        let back: UnitSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, system);
    }
}
