//! Synchrotron spectrum of an attached electron distribution
//!
//! The electron distribution is itself a catalog function. When attached it
//! is given units `(particle_energy, particle_energy^-1)` from the current
//! [`UnitSystem`](crate::UnitSystem) and wrapped in a [`ParticleDistribution`]
//! adapter that converts between those units and the cgs quantities used by
//! the emission kernel.

use ndarray::{Array1, ArrayD};

use crate::functions::{ExtraSetup, Function, FunctionDict, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::radiative::SynchrotronEmission;
use crate::units::{get_units, PhysicalType, Unit, CENTIMETER, ERG, GAUSS, GIGAELECTRONVOLT, KILOPARSEC};
use crate::{FunctionError, Params};

#[derive(Params)]
struct SynchrotronParams {
    b: f64,
    distance: f64,
    emin: f64,
    emax: f64,
    need: f64,
}

static SYNCHROTRON: FunctionInfo = FunctionInfo {
    name: "synchrotron",
    description: "Synchrotron spectrum from an input particle distribution",
    latex: None,
    parameters: &[
        ParameterSpec {
            name: "B",
            description: "magnetic field",
            initial: 3.24e-6,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Fixed(&GAUSS),
        },
        ParameterSpec {
            name: "distance",
            description: "distance of the source",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Fixed(&KILOPARSEC),
        },
        ParameterSpec {
            name: "emin",
            description: "minimum energy for the particle distribution",
            initial: 1.0,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::Fixed(&GIGAELECTRONVOLT),
        },
        ParameterSpec {
            name: "emax",
            description: "maximum energy for the particle distribution",
            initial: 510e3,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::Fixed(&GIGAELECTRONVOLT),
        },
        ParameterSpec {
            name: "need",
            description: "number of points per decade in which to evaluate the function",
            initial: 10.0,
            min: Some(2.0),
            max: Some(100.0),
            fix: true,
            unit: UnitRule::Dimensionless,
        },
    ],
};

/// Electron distribution attached to a [`Synchrotron`] function.
///
/// The wrapped function takes energies in the particle energy unit and
/// returns a density per particle energy unit; [`dn_de`](Self::dn_de) works in
/// erg on both sides.
#[derive(Debug)]
pub struct ParticleDistribution {
    function: Box<dyn Function>,
    /// erg expressed in the particle energy unit
    erg_to_particle: f64,
}

impl ParticleDistribution {
    /// Wrap `function`, assigning it units from the current unit system
    pub fn new(mut function: Box<dyn Function>) -> Result<Self, FunctionError> {
        let particle_energy = get_units().particle_energy;
        function.set_units(&particle_energy, &particle_energy.inverse())?;
        let erg_to_particle = Unit::from(&ERG).conversion_factor(&particle_energy)?;

        tracing::debug!(
            function = function.name(),
            unit = %particle_energy,
            "particle distribution attached"
        );

        Ok(Self {
            function,
            erg_to_particle,
        })
    }

    pub fn function(&self) -> &dyn Function {
        self.function.as_ref()
    }

    pub fn function_mut(&mut self) -> &mut dyn Function {
        self.function.as_mut()
    }

    /// Density in 1/erg at electron energies in erg
    pub fn dn_de(&self, energies: &Array1<f64>) -> Result<Array1<f64>, FunctionError> {
        let x = energies.mapv(|e| e * self.erg_to_particle).into_dyn();
        let density = self.function.call(&x)?;
        Ok(density.iter().map(|n| n * self.erg_to_particle).collect())
    }
}

/// Synchrotron photon spectrum; only usable as a differential photon flux
/// against photon energy.
#[derive(Debug)]
pub struct Synchrotron {
    parameters: Parameters,
    particle_distribution: Option<ParticleDistribution>,
    x_unit: Option<Unit>,
    y_unit: Option<Unit>,
}

impl Synchrotron {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(SYNCHROTRON.parameters),
            particle_distribution: None,
            x_unit: None,
            y_unit: None,
        }
    }

    pub fn set_particle_distribution(&mut self, function: Box<dyn Function>) -> Result<(), FunctionError> {
        self.particle_distribution = Some(ParticleDistribution::new(function)?);
        Ok(())
    }

    pub fn particle_distribution(&self) -> Option<&dyn Function> {
        self.particle_distribution.as_ref().map(|p| p.function())
    }

    pub fn particle_distribution_mut(&mut self) -> Option<&mut dyn Function> {
        self.particle_distribution.as_mut().map(|p| p.function_mut())
    }

    fn usage_error(reason: &str) -> FunctionError {
        FunctionError::InvalidUsage {
            function: SYNCHROTRON.name,
            reason: reason.to_string(),
        }
    }
}

impl Default for Synchrotron {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Synchrotron {
    fn info(&self) -> &'static FunctionInfo {
        &SYNCHROTRON
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn set_units(&mut self, x_unit: &Unit, y_unit: &Unit) -> Result<(), FunctionError> {
        if x_unit.physical_type() != PhysicalType::Energy {
            return Err(Self::usage_error(
                "Unit for x is not an energy. The function synchrotron can only be used as a spectrum",
            ));
        }

        let units = get_units();
        let should_be_unitless = y_unit * &(&(&units.photon_energy * &units.time) * &units.area);
        if !should_be_unitless.is_dimensionless() {
            return Err(Self::usage_error(
                "Unit for y is not differential flux. The function synchrotron can only be used as a spectrum.",
            ));
        }

        self.parameters.assign_units(SYNCHROTRON.parameters, x_unit, y_unit);
        self.x_unit = Some(x_unit.clone());
        self.y_unit = Some(y_unit.clone());
        Ok(())
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let SynchrotronParams {
            b,
            distance,
            emin,
            emax,
            need,
        } = SynchrotronParams::from_slice(params)?;
        let distribution = self
            .particle_distribution
            .as_ref()
            .ok_or(FunctionError::MissingParticleDistribution)?;

        let units = get_units();
        let x_unit = self.x_unit.clone().unwrap_or_else(|| units.photon_energy.clone());
        let y_unit = self.y_unit.clone().unwrap_or_else(|| units.differential_flux());

        let erg = Unit::from(&ERG);
        let gev_to_erg = Unit::from(&GIGAELECTRONVOLT).conversion_factor(&erg)?;
        let kpc_to_cm = Unit::from(&KILOPARSEC).conversion_factor(&Unit::from(&CENTIMETER))?;
        let x_to_erg = x_unit.conversion_factor(&erg)?;
        let flux_to_y = Unit::parse("erg-1 cm-2 s-1")?.conversion_factor(&y_unit)?;

        let emission = SynchrotronEmission::new(b, emin * gev_to_erg, emax * gev_to_erg, need);
        let photon_energies: Vec<f64> = x.iter().map(|e| e * x_to_erg).collect();
        let flux = emission.flux(&photon_energies, distance * kpc_to_cm, |e| {
            distribution.dn_de(e)
        })?;

        let mut y = x.mapv(|_| 0.0);
        for (out, value) in y.iter_mut().zip(flux) {
            *out = value * flux_to_y;
        }
        Ok(y)
    }

    fn to_dict(&self, minimal: bool) -> FunctionDict {
        let extra_setup = match (&self.particle_distribution, minimal) {
            (Some(distribution), false) => Some(ExtraSetup {
                particle_distribution: distribution.function().path(),
            }),
            _ => None,
        };
        FunctionDict {
            name: self.name().to_string(),
            parameters: self.parameters.iter().map(|p| p.to_dict(minimal)).collect(),
            extra_setup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{Gaussian, PowerLaw};
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    fn with_powerlaw_electrons() -> Synchrotron {
        let mut synchrotron = Synchrotron::new();
        synchrotron
            .set_particle_distribution(Box::new(PowerLaw::new()))
            .unwrap();
        synchrotron
    }

    #[test]
    fn fixed_parameter_units() {
        let synchrotron = Synchrotron::new();
        let unit = |name: &str| synchrotron.parameters().get(name).unwrap().unit().cloned();
        assert_eq!(unit("B"), Some(Unit::parse("G").unwrap()));
        assert_eq!(unit("distance"), Some(Unit::parse("kpc").unwrap()));
        assert_eq!(unit("emin"), Some(Unit::parse("GeV").unwrap()));
    }

    #[test]
    fn x_must_be_an_energy() {
        let mut synchrotron = Synchrotron::new();
        let err = synchrotron
            .set_units(&Unit::parse("s").unwrap(), &Unit::parse("keV-1 cm-2 s-1").unwrap())
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidUsage { function: "synchrotron", .. }));
    }

    #[test]
    fn y_must_be_a_differential_flux() {
        let mut synchrotron = Synchrotron::new();
        let kev = Unit::parse("keV").unwrap();
        assert!(synchrotron
            .set_units(&kev, &Unit::parse("cm-2 s-1").unwrap())
            .is_err());
        assert!(synchrotron
            .set_units(&kev, &Unit::parse("erg-1 cm-2 s-1").unwrap())
            .is_ok());
    }

    #[test]
    fn evaluation_requires_particle_distribution() {
        let synchrotron = Synchrotron::new();
        assert_eq!(
            synchrotron.call(&arr1(&[1.0]).into_dyn()).unwrap_err(),
            FunctionError::MissingParticleDistribution
        );
    }

    #[test]
    fn particle_distribution_gets_particle_energy_units() {
        let synchrotron = with_powerlaw_electrons();
        let distribution = synchrotron.particle_distribution().unwrap();
        assert_eq!(
            distribution.parameters().get("K").unwrap().unit(),
            Some(&Unit::parse("keV-1").unwrap())
        );
    }

    #[test]
    fn dn_de_is_per_erg() {
        let distribution = ParticleDistribution::new(Box::new(PowerLaw::new())).unwrap();
        let kev_in_erg = Unit::parse("keV").unwrap().conversion_factor(&Unit::parse("erg").unwrap()).unwrap();
        let n = distribution.dn_de(&arr1(&[kev_in_erg, 10.0 * kev_in_erg])).unwrap();
        // K (E / 1 keV)^-2 per keV
        assert_relative_eq!(n[0], 1.0 / kev_in_erg, max_relative = 1e-12);
        assert_relative_eq!(n[1], 0.01 / kev_in_erg, max_relative = 1e-12);
    }

    #[test]
    fn spectrum_keeps_input_shape() {
        let synchrotron = with_powerlaw_electrons();
        let x = arr2(&[[1.0, 10.0], [100.0, 1000.0]]).into_dyn();
        let y = synchrotron.call(&x).unwrap();
        assert_eq!(y.shape(), x.shape());
        assert!(y.iter().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn output_follows_y_unit() {
        let kev = Unit::parse("keV").unwrap();
        let mut per_kev = with_powerlaw_electrons();
        per_kev
            .set_units(&kev, &Unit::parse("keV-1 cm-2 s-1").unwrap())
            .unwrap();
        let mut per_erg = with_powerlaw_electrons();
        per_erg
            .set_units(&kev, &Unit::parse("erg-1 cm-2 s-1").unwrap())
            .unwrap();

        let x = arr1(&[5.0]).into_dyn();
        let ratio = per_erg.call(&x).unwrap()[[0]] / per_kev.call(&x).unwrap()[[0]];
        let kev_per_erg = Unit::parse("erg").unwrap().conversion_factor(&kev).unwrap();
        assert_relative_eq!(ratio, kev_per_erg, max_relative = 1e-10);
    }

    #[test]
    fn serialization_records_particle_distribution() {
        let mut synchrotron = Synchrotron::new();
        assert!(synchrotron.to_dict(false).extra_setup.is_none());

        synchrotron
            .set_particle_distribution(Box::new(Gaussian::new()))
            .unwrap();
        let dict = synchrotron.to_dict(false);
        assert_eq!(dict.extra_setup.unwrap().particle_distribution, "gaussian");
        assert!(synchrotron.to_dict(true).extra_setup.is_none());
    }
}
