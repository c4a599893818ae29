//! Registry of the catalog functions available in this build
//!
//! Some functions depend on optional numerical capabilities selected through
//! cargo features. [`Capabilities::detect`] reports which capabilities were
//! compiled in. Functions whose capability is missing are never constructible,
//! and looking them up returns [`FunctionError::Unsupported`] instead of
//! [`FunctionError::UnknownFunction`].

use lazy_static::lazy_static;
use std::fmt;

use crate::functions::*;
use crate::FunctionError;

/// Optional numerical support a function can depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Synchrotron emission kernel (feature `synchrotron`)
    RadiativePhysics,
    /// Incomplete gamma function for non-positive orders (feature `special`)
    SpecialFunctions,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::RadiativePhysics, Capability::SpecialFunctions];

    /// Cargo feature enabling this capability
    pub fn feature(&self) -> &'static str {
        match self {
            Self::RadiativePhysics => "synchrotron",
            Self::SpecialFunctions => "special",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RadiativePhysics => "radiative physics",
            Self::SpecialFunctions => "special functions",
        };
        write!(f, "{} (feature `{}`)", name, self.feature())
    }
}

/// Capabilities compiled into this build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    radiative_physics: bool,
    special_functions: bool,
}

impl Capabilities {
    /// Detect the compiled-in capabilities, warning once for each missing one
    pub fn detect() -> Self {
        let capabilities = Self::compiled();
        for capability in capabilities.missing() {
            tracing::warn!(
                %capability,
                "{} is not available. Functions that depend on it will not be available",
                capability
            );
        }
        capabilities
    }

    fn compiled() -> Self {
        Self {
            radiative_physics: cfg!(feature = "synchrotron"),
            special_functions: cfg!(feature = "special"),
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::RadiativePhysics => self.radiative_physics,
            Capability::SpecialFunctions => self.special_functions,
        }
    }

    pub fn missing(&self) -> Vec<Capability> {
        Capability::ALL
            .iter()
            .copied()
            .filter(|c| !self.has(*c))
            .collect()
    }
}

type Constructor = fn() -> Box<dyn Function>;

fn boxed<F: Function + Default + 'static>() -> Box<dyn Function> {
    Box::new(F::default())
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Available(Constructor),
    Unavailable(Capability),
}

/// Named constructors for every catalog function
#[derive(Debug, Clone)]
pub struct FunctionCatalog {
    entries: Vec<(&'static str, Entry)>,
    capabilities: Capabilities,
}

impl FunctionCatalog {
    /// Catalog of all built-in functions, respecting the compiled-in capabilities
    pub fn builtin() -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
            capabilities: Capabilities::detect(),
        };

        catalog.register("powerlaw", boxed::<PowerLaw>);
        catalog.register("powerlaw_flux", boxed::<PowerLawFlux>);
        catalog.register("broken_powerlaw", boxed::<BrokenPowerLaw>);
        catalog.register("cutoff_powerlaw", boxed::<CutoffPowerLaw>);
        catalog.register("gaussian", boxed::<Gaussian>);
        catalog.register("uniform_prior", boxed::<UniformPrior>);
        catalog.register("log_uniform_prior", boxed::<LogUniformPrior>);
        catalog.register("sin", boxed::<Sin>);
        catalog.register("line", boxed::<Line>);
        catalog.register("identity", boxed::<Identity>);
        catalog.register("bias", boxed::<Bias>);
        catalog.register("band", boxed::<Band>);
        catalog.register("log_parabola", boxed::<LogParabola>);

        #[cfg(feature = "special")]
        let cutoff_powerlaw_flux: Option<Constructor> = Some(boxed::<CutoffPowerLawFlux>);
        #[cfg(not(feature = "special"))]
        let cutoff_powerlaw_flux: Option<Constructor> = None;
        catalog.register_gated(
            "cutoff_powerlaw_flux",
            Capability::SpecialFunctions,
            cutoff_powerlaw_flux,
        );

        #[cfg(feature = "synchrotron")]
        let synchrotron: Option<Constructor> = Some(boxed::<Synchrotron>);
        #[cfg(not(feature = "synchrotron"))]
        let synchrotron: Option<Constructor> = None;
        catalog.register_gated("synchrotron", Capability::RadiativePhysics, synchrotron);

        catalog
    }

    fn register(&mut self, name: &'static str, constructor: Constructor) {
        tracing::debug!(name, "registering catalog function");
        self.entries.push((name, Entry::Available(constructor)));
    }

    /// Register a function that needs `capability`, or record it as unavailable
    fn register_gated(
        &mut self,
        name: &'static str,
        capability: Capability,
        constructor: Option<Constructor>,
    ) {
        match constructor {
            Some(constructor) if self.capabilities.has(capability) => {
                self.register(name, constructor)
            }
            _ => self.entries.push((name, Entry::Unavailable(capability))),
        }
    }

    fn entry(&self, name: &str) -> Option<Entry> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, entry)| *entry)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Construct a new instance with default parameters
    pub fn get(&self, name: &str) -> Result<Box<dyn Function>, FunctionError> {
        match self.entry(name) {
            Some(Entry::Available(constructor)) => Ok(constructor()),
            Some(Entry::Unavailable(capability)) => Err(FunctionError::Unsupported {
                name: name.to_string(),
                capability: capability.to_string(),
            }),
            None => Err(FunctionError::UnknownFunction(name.to_string())),
        }
    }

    /// Whether `name` is a known function, available or not
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn is_available(&self, name: &str) -> bool {
        matches!(self.entry(name), Some(Entry::Available(_)))
    }

    /// Names of the available functions, in registration order
    pub fn list(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Available(_)))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Functions excluded from this build and the capability they lack
    pub fn unavailable(&self) -> Vec<(&'static str, Capability)> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| match entry {
                Entry::Unavailable(capability) => Some((*name, *capability)),
                Entry::Available(_) => None,
            })
            .collect()
    }

    /// Number of available functions
    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild a function from its serialized form.
    ///
    /// Values are always restored. Bounds and the free flag are restored from
    /// full (non-minimal) dictionaries only. Sub-models such as a synchrotron
    /// particle distribution are not restored.
    pub fn from_dict(&self, dict: &FunctionDict) -> Result<Box<dyn Function>, FunctionError> {
        let mut function = self.get(&dict.name)?;
        let function_name = function.name();

        for entry in &dict.parameters {
            let parameter = function
                .parameters_mut()
                .get_mut(&entry.name)
                .ok_or_else(|| FunctionError::UnknownParameter {
                    function: function_name.to_string(),
                    name: entry.name.clone(),
                })?;

            if let Some(free) = entry.free {
                parameter.set_bounds(entry.min_value, entry.max_value);
                if free {
                    parameter.free();
                } else {
                    parameter.fix();
                }
            }
            parameter.set_value(entry.value)?;
        }
        Ok(function)
    }
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

lazy_static! {
    static ref CATALOG: FunctionCatalog = FunctionCatalog::builtin();
}

/// Process-wide catalog, built on first use
pub fn catalog() -> &'static FunctionCatalog {
    &CATALOG
}
