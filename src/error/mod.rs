use thiserror::Error;

/// Errors raised by special-function evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecialError {
    /// Arguments outside the domain supported for the function
    #[error("Argument outside the domain of the function: a = {a}, x = {x}")]
    Domain { a: f64, x: f64 },

    /// Series or continued fraction did not converge
    #[error("{function} failed to converge")]
    ConvergenceFailure { function: &'static str },
}

/// Errors raised while configuring or evaluating a catalog function
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    // ─────────────────────────────────────────────────────────────────────────
    // Usage Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The function was configured with physically inconsistent units
    #[error("Invalid usage for function {function}: {reason}")]
    InvalidUsage {
        function: &'static str,
        reason: String,
    },

    /// The band split energy lies above the upper integration limit
    #[error("Esplit > emax! (Esplit = {e_split}, b = {upper})")]
    BandConfiguration { e_split: f64, upper: f64 },

    /// A discrete option parameter holds an unsupported value
    #[error("Invalid option for function {function}: {value} (must be either 0 or 1)")]
    InvalidOption { function: &'static str, value: f64 },

    // ─────────────────────────────────────────────────────────────────────────
    // Parameter Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Positional parameter slice has the wrong length
    #[error("Expected {expected} parameters, got {got}")]
    ParameterCount { expected: usize, got: usize },

    /// No parameter with this name exists on the function
    #[error("Function {function} has no parameter named '{name}'")]
    UnknownParameter { function: String, name: String },

    /// Parameter value outside its bounds
    #[error("Value {value} for parameter {name} is outside the bounds [{min:?}, {max:?}]")]
    OutOfBounds {
        name: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Unit Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Unit symbol not present in the registry
    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    /// Units with different dimensions cannot be converted into each other
    #[error("Cannot convert '{from}' to '{to}': incompatible dimensions")]
    IncompatibleUnits { from: String, to: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Function exists but its capability was not compiled in
    #[error("Function '{name}' is not available: {capability} support is not enabled")]
    Unsupported { name: String, capability: String },

    /// No function with this name in the catalog
    #[error("Function '{0}' not found in catalog")]
    UnknownFunction(String),

    /// Synchrotron evaluated before a particle distribution was attached
    #[error("No particle distribution has been set")]
    MissingParticleDistribution,

    #[error(transparent)]
    Special(#[from] SpecialError),
}
