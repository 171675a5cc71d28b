//! Error types for the simulation core

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the simulation core
///
/// Numerical hazards inside the converter and the force loop are not
/// represented here; they are prevented by validating inputs up front.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("body {name:?} has invalid mass {mass} (must be positive and finite)")]
    InvalidMass { name: String, mass: f64 },

    #[error("body {name:?} has invalid radius {radius} (must be non-negative and finite)")]
    InvalidRadius { name: String, radius: f64 },

    #[error("softening must be positive and finite, got {0}")]
    InvalidSoftening(f64),

    #[error("ticks_per_second must be positive and finite, got {0}")]
    InvalidTickRate(f64),

    #[error("no body named {0:?}")]
    UnknownBody(String),

    #[error("a body named {0:?} already exists")]
    NameCollision(String),

    #[error("cannot shatter into {0} fragments (need at least 2)")]
    TooFewFragments(usize),

    #[error("{0:?} orbits a parent but has no orbital elements")]
    MissingOrbitalElements(String),

    #[error("{name:?} is not on a bound elliptical orbit (a = {a}, e = {e})")]
    UnboundOrbit { name: String, a: f64, e: f64 },

    #[error("unrecognised epoch {0:?} (expected \"J2000\" or a decimal year)")]
    InvalidEpoch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
