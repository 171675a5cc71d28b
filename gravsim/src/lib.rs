pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use error::{SimError, SimResult};

pub use simulation::states::{Body, BodyClass, Environment, NVec3};
pub use simulation::kepler::{cart_to_kep, eccentric_anomaly, kep_to_cart, OrbitalElements};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, PointMass};
pub use simulation::integrator::{Integrator, Merge, StepReport};
pub use simulation::fragmentation::{FragmentKick, ShatterParams};
pub use simulation::system::{CelestialObject, LoaderOptions, SystemChild, SystemLoader, SystemNode};
pub use simulation::engine::Engine;
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, ScenarioConfig, ShatterConfig, SystemConfig, load_scenario};

pub use benchmark::benchmark::{bench_step, bench_step_curve};
