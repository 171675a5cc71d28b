pub mod states;
pub mod params;
pub mod engine;
pub mod kepler;
pub mod forces;
pub mod integrator;
pub mod fragmentation;
pub mod system;
pub mod scenario;
