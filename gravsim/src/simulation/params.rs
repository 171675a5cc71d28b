//! Physical parameters a scenario starts from
//!
//! `Parameters` holds the values an environment is created with:
//! - gravitational constant and softening length,
//! - initial simulated rate (`delta_time`, seconds per second) and start time
//!
//! Once built, the environment owns these values; rate and direction
//! changes happen there.

use crate::error::SimResult;
use crate::simulation::states::Environment;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub G: f64,          // gravitational constant
    pub softening: f64,  // softening length
    pub delta_time: f64, // initial signed simulated seconds per second
    pub start_time: f64, // simulation clock at load (s since Unix epoch)
}

impl Parameters {
    /// Empty environment carrying these parameters
    pub fn environment(&self, name: impl Into<String>) -> SimResult<Environment> {
        Environment::new(name, self.start_time, self.delta_time, self.softening, self.G)
    }
}
