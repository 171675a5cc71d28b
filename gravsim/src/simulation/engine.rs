//! High-level runtime engine settings
//!
//! Selects which optional passes the integrator runs and how the
//! system loader places parent bodies

#[derive(Debug, Clone)]
pub struct Engine {
    pub ticks_per_second: f64, // integration steps per simulated `delta_time`
    pub merge_collisions: bool, // run the pairwise merge pass after each step
    pub parallel: bool, // evaluate the force rows on the rayon pool
    pub balance_momentum: bool, // recoil parents against their children at load
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            ticks_per_second: 600.0,
            merge_collisions: true,
            parallel: false,
            balance_momentum: false,
        }
    }
}
