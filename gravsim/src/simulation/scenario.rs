//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - engine settings (`Engine`)
//! - the environment, with the configured system loaded and accelerations primed
//! - the integrator that advances it
//!
//! The driving loop owns the scenario and calls `Scenario::tick` once per frame

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::configuration::config::ScenarioConfig;
use crate::error::{SimError, SimResult};
use crate::simulation::engine::Engine;
use crate::simulation::integrator::{Integrator, StepReport};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Environment, NVec3};
use crate::simulation::system::{LoaderOptions, SystemLoader};

pub struct Scenario {
    pub engine: Engine,
    pub environment: Environment,
    pub integrator: Integrator,
    pub fragments: usize, // fragment count used by `shatter`
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            G: p_cfg.G,
            softening: p_cfg.softening,
            delta_time: p_cfg.delta_time,
            start_time: p_cfg.start_time.unwrap_or_else(wall_clock),
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        if !(e_cfg.ticks_per_second.is_finite() && e_cfg.ticks_per_second > 0.0) {
            return Err(SimError::InvalidTickRate(e_cfg.ticks_per_second));
        }
        let engine = Engine {
            ticks_per_second: e_cfg.ticks_per_second,
            merge_collisions: e_cfg.merge_collisions,
            parallel: e_cfg.parallel,
            balance_momentum: e_cfg.balance_momentum,
        };

        let mut environment = parameters.environment(cfg.system.name.clone())?;

        let system = cfg.system.to_system()?;
        let loader = SystemLoader::new(LoaderOptions {
            balance_momentum: engine.balance_momentum,
        });
        loader.load(&mut environment, &system, NVec3::zeros(), NVec3::zeros())?;

        let integrator = Integrator::new(engine.clone()).with_shatter_params(cfg.shatter.params());
        integrator.prime(&mut environment);

        info!(
            "{} ready with {} bodies, total mass {:e}",
            environment.name,
            environment.len(),
            environment.mass()
        );

        Ok(Self {
            engine,
            environment,
            integrator,
            fragments: cfg.shatter.fragments,
        })
    }

    /// One integration tick of the owned environment
    pub fn tick(&mut self) -> StepReport {
        self.integrator.step(&mut self.environment)
    }

    /// Shatter a body with the configured fragment count
    pub fn shatter(&mut self, name: &str) -> SimResult<Vec<String>> {
        self.integrator.shatter(&mut self.environment, name, self.fragments)
    }
}

/// Seconds since the Unix epoch, the default start of the simulation clock
fn wall_clock() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
