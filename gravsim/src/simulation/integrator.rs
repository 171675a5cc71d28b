//! Fixed-step time integrator for the N-body environment
//!
//! One tick is a velocity Verlet step split into passes over every body:
//! trial positions, accelerations at the trial positions, averaged velocity
//! update, then a single commit. The optional merge pass runs on the
//! committed state.

use std::collections::HashSet;

use tracing::debug;

use crate::error::SimResult;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, NewtonianGravity, PointMass};
use crate::simulation::fragmentation::{self, ShatterParams};
use crate::simulation::states::{Environment, NVec3};

/// One inelastic merge performed during a step
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub absorber: String,
    pub absorbed: String,
    pub mass: f64, // absorber mass after the merge
}

/// What happened during a call to [`Integrator::step`]
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub dt: f64,
    pub paused: bool,
    pub merges: Vec<Merge>,
}

pub struct Integrator {
    pub engine: Engine,
    pub shatter_params: ShatterParams,
    forces: AccelSet,
}

impl Integrator {
    /// Integrator with direct Newtonian gravity as its only force
    pub fn new(engine: Engine) -> Self {
        let forces = AccelSet::new().with(NewtonianGravity {
            parallel: engine.parallel,
        });
        Self::with_forces(engine, forces)
    }

    pub fn with_forces(engine: Engine, forces: AccelSet) -> Self {
        Self {
            engine,
            shatter_params: ShatterParams::default(),
            forces,
        }
    }

    pub fn with_shatter_params(mut self, params: ShatterParams) -> Self {
        self.shatter_params = params;
        self
    }

    /// Length of one tick for the environment's current rate
    pub fn dt(&self, env: &Environment) -> f64 {
        env.delta_time / self.engine.ticks_per_second
    }

    /// Set every body's acceleration from the committed positions
    ///
    /// Bodies are created with zero acceleration; priming once after loading
    /// makes the first Verlet step use the real field.
    pub fn prime(&self, env: &mut Environment) {
        let sources: Vec<PointMass> = env.objects().map(PointMass::current).collect();
        let accels = self.accelerations(env, &sources);
        for (body, a) in env.objects_mut().zip(accels) {
            body.a = a;
            body.a_new = a;
        }
    }

    /// Advance the environment by one tick
    ///
    /// Does nothing while the environment is paused.
    pub fn step(&self, env: &mut Environment) -> StepReport {
        if env.paused {
            return StepReport {
                paused: true,
                ..Default::default()
            };
        }

        let dt = self.dt(env);
        let half_dt2 = 0.5 * dt * dt;

        // x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
        for b in env.objects_mut() {
            b.x_new = b.x + b.v * dt + b.a * half_dt2;
        }

        // a_n+1 from every trial position; the snapshot is the barrier
        let sources: Vec<PointMass> = env.objects().map(PointMass::trial).collect();
        let accels = self.accelerations(env, &sources);

        // v_n+1 = v_n + 1/2 (a_n + a_n+1) dt
        for (b, a_new) in env.objects_mut().zip(accels) {
            b.a_new = a_new;
            b.v_new = b.v + 0.5 * (b.a_new + b.a) * dt;
        }

        for b in env.objects_mut() {
            b.commit();
        }

        let merges = if self.engine.merge_collisions {
            merge_collisions(env)
        } else {
            Vec::new()
        };

        env.t += dt;

        StepReport {
            dt,
            paused: false,
            merges,
        }
    }

    /// Replace the body called `name` by `fragments` smaller bodies
    pub fn shatter(&self, env: &mut Environment, name: &str, fragments: usize) -> SimResult<Vec<String>> {
        fragmentation::shatter(env, name, fragments, &self.shatter_params)
    }

    fn accelerations(&self, env: &Environment, sources: &[PointMass]) -> Vec<NVec3> {
        let mut out = vec![NVec3::zeros(); sources.len()];
        self.forces.accumulate_accels(env, sources, &mut out);
        out
    }
}

/// Merge every overlapping pair, lighter into heavier
///
/// Removal is deferred until the scan is over; a body that has been absorbed
/// takes no further part in the scan. With equal masses the body whose name
/// sorts first absorbs the other.
pub fn merge_collisions(env: &mut Environment) -> Vec<Merge> {
    let names: Vec<String> = env.names().map(str::to_owned).collect();
    let mut removed: HashSet<&str> = HashSet::new();
    let mut merges = Vec::new();

    for (i, a) in names.iter().enumerate() {
        if removed.contains(a.as_str()) {
            continue;
        }
        for b in &names[i + 1..] {
            if removed.contains(b.as_str()) {
                continue;
            }
            let (Some(ba), Some(bb)) = (env.get(a), env.get(b)) else {
                continue;
            };
            if !ba.overlaps(bb) {
                continue;
            }

            let (heavy, light) = if ba.m >= bb.m { (a, b) } else { (b, a) };
            let Some(light_body) = env.get(light).cloned() else {
                continue;
            };
            let Some(heavy_body) = env.get_mut(heavy) else {
                continue;
            };
            heavy_body.absorb(&light_body);

            debug!("{light} collided with {heavy}");
            merges.push(Merge {
                absorber: heavy.clone(),
                absorbed: light.clone(),
                mass: heavy_body.m,
            });
            removed.insert(light.as_str());

            if light == a {
                break;
            }
        }
    }

    for name in removed {
        env.remove(name);
    }
    merges
}
