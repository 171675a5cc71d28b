//! Force / acceleration contributors for the n-body engine
//!
//! Accelerations are evaluated on a snapshot of point masses taken after
//! every body's trial position has been written, so no body ever sees a
//! half-updated neighbour

use rayon::prelude::*;

use crate::simulation::states::{Body, Environment, NVec3};

/// Read-only view of a body used as a gravity source
#[derive(Debug, Clone, Copy)]
pub struct PointMass {
    pub x: NVec3,
    pub m: f64,
    pub radius: f64,
}

impl PointMass {
    /// Snapshot of a body at its trial (`x_new`) position
    pub fn trial(body: &Body) -> Self {
        Self {
            x: body.x_new,
            m: body.m,
            radius: body.radius,
        }
    }

    /// Snapshot of a body at its committed position
    pub fn current(body: &Body) -> Self {
        Self {
            x: body.x,
            m: body.m,
            radius: body.radius,
        }
    }
}

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per source
#[derive(Default)]
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations for every entry of `sources`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, env: &Environment, sources: &[PointMass], out: &mut [NVec3]) {
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(env, sources, out);
        }
    }
}

/// Acceleration source operating on a snapshot of the environment
/// Implementations add their contribution into `out[i]` for each source
pub trait Acceleration {
    fn acceleration(&self, env: &Environment, sources: &[PointMass], out: &mut [NVec3]);
}

/// Direct-summation Newtonian gravity with Plummer softening
///
/// `a_i = Σ G m_j (x_j - x_i) / (|x_j - x_i|² + ε²)^(3/2)`, with `G` and `ε`
/// taken from the environment. Pairs that overlap (centre distance below the
/// sum of radii) are left to the merge pass and contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonianGravity {
    pub parallel: bool, // rows computed on the rayon pool
}

impl NewtonianGravity {
    pub fn serial() -> Self {
        Self { parallel: false }
    }

    pub fn parallel() -> Self {
        Self { parallel: true }
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, env: &Environment, sources: &[PointMass], out: &mut [NVec3]) {
        let n = sources.len();
        if n < 2 {
            return;
        }

        let g = env.G;
        let eps2 = env.softening() * env.softening();

        if self.parallel {
            // every row only reads the finished snapshot
            out.par_iter_mut().enumerate().for_each(|(i, ai)| {
                *ai += row_acceleration(i, sources, g, eps2);
            });
            return;
        }

        // Each unordered pair once, equal and opposite
        for i in 0..n {
            let si = &sources[i];
            for j in (i + 1)..n {
                let sj = &sources[j];
                let Some(coef) = pair_coefficient(si, sj, g, eps2) else {
                    continue;
                };
                let r = sj.x - si.x;
                out[i] += coef * sj.m * r;
                out[j] -= coef * si.m * r;
            }
        }
    }
}

/// Acceleration on source `i` from every other source
fn row_acceleration(i: usize, sources: &[PointMass], g: f64, eps2: f64) -> NVec3 {
    let si = &sources[i];
    sources
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .filter_map(|(_, sj)| pair_coefficient(si, sj, g, eps2).map(|coef| coef * sj.m * (sj.x - si.x)))
        .fold(NVec3::zeros(), |acc, a| acc + a)
}

/// `G / (r² + ε²)^(3/2)` for a pair, or `None` when the pair is colliding
fn pair_coefficient(si: &PointMass, sj: &PointMass, g: f64, eps2: f64) -> Option<f64> {
    let r2 = (sj.x - si.x).norm_squared();
    let contact = si.radius + sj.radius;
    if r2 < contact * contact {
        return None;
    }
    let inv_r = (r2 + eps2).sqrt().recip();
    Some(g * inv_r * inv_r * inv_r)
}
