//! Breaking a body into evenly spaced fragments
//!
//! Fragmentation is an interaction, not a physical law: the UI asks for a
//! body to be shattered and the core swaps it for `n` smaller bodies on a
//! ring around the old centre, each pushed outwards along its spoke.

use std::f64::consts::{PI, TAU};

use tracing::info;

use crate::error::{SimError, SimResult};
use crate::simulation::states::{Body, BodyClass, Environment, NVec3};

/// Minimum gap between neighbouring fragments, as a factor on contact distance
const CLEARANCE: f64 = 1.01;

/// Outward speed added to each fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentKick {
    /// `fraction * |v_parent|`
    SpeedFraction(f64),
    /// `k * sqrt(G * (n/2 - 1) * m_fragment^0.6 / d)`, an escape-speed-like scale
    Escape { k: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShatterParams {
    pub radius_factor: f64, // fragment radius / parent radius
    pub spacing: f64,       // ring radius in fragment radii, before the angular correction
    pub kick: FragmentKick,
}

impl Default for ShatterParams {
    fn default() -> Self {
        Self {
            radius_factor: 0.4,
            spacing: 2.5,
            kick: FragmentKick::SpeedFraction(0.4),
        }
    }
}

impl ShatterParams {
    /// Distance from the parent centre to each fragment centre
    ///
    /// Never less than the radius at which neighbouring fragments would
    /// touch, so a fresh ring is not merged back on the next tick.
    pub fn ring_radius(&self, parent_radius: f64, n: usize) -> f64 {
        let nf = n as f64;
        let r_frag = self.radius_factor * parent_radius;
        let spaced = self.spacing * r_frag / (PI / nf - PI / (2.0 * nf)).cos();
        let clear = CLEARANCE * r_frag / (PI / nf).sin();
        spaced.max(clear)
    }

    fn kick_speed(&self, parent: &Body, g: f64, n: usize, fragment_mass: f64, distance: f64) -> f64 {
        match self.kick {
            FragmentKick::SpeedFraction(fraction) => fraction * parent.v.norm(),
            FragmentKick::Escape { k } => {
                let nf = n as f64;
                let scale = g * (nf / 2.0 - 1.0) * fragment_mass.powf(0.6) / distance;
                // n = 2 gives no kick, a zero radius gives no ring to push from
                if scale > 0.0 && distance > 0.0 {
                    k * scale.sqrt()
                } else {
                    0.0
                }
            }
        }
    }
}

pub fn fragment_name(parent: &str, k: usize) -> String {
    format!("{parent} {k}")
}

/// Build the fragments of `parent` without touching any environment
pub fn fragments_of(parent: &Body, n: usize, g: f64, params: &ShatterParams) -> SimResult<Vec<Body>> {
    if n < 2 {
        return Err(SimError::TooFewFragments(n));
    }

    let m = parent.m / n as f64;
    let radius = parent.radius * params.radius_factor;
    let distance = params.ring_radius(parent.radius, n);
    let kick = params.kick_speed(parent, g, n, m, distance);
    let step = TAU / n as f64;

    (0..n)
        .map(|k| -> SimResult<Body> {
            let angle = step * k as f64;
            let dir = NVec3::new(angle.cos(), angle.sin(), 0.0);
            let mut fragment = Body::new(
                fragment_name(&parent.name, k),
                m,
                radius,
                parent.x + dir * distance,
                parent.v + dir * kick,
            )?
            .with_class(BodyClass::Fragment)
            .with_color(parent.color.clone())
            .with_atmosphere(false);
            fragment.a = parent.a;
            fragment.a_new = parent.a;
            Ok(fragment)
        })
        .collect()
}

/// Replace the body called `name` by `n` fragments
///
/// The environment is only modified when every fragment can be built and
/// none of their names is already taken. Returns the fragment names.
pub fn shatter(env: &mut Environment, name: &str, n: usize, params: &ShatterParams) -> SimResult<Vec<String>> {
    let parent = env
        .get(name)
        .ok_or_else(|| SimError::UnknownBody(name.to_owned()))?;
    let fragments = fragments_of(parent, n, env.G, params)?;

    if let Some(taken) = fragments.iter().find(|f| env.contains(&f.name)) {
        return Err(SimError::NameCollision(taken.name.clone()));
    }

    env.remove(name);
    let names: Vec<String> = fragments.iter().map(|f| f.name.clone()).collect();
    for fragment in fragments {
        env.insert(fragment);
    }

    info!("{name} shattered into {n} fragments");
    Ok(names)
}
