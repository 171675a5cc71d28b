//! Core state types for the N-body simulation.
//!
//! Defines the runtime body and the environment that owns it:
//! - `Body` a point mass with double-buffered kinematic state
//! - `Environment` the named collection of bodies plus the shared constants
//!   (`G`, softening, simulated time and rate)
//!
//! Positions are carried in 3D even though the viewer only projects x/y.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SimError, SimResult};

pub type NVec3 = Vector3<f64>;

/// Closed set of body categories
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BodyClass {
    Star,
    Planet,
    GasGiant,
    Moon,
    Fragment,
    #[default]
    Unclassified,
}

pub const DEFAULT_COLOR: &str = "#1ecaee";

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub class: BodyClass,
    pub atmosphere: bool,
    pub color: String, // hex, display only
    pub m: f64,        // mass
    pub radius: f64,   // collision radius, not used by gravity

    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: NVec3, // acceleration

    // Written during a step, committed once every body has been updated
    pub x_new: NVec3,
    pub v_new: NVec3,
    pub a_new: NVec3,
}

impl Body {
    /// Create a body at rest acceleration-wise
    ///
    /// Fails when `m` is not positive and finite or `radius` is negative.
    pub fn new(name: impl Into<String>, m: f64, radius: f64, x: NVec3, v: NVec3) -> SimResult<Self> {
        let name = name.into();
        if !(m.is_finite() && m > 0.0) {
            return Err(SimError::InvalidMass { name, mass: m });
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SimError::InvalidRadius { name, radius });
        }

        Ok(Self {
            name,
            class: BodyClass::default(),
            atmosphere: false,
            color: DEFAULT_COLOR.to_owned(),
            m,
            radius,
            x,
            v,
            a: NVec3::zeros(),
            x_new: x,
            v_new: v,
            a_new: NVec3::zeros(),
        })
    }

    pub fn with_class(mut self, class: BodyClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: bool) -> Self {
        self.atmosphere = atmosphere;
        self
    }

    pub fn momentum(&self) -> NVec3 {
        self.v * self.m
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (other.x - self.x).norm()
    }

    /// True when the two spheres intersect (centre distance below the sum of radii)
    pub fn overlaps(&self, other: &Body) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }

    /// Inelastic merge of `other` into `self`
    ///
    /// Mass and momentum are conserved exactly. The radius grows so that the
    /// combined volume is preserved; position stays where `self` is.
    pub fn absorb(&mut self, other: &Body) {
        let m_before = self.m;
        self.m += other.m;
        self.v = (m_before * self.v + other.m * other.v) / self.m;
        self.radius = (self.radius.powi(3) + other.radius.powi(3)).cbrt();
        self.x_new = self.x;
        self.v_new = self.v;
    }

    /// Promote the `*_new` buffers to the current state
    pub fn commit(&mut self) {
        self.x = self.x_new;
        self.v = self.v_new;
        self.a = self.a_new;
    }
}

/// The simulated universe: bodies keyed by unique name plus global constants
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    objects: BTreeMap<String, Body>,
    pub t: f64,          // elapsed simulation time (s), negative when rewound
    pub delta_time: f64, // simulated seconds per real second, sign is direction
    softening: f64,      // length added in quadrature to every separation
    pub G: f64,          // gravitational constant
    pub paused: bool,
}

impl Environment {
    pub fn new(
        name: impl Into<String>,
        start_time: f64,
        delta_time: f64,
        softening: f64,
        G: f64,
    ) -> SimResult<Self> {
        check_softening(softening)?;
        Ok(Self {
            name: name.into(),
            objects: BTreeMap::new(),
            t: start_time,
            delta_time,
            softening,
            G,
            paused: false,
        })
    }

    pub fn softening(&self) -> f64 {
        self.softening
    }

    pub fn set_softening(&mut self, softening: f64) -> SimResult<()> {
        check_softening(softening)?;
        self.softening = softening;
        Ok(())
    }

    pub fn objects(&self) -> impl Iterator<Item = &Body> {
        self.objects.values()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.objects.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Body> {
        self.objects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Body> {
        self.objects.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Insert a body under its own name
    ///
    /// An existing body with the same name is replaced and returned.
    pub fn insert(&mut self, body: Body) -> Option<Body> {
        let displaced = self.objects.insert(body.name.clone(), body);
        if let Some(old) = &displaced {
            warn!("{} replaced an existing body of the same name", old.name);
        }
        displaced
    }

    pub fn remove(&mut self, name: &str) -> Option<Body> {
        self.objects.remove(name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total mass of all bodies, recomputed on every call
    pub fn mass(&self) -> f64 {
        self.objects().map(|b| b.m).sum()
    }

    /// Mass-weighted mean position, `None` when there is no mass to weigh
    pub fn center_of_mass(&self) -> Option<NVec3> {
        let mass = self.mass();
        if self.is_empty() || mass <= 0.0 {
            return None;
        }
        let weighted = self
            .objects()
            .fold(NVec3::zeros(), |acc, b| acc + b.x * b.m);
        Some(weighted / mass)
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.objects()
            .map(|b| b.momentum())
            .fold(NVec3::zeros(), |acc, p| acc + p)
    }

    /// Total angular momentum about the origin
    pub fn total_angular_momentum(&self) -> NVec3 {
        self.objects()
            .map(|b| b.x.cross(&b.momentum()))
            .fold(NVec3::zeros(), |acc, l| acc + l)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.objects().map(Body::kinetic_energy).sum()
    }

    /// Softened pairwise potential energy, consistent with the force law
    pub fn potential_energy(&self) -> f64 {
        let bodies: Vec<&Body> = self.objects().collect();
        let eps2 = self.softening * self.softening;
        let mut u = 0.0;
        for (i, bi) in bodies.iter().enumerate() {
            for bj in &bodies[i + 1..] {
                let d2 = (bj.x - bi.x).norm_squared() + eps2;
                u -= self.G * bi.m * bj.m / d2.sqrt();
            }
        }
        u
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Run time forwards (`true`) or backwards without changing the rate
    pub fn set_forward(&mut self, forward: bool) {
        let sign = if forward { 1.0 } else { -1.0 };
        self.delta_time = self.delta_time.copysign(sign);
    }

    pub fn reverse_time(&mut self) {
        self.delta_time = -self.delta_time;
    }

    /// Multiply the rate by `factor`; direction is kept
    pub fn scale_delta_time(&mut self, factor: f64) {
        self.delta_time *= factor;
    }
}

fn check_softening(softening: f64) -> SimResult<()> {
    if softening.is_finite() && softening > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSoftening(softening))
    }
}
