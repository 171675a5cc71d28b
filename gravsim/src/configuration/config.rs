//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – tick rate and optional integrator passes
//! - [`ParametersConfig`] – physical constants, simulated rate and start time
//! - [`ShatterConfig`]    – how bodies break apart when shattered
//! - [`SystemConfig`]     – the hierarchical system to load (star, planets, moons)
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! engine:
//!   ticks_per_second: 600     # integration steps per `delta_time`
//!   merge_collisions: true
//!   parallel: false           # rayon force pass
//!   balance_momentum: false   # parent recoil at load
//!
//! parameters:
//!   G: 6.6743e-11             # gravitational constant
//!   softening: 5000.0         # softening length (m), must be > 0
//!   delta_time: 200000.0      # simulated seconds per second, sign = direction
//!   start_time: ~             # seconds since 1970, ~ = wall clock
//!
//! shatter:
//!   fragments: 5
//!   radius_factor: 0.4
//!   spacing: 2.5
//!   kick: { type: speed_fraction, fraction: 0.4 }   # or { type: escape, k: 1.0 }
//!
//! system:
//!   name: Earth System
//!   parent:
//!     name: Earth
//!     mass: 5.972e24
//!     radius: 6.371e6
//!   children:
//!     - name: Moon
//!       class: moon
//!       mass: 7.346e22
//!       radius: 1.7374e6
//!       orbit: { a: 3.844e8, e: 0.0549, i: 5.145, lan: 0, lon_pe: 0, ml: 0 }
//! ```
//!
//! Orbit angles are authored in degrees; `epoch` is `J2000` (the default)
//! or a decimal year. A child with its own `parent`/`children` is a nested
//! system.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::fragmentation::{FragmentKick, ShatterParams};
use crate::simulation::kepler::{epoch_from_year, OrbitalElements, J2000_EPOCH};
use crate::simulation::states::{BodyClass, DEFAULT_COLOR};
use crate::simulation::system::{CelestialObject, SystemChild, SystemNode};

/// Astronomical unit in metres
pub const AU: f64 = 1.495978707e11;

/// Tick rate and optional passes
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: f64, // integration steps per `delta_time`
    #[serde(default = "default_true")]
    pub merge_collisions: bool, // merge overlapping bodies after each step
    #[serde(default)]
    pub parallel: bool, // compute the force pass on the rayon pool
    #[serde(default)]
    pub balance_momentum: bool, // approximate parent recoil at load
}

/// Global physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default = "default_g")]
    pub G: f64, // gravitational constant
    pub softening: f64, // softening length, prevents singular forces at small separations
    pub delta_time: f64, // simulated seconds per second
    #[serde(default)]
    pub start_time: Option<f64>, // simulation clock at load, None = now
}

/// Outward kick applied to fragments
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KickConfig {
    SpeedFraction { fraction: f64 }, // fraction of the parent's speed
    Escape { k: f64 },               // escape-speed-like scaling
}

/// Fragmentation settings
#[derive(Deserialize, Debug, Clone)]
pub struct ShatterConfig {
    #[serde(default = "default_fragments")]
    pub fragments: usize, // fragments per shatter request
    #[serde(default = "default_radius_factor")]
    pub radius_factor: f64, // fragment radius relative to the parent
    #[serde(default = "default_spacing")]
    pub spacing: f64, // ring radius in fragment radii
    #[serde(default = "default_kick")]
    pub kick: KickConfig,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self {
            fragments: default_fragments(),
            radius_factor: default_radius_factor(),
            spacing: default_spacing(),
            kick: default_kick(),
        }
    }
}

impl ShatterConfig {
    pub fn params(&self) -> ShatterParams {
        let kick = match self.kick {
            KickConfig::SpeedFraction { fraction } => FragmentKick::SpeedFraction(fraction),
            KickConfig::Escape { k } => FragmentKick::Escape { k },
        };
        ShatterParams {
            radius_factor: self.radius_factor,
            spacing: self.spacing,
            kick,
        }
    }
}

/// Reference epoch, `J2000` or a decimal year such as `2018.379`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EpochConfig {
    Year(f64),
    Named(String),
}

impl EpochConfig {
    /// Seconds after the Unix epoch
    pub fn seconds(&self) -> SimResult<f64> {
        match self {
            EpochConfig::Year(year) => Ok(epoch_from_year(*year)),
            EpochConfig::Named(name) if name.eq_ignore_ascii_case("j2000") => Ok(J2000_EPOCH),
            EpochConfig::Named(name) => Err(SimError::InvalidEpoch(name.clone())),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    M,
    Au,
}

/// Orbital elements as authored: degrees, semi-major axis in `unit`
#[derive(Deserialize, Debug, Clone)]
pub struct OrbitConfig {
    pub a: f64,
    pub e: f64,
    pub i: f64,
    pub lan: f64,    // longitude of the ascending node
    pub lon_pe: f64, // longitude of periapsis
    pub ml: f64,     // mean longitude
    #[serde(default)]
    pub epoch: Option<EpochConfig>,
    #[serde(default)]
    pub unit: DistanceUnit,
}

impl OrbitConfig {
    pub fn elements(&self) -> SimResult<OrbitalElements> {
        let epoch = match &self.epoch {
            Some(epoch) => epoch.seconds()?,
            None => J2000_EPOCH,
        };
        let a = match self.unit {
            DistanceUnit::M => self.a,
            DistanceUnit::Au => self.a * AU,
        };
        Ok(OrbitalElements::from_degrees(a, self.e, self.i, self.lan, self.lon_pe, self.ml, epoch))
    }
}

/// One body of a system description
#[derive(Deserialize, Debug, Clone)]
pub struct ObjectConfig {
    pub name: String,
    #[serde(default)]
    pub class: BodyClass,
    #[serde(default)]
    pub atmosphere: bool,
    #[serde(default = "default_color")]
    pub color: String,
    pub mass: f64,
    pub radius: f64,
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

impl ObjectConfig {
    pub fn to_object(&self) -> SimResult<CelestialObject> {
        Ok(CelestialObject {
            name: self.name.clone(),
            class: self.class,
            atmosphere: self.atmosphere,
            color: self.color.clone(),
            mass: self.mass,
            radius: self.radius,
            elements: self.orbit.as_ref().map(OrbitConfig::elements).transpose()?,
        })
    }
}

/// A child is either a nested system or a plain object
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ChildConfig {
    System(SystemConfig),
    Object(ObjectConfig),
}

#[derive(Deserialize, Debug, Clone)]
pub struct SystemConfig {
    pub name: String,
    pub parent: ObjectConfig,
    #[serde(default)]
    pub children: Vec<ChildConfig>,
}

impl SystemConfig {
    /// Runtime system tree with angles converted to radians
    pub fn to_system(&self) -> SimResult<SystemNode> {
        let children = self
            .children
            .iter()
            .map(|child| -> SimResult<SystemChild> {
                Ok(match child {
                    ChildConfig::System(sub) => SystemChild::System(sub.to_system()?),
                    ChildConfig::Object(object) => SystemChild::Object(object.to_object()?),
                })
            })
            .collect::<SimResult<Vec<_>>>()?;

        Ok(SystemNode::new(self.name.clone(), self.parent.to_object()?, children))
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // tick rate and optional passes
    pub parameters: ParametersConfig, // physical constants and clock
    #[serde(default)]
    pub shatter: ShatterConfig, // fragmentation settings
    pub system: SystemConfig, // hierarchical system to load
}

impl ScenarioConfig {
    pub fn from_yaml(text: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Read a scenario from a YAML file
pub fn load_scenario(path: impl AsRef<Path>) -> SimResult<ScenarioConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

fn default_ticks_per_second() -> f64 {
    600.0
}

fn default_true() -> bool {
    true
}

fn default_g() -> f64 {
    6.6743e-11
}

fn default_fragments() -> usize {
    5
}

fn default_radius_factor() -> f64 {
    0.4
}

fn default_spacing() -> f64 {
    2.5
}

fn default_kick() -> KickConfig {
    KickConfig::SpeedFraction { fraction: 0.4 }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}
