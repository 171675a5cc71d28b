//! Hierarchical system descriptions and the loader that flattens them
//!
//! A `SystemNode` is a parent object with children that are either plain
//! objects or nested systems (a planet with its moons). Loading walks the
//! tree, converts each orbit relative to its parent and adds the parent's
//! absolute state, so every body lands in the environment in one frame.

use tracing::info;

use crate::error::{SimError, SimResult};
use crate::simulation::kepler::{kep_to_cart, OrbitalElements};
use crate::simulation::states::{Body, BodyClass, Environment, NVec3, DEFAULT_COLOR};

/// Physical and orbital description of one object
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObject {
    pub name: String,
    pub class: BodyClass,
    pub atmosphere: bool,
    pub color: String,
    pub mass: f64,
    pub radius: f64,
    pub elements: Option<OrbitalElements>, // None only for a root parent
}

impl CelestialObject {
    pub fn new(name: impl Into<String>, mass: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            class: BodyClass::default(),
            atmosphere: false,
            color: DEFAULT_COLOR.to_owned(),
            mass,
            radius,
            elements: None,
        }
    }

    pub fn with_elements(mut self, elements: OrbitalElements) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn with_class(mut self, class: BodyClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Elements checked for a bound ellipse
    fn bound_elements(&self) -> SimResult<&OrbitalElements> {
        let elements = self
            .elements
            .as_ref()
            .ok_or_else(|| SimError::MissingOrbitalElements(self.name.clone()))?;
        if !elements.is_bound() {
            return Err(SimError::UnboundOrbit {
                name: self.name.clone(),
                a: elements.a,
                e: elements.e,
            });
        }
        Ok(elements)
    }

    fn to_body(&self, x: NVec3, v: NVec3) -> SimResult<Body> {
        Ok(Body::new(self.name.clone(), self.mass, self.radius, x, v)?
            .with_class(self.class)
            .with_color(self.color.clone())
            .with_atmosphere(self.atmosphere))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SystemChild {
    Object(CelestialObject),
    System(SystemNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemNode {
    pub name: String,
    pub parent: CelestialObject,
    pub children: Vec<SystemChild>,
}

impl SystemNode {
    pub fn new(name: impl Into<String>, parent: CelestialObject, children: Vec<SystemChild>) -> Self {
        Self {
            name: name.into(),
            parent,
            children,
        }
    }

    /// Number of bodies the tree expands to
    pub fn body_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                SystemChild::Object(_) => 1,
                SystemChild::System(sub) => sub.body_count(),
            })
            .sum::<usize>()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderOptions {
    /// Give each parent the recoil of its direct children
    pub balance_momentum: bool,
}

/// Absolute state of the parent a child is converted against
struct Frame<'a> {
    object: &'a CelestialObject,
    x: NVec3,
    v: NVec3,
}

pub struct SystemLoader {
    pub options: LoaderOptions,
}

impl SystemLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Populate `env` with every body of `system`
    ///
    /// The root parent is placed at `origin_x`/`origin_v`. Names are keys, so
    /// a later body with an existing name replaces the earlier one.
    pub fn load(&self, env: &mut Environment, system: &SystemNode, origin_x: NVec3, origin_v: NVec3) -> SimResult<()> {
        env.name = system.name.clone();
        self.load_node(env, system, origin_x, origin_v, None)
    }

    fn load_node(
        &self,
        env: &mut Environment,
        system: &SystemNode,
        frame_x: NVec3,
        frame_v: NVec3,
        grandparent: Option<&CelestialObject>,
    ) -> SimResult<()> {
        info!("Loading {}", system.name);
        let parent = &system.parent;

        let (parent_x, parent_v) = match grandparent {
            None => (frame_x, frame_v),
            Some(gp) => {
                let (x, v) = kep_to_cart(env.G * gp.mass, parent.bound_elements()?, env.t);
                (x + frame_x, v + frame_v)
            }
        };

        env.insert(parent.to_body(parent_x, parent_v)?);

        let frame = Frame {
            object: parent,
            x: parent_x,
            v: parent_v,
        };

        // mass-weighted velocity of the children relative to the parent
        let mut child_momentum = NVec3::zeros();

        for child in &system.children {
            match child {
                SystemChild::System(sub) => {
                    self.load_node(env, sub, frame.x, frame.v, Some(frame.object))?;
                    if let Some(sub_parent) = env.get(&sub.parent.name) {
                        child_momentum += sub_parent.m * (sub_parent.v - frame.v);
                    }
                }
                SystemChild::Object(object) => {
                    let body = self.place(env, object, &frame)?;
                    child_momentum += body.m * (body.v - frame.v);
                    env.insert(body);
                }
            }
        }

        if self.options.balance_momentum {
            if let Some(body) = env.get_mut(&parent.name) {
                body.v -= child_momentum / parent.mass;
                body.v_new = body.v;
            }
        }
        Ok(())
    }

    fn place(&self, env: &Environment, object: &CelestialObject, frame: &Frame) -> SimResult<Body> {
        let (x, v) = kep_to_cart(env.G * frame.object.mass, object.bound_elements()?, env.t);
        object.to_body(x + frame.x, v + frame.v)
    }
}
