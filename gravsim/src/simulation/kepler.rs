//! Keplerian orbital elements and their Cartesian state vectors.
//!
//! `kep_to_cart` places a body on its orbit around a parent at a given time.
//! The eccentric anomaly comes from the Fourier–Bessel expansion of Kepler's
//! equation truncated at 23 terms, so there is no iteration and no
//! convergence check. The series converges for e below ~0.66; beyond that
//! the result silently loses accuracy.
//!
//! Hyperbolic and parabolic inputs (e >= 1) and a <= 0 are not guarded here;
//! callers validate elements before converting.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::simulation::states::NVec3;

/// Number of Bessel terms in the eccentric anomaly expansion
pub const BESSEL_TERMS: i32 = 23;

const JULIAN_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// J2000 in seconds after the Unix epoch, counted in Julian years
pub const J2000_EPOCH: f64 = 30.0 * JULIAN_YEAR;

/// Seconds after the Unix epoch at a decimal year
pub fn epoch_from_year(year: f64) -> f64 {
    (year - 1970.0) * JULIAN_YEAR
}

/// Keplerian elements, angles in radians
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub a: f64,      // semi-major axis
    pub e: f64,      // eccentricity
    pub i: f64,      // inclination
    pub lan: f64,    // longitude of the ascending node (Ω)
    pub lon_pe: f64, // longitude of periapsis (ϖ)
    pub ml: f64,     // mean longitude at epoch
    pub epoch: f64,  // reference time (s)
}

impl OrbitalElements {
    /// Build from angles authored in degrees
    pub fn from_degrees(a: f64, e: f64, i: f64, lan: f64, lon_pe: f64, ml: f64, epoch: f64) -> Self {
        Self {
            a,
            e,
            i: i.to_radians(),
            lan: lan.to_radians(),
            lon_pe: lon_pe.to_radians(),
            ml: ml.to_radians(),
            epoch,
        }
    }

    /// Argument of periapsis ω = ϖ − Ω
    pub fn arg_pe(&self) -> f64 {
        self.lon_pe - self.lan
    }

    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.a.powi(3)).sqrt()
    }

    pub fn period(&self, mu: f64) -> f64 {
        TAU / self.mean_motion(mu)
    }

    pub fn mean_anomaly(&self, mu: f64, t: f64) -> f64 {
        self.ml - self.lon_pe + self.mean_motion(mu) * (t - self.epoch)
    }

    pub fn is_bound(&self) -> bool {
        self.a > 0.0 && (0.0..1.0).contains(&self.e)
    }
}

/// Eccentric anomaly from the mean anomaly by the truncated Bessel series
///
/// EA = M + Σ (2/k)·J_k(k·e)·sin(k·M), k = 1..=23
pub fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    (1..=BESSEL_TERMS).fold(mean_anomaly, |ea, k| {
        let kf = f64::from(k);
        ea + 2.0 / kf * libm::jn(k, kf * e) * libm::sin(kf * mean_anomaly)
    })
}

/// Position and velocity relative to the parent, for `mu = G * parent_mass`
pub fn kep_to_cart(mu: f64, el: &OrbitalElements, t: f64) -> (NVec3, NVec3) {
    let OrbitalElements { a, e, i, lan: om, .. } = *el;
    let w = el.arg_pe();

    let ma = el.mean_anomaly(mu, t);
    let ea = eccentric_anomaly(ma, e);

    // true anomaly
    let nu = 2.0 * libm::atan(libm::sqrt((1.0 + e) / (1.0 - e)) * libm::tan(ea / 2.0));

    let r = a * (1.0 - e * libm::cos(ea));
    let p = a * (1.0 - e * e);
    let h = libm::sqrt(mu * p);

    let (sin_om, cos_om) = libm::sincos(om);
    let (sin_wnu, cos_wnu) = libm::sincos(w + nu);
    let (sin_i, cos_i) = libm::sincos(i);

    let x = r * (cos_om * cos_wnu - sin_om * sin_wnu * cos_i);
    let y = r * (sin_om * cos_wnu + cos_om * sin_wnu * cos_i);
    let z = r * (sin_i * sin_wnu);

    let radial = h * e / (r * p) * libm::sin(nu);
    let vx = x * radial - h / r * (cos_om * sin_wnu + sin_om * cos_wnu * cos_i);
    let vy = y * radial - h / r * (sin_om * sin_wnu - cos_om * cos_wnu * cos_i);
    let vz = z * radial + h / r * (cos_wnu * sin_i);

    (NVec3::new(x, y, z), NVec3::new(vx, vy, vz))
}

/// Elements of the orbit through `(x, v)` about a parent with parameter `mu`
///
/// The returned epoch is `t`. For circular orbits the periapsis is put at the
/// ascending node, and for equatorial orbits Ω is 0, so ϖ and ML stay
/// well-defined in both cases.
pub fn cart_to_kep(mu: f64, x: NVec3, v: NVec3, t: f64) -> OrbitalElements {
    const TOL: f64 = 1e-10;

    let r = x.norm();
    let hv = x.cross(&v);
    let h = hv.norm();
    let nv = NVec3::z().cross(&hv);
    let ev = ((v.norm_squared() - mu / r) * x - x.dot(&v) * v) / mu;
    let e = ev.norm();
    let p = h * h / mu;
    let a = p / (1.0 - e * e);
    let i = libm::acos((hv.z / h).clamp(-1.0, 1.0));

    let circular = e < TOL;
    let equatorial = i.abs() < TOL || (PI - i).abs() < TOL;

    let lan = if equatorial {
        0.0
    } else {
        libm::atan2(nv.y, nv.x)
    };

    // Angle from the node line (or the x axis) to the position, in the orbit plane
    let true_longitude_from_node = if equatorial {
        libm::atan2(x.y, x.x) * hv.z.signum() - lan
    } else {
        let n_hat = nv / nv.norm();
        libm::atan2(x.dot(&hv.cross(&n_hat)) / h, x.dot(&n_hat))
    };

    let (arg_pe, ta) = if circular {
        (0.0, true_longitude_from_node)
    } else {
        let ta = libm::atan2(hv.dot(&ev.cross(&x)) / h, x.dot(&ev));
        (true_longitude_from_node - ta, ta)
    };

    let ea = 2.0 * libm::atan(libm::sqrt((1.0 - e) / (1.0 + e)) * libm::tan(ta / 2.0));
    let ma = ea - e * libm::sin(ea);
    let lon_pe = lan + arg_pe;

    OrbitalElements {
        a,
        e,
        i,
        lan: wrap_angle(lan),
        lon_pe: wrap_angle(lon_pe),
        ml: wrap_angle(lon_pe + ma),
        epoch: t,
    }
}

/// Wrap into [0, 2π)
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
