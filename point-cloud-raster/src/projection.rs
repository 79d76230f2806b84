/// Geographic to planar coordinate projection
use constants::coordinate_system::{
    GRS80_INVERSE_FLATTENING, GRS80_SEMI_MAJOR_AXIS, LAMBERT_CENTRAL_MERIDIAN,
    LAMBERT_FALSE_EASTING, LAMBERT_FALSE_NORTHING, LAMBERT_LATITUDE_OF_ORIGIN,
    LAMBERT_STANDARD_PARALLEL_1, LAMBERT_STANDARD_PARALLEL_2,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// Lambert conformal conic with two standard parallels (degrees, metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambertParams {
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Default for LambertParams {
    fn default() -> Self {
        Self {
            standard_parallel_1: LAMBERT_STANDARD_PARALLEL_1,
            standard_parallel_2: LAMBERT_STANDARD_PARALLEL_2,
            latitude_of_origin: LAMBERT_LATITUDE_OF_ORIGIN,
            central_meridian: LAMBERT_CENTRAL_MERIDIAN,
            false_easting: LAMBERT_FALSE_EASTING,
            false_northing: LAMBERT_FALSE_NORTHING,
        }
    }
}

/// How raw sample coordinates become planar metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Coordinates are already planar
    Planar,
    /// (longitude, latitude) in degrees on GRS80
    LambertConformal(LambertParams),
}

impl Default for Projection {
    fn default() -> Self {
        Projection::LambertConformal(LambertParams::default())
    }
}

impl Projection {
    /// Project `(x, y)`; for geographic input `x` is the longitude and `y`
    /// the latitude.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        self.projector().project(x, y)
    }

    /// Precompute the projection constants once for a batch of points.
    pub fn projector(&self) -> Projector {
        match self {
            Projection::Planar => Projector(None),
            Projection::LambertConformal(params) => Projector(Some(LambertConic::new(params))),
        }
    }
}

/// A [`Projection`] ready to be applied to many points.
pub struct Projector(Option<LambertConic>);

impl Projector {
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        match &self.0 {
            None => (x, y),
            Some(cone) => cone.forward(x, y),
        }
    }
}

/// Precomputed cone constants (Snyder, Map Projections, eq. 15-1 to 15-10).
struct LambertConic {
    e: f64,
    n: f64,
    a_f: f64,
    rho_0: f64,
    lambda_0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl LambertConic {
    fn new(params: &LambertParams) -> Self {
        let flattening = 1.0 / GRS80_INVERSE_FLATTENING;
        let e = (2.0 * flattening - flattening * flattening).sqrt();

        let phi_1 = params.standard_parallel_1.to_radians();
        let phi_2 = params.standard_parallel_2.to_radians();
        let phi_0 = params.latitude_of_origin.to_radians();

        let m_1 = m(phi_1, e);
        let m_2 = m(phi_2, e);
        let t_1 = t(phi_1, e);
        let t_2 = t(phi_2, e);

        let n = if (phi_1 - phi_2).abs() < f64::EPSILON {
            phi_1.sin()
        } else {
            (m_1.ln() - m_2.ln()) / (t_1.ln() - t_2.ln())
        };
        let f = m_1 / (n * t_1.powf(n));
        let a_f = GRS80_SEMI_MAJOR_AXIS * f;

        Self {
            e,
            n,
            a_f,
            rho_0: a_f * t(phi_0, e).powf(n),
            lambda_0: params.central_meridian.to_radians(),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
        }
    }

    fn forward(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let rho = self.a_f * t(latitude.to_radians(), self.e).powf(self.n);
        let theta = self.n * (longitude.to_radians() - self.lambda_0);

        (
            self.false_easting + rho * theta.sin(),
            self.false_northing + self.rho_0 - rho * theta.cos(),
        )
    }
}

fn m(phi: f64, e: f64) -> f64 {
    let sin = phi.sin();
    phi.cos() / (1.0 - e * e * sin * sin).sqrt()
}

fn t(phi: f64, e: f64) -> f64 {
    let sin = phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - e * sin) / (1.0 + e * sin)).powf(e / 2.0)
}
