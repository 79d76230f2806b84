/// Triangle geometry model: supporting plane, containment and shading
use crate::point::Point;
use constants::render_settings::{
    FULL_ILLUMINATION, LIT_MIN, LIT_RANGE, SHADOW_MIN, SHADOW_RANGE,
};
use glam::DVec3;

/// Triangle borrowing three samples from the immutable point list.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    pub p1: &'a Point,
    pub p2: &'a Point,
    pub p3: &'a Point,
    /// `(p3 - p2) x (p3 - p1)` in (x, y, depth) space
    pub normal: DVec3,
    /// Shading factor in [0, 1], fully lit until computed
    pub illumination: f64,
}

impl<'a> Triangle<'a> {
    /// Build the triangle and its plane normal. The three points must not be
    /// collinear in plan view; check [`Triangle::is_degenerate`] before
    /// interpolating depths.
    pub fn new(p1: &'a Point, p2: &'a Point, p3: &'a Point) -> Self {
        let e1 = to_vec(p3) - to_vec(p2);
        let e2 = to_vec(p3) - to_vec(p1);

        Self {
            p1,
            p2,
            p3,
            normal: e1.cross(e2),
            illumination: FULL_ILLUMINATION,
        }
    }

    /// Planar (x, y) area. Equal to half the depth coefficient of the plane.
    pub fn planar_area(&self) -> f64 {
        self.normal.z.abs() / 2.0
    }

    /// True when the plane cannot be solved for depth reliably.
    pub fn is_degenerate(&self, min_area: f64) -> bool {
        !(self.planar_area() > min_area) || !self.normal.is_finite()
    }

    /// Boundary-inclusive point-in-triangle test in plan view.
    pub fn contain(&self, x: f64, y: f64) -> bool {
        let c1 = edge_side(x, y, self.p1, self.p2);
        let c2 = edge_side(x, y, self.p2, self.p3);
        let c3 = edge_side(x, y, self.p3, self.p1);

        let has_neg = c1 < 0.0 || c2 < 0.0 || c3 < 0.0;
        let has_pos = c1 > 0.0 || c2 > 0.0 || c3 > 0.0;

        !(has_neg && has_pos)
    }

    /// Depth of the supporting plane `a x + b y + c z + d = 0` at `(x, y)`.
    /// Only meaningful for points inside the triangle.
    pub fn compute_depth(&self, x: f64, y: f64) -> f64 {
        let DVec3 { x: a, y: b, z: c } = self.normal;
        let d = -(a * self.p1.x + b * self.p1.y + c * self.p1.depth);

        -(a * x + b * y + d) / c
    }

    /// Shade the face for a directional light and store the result.
    pub fn compute_illumination(&mut self, light_dir: DVec3) -> f64 {
        let light = light_dir.normalize_or_zero();
        let face = (-self.normal).normalize_or_zero();

        self.illumination = remap_illumination(light.dot(face));
        self.illumination
    }

    /// Longest edge length in plan view.
    pub fn longest_edge(&self) -> f64 {
        longest_edge(
            (self.p1.x, self.p1.y),
            (self.p2.x, self.p2.y),
            (self.p3.x, self.p3.y),
        )
    }
}

/// Map the signed cosine between light and face to a softened two-tier
/// illumination factor. Faces toward the light stay within [0.8, 1], faces
/// away from it within [0.5, 0.8].
pub fn remap_illumination(raw: f64) -> f64 {
    if raw > 0.0 {
        LIT_MIN.max(LIT_MIN + raw.powf(1.0 / 3.0) * LIT_RANGE)
    } else {
        SHADOW_MIN.max(SHADOW_MIN + (1.0 - raw.abs().powf(0.5)) * SHADOW_RANGE)
    }
}

/// Longest of the three edges of a plan-view triangle.
pub fn longest_edge(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let ab = (b.0 - a.0).hypot(b.1 - a.1);
    let bc = (c.0 - b.0).hypot(c.1 - b.1);
    let ca = (a.0 - c.0).hypot(a.1 - c.1);
    ab.max(bc).max(ca)
}

fn to_vec(p: &Point) -> DVec3 {
    DVec3::new(p.x, p.y, p.depth)
}

/// Side of `(x0, y0)` relative to the edge `a -> b`; zero on the edge.
fn edge_side(x0: f64, y0: f64, a: &Point, b: &Point) -> f64 {
    (x0 - b.x) * (a.y - b.y) - (a.x - b.x) * (y0 - b.y)
}
