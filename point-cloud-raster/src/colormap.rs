/// Colour transfer function sampled by colour index
use constants::palette::HAXBY_STOPS;
use image::Rgb;

/// Piecewise-linear RGB transfer function over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    /// (value, [r, g, b]) sorted by value, channels in 0-1
    stops: Vec<(f64, [f64; 3])>,
}

impl Colormap {
    /// Build from stops in any order.
    pub fn new(mut stops: Vec<(f64, [f64; 3])>) -> Self {
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Bathymetric Haxby map: deep blue through cyan and green to orange.
    pub fn haxby() -> Self {
        Self::new(HAXBY_STOPS.to_vec())
    }

    /// Colour at `value`, clamped to the first and last stops.
    pub fn map_value(&self, value: f64) -> Rgb<u8> {
        let rgb = self.interpolate(value);
        Rgb(rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8))
    }

    fn interpolate(&self, value: f64) -> [f64; 3] {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return [0.0; 3];
        };
        if !(value > first.0) {
            return first.1;
        }
        if value >= last.0 {
            return last.1;
        }

        for pair in self.stops.windows(2) {
            let (v0, c0) = pair[0];
            let (v1, c1) = pair[1];
            if value <= v1 {
                let t = if v1 > v0 { (value - v0) / (v1 - v0) } else { 1.0 };
                return [
                    c0[0] + (c1[0] - c0[0]) * t,
                    c0[1] + (c1[1] - c0[1]) * t,
                    c0[2] + (c1[2] - c0[2]) * t,
                ];
            }
        }
        last.1
    }
}
