/// Haxby colour map stops: (value, [r, g, b]) with channels in 0-1
pub const HAXBY_STOPS: &[(f64, [f64; 3])] = &[
    (0.0, [0.0, 0.1, 0.4]),
    (0.35, [0.0, 0.9, 1.0]),
    (0.5, [0.6, 1.0, 0.6]),
    (0.65, [1.0, 1.0, 0.6]),
    (1.0, [1.0, 0.5, 0.0]),
];

/// Colour written for pixels outside the triangulated surface
pub const BACKGROUND_RGB: [u8; 3] = [0, 0, 0];
