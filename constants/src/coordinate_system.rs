/// GRS80 ellipsoid semi-major axis (m)
pub const GRS80_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// GRS80 ellipsoid inverse flattening
pub const GRS80_INVERSE_FLATTENING: f64 = 298.257_222_101;

/// Lambert conformal conic parameters used for the survey area (degrees / metres).
/// Standard parallels 49°N and 44°N, origin centred on the survey footprint.
pub const LAMBERT_STANDARD_PARALLEL_1: f64 = 49.0;
pub const LAMBERT_STANDARD_PARALLEL_2: f64 = 44.0;
pub const LAMBERT_LATITUDE_OF_ORIGIN: f64 = 48.199161330566646;
pub const LAMBERT_CENTRAL_MERIDIAN: f64 = -3.0146392003209987;
pub const LAMBERT_FALSE_EASTING: f64 = 0.0;
pub const LAMBERT_FALSE_NORTHING: f64 = 0.0;
