/// Depth to colour-index quantization
use crate::context::{ColorIndex, RasterContext};

/// Colour index of an interpolated depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantized {
    pub index: ColorIndex,
    /// The depth lay deeper than `max_depth` and was clamped to `nb_colors`
    pub clamped: bool,
}

/// `max(0, (depth - min_depth) * nb_colors / (max_depth - min_depth))`,
/// truncated, then clamped to the last palette sample.
pub fn convert_to_color(depth: f64, ctx: &RasterContext) -> Quantized {
    let elongation = ctx.max_depth - ctx.min_depth;
    if elongation == 0.0 {
        return Quantized {
            index: 0,
            clamped: false,
        };
    }

    let scaled = ((depth - ctx.min_depth) * ctx.nb_colors as f64 / elongation).max(0.0);
    let index = scaled.trunc();

    if index > ctx.nb_colors as f64 {
        Quantized {
            index: ctx.nb_colors,
            clamped: true,
        }
    } else {
        Quantized {
            index: index as ColorIndex,
            clamped: false,
        }
    }
}
