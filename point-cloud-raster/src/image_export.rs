/// Shaded colour image export
use crate::colormap::Colormap;
use crate::error::Result;
use crate::rasterizer::PixelBuffer;
use constants::palette::BACKGROUND_RGB;
use constants::render_settings::FULL_ILLUMINATION;
use image::{Rgb, RgbImage};
use std::path::Path;

/// Scale every channel by the illumination factor, truncating.
pub fn darken(color: Rgb<u8>, illumination: f64) -> Rgb<u8> {
    if illumination == FULL_ILLUMINATION {
        return color;
    }
    Rgb(color.0.map(|c| (c as f64 * illumination) as u8))
}

/// Convert colour indices and illumination into an RGB image. Unpainted
/// pixels are written as the background colour.
pub fn shade_image(buffer: &PixelBuffer, colormap: &Colormap, nb_colors: u32) -> RgbImage {
    let mut image = RgbImage::new(buffer.width() as u32, buffer.height() as u32);

    let pixels = buffer.colors().iter().zip(buffer.illumination());
    for ((&color, &illumination), out) in pixels.zip(image.pixels_mut()) {
        *out = if color == buffer.default_color() {
            Rgb(BACKGROUND_RGB)
        } else {
            let base = colormap.map_value(color as f64 / nb_colors as f64);
            darken(base, illumination)
        };
    }
    image
}

/// Write the shaded image; the format follows the file extension
/// (`.ppm` gives a binary P6 pixmap, `.png` a PNG, ...).
pub fn write_image(
    path: &Path,
    buffer: &PixelBuffer,
    colormap: &Colormap,
    nb_colors: u32,
) -> Result<()> {
    shade_image(buffer, colormap, nb_colors).save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::TerrainBounds;
    use crate::context::{RasterContext, RenderSettings};
    use crate::point::Point;
    use crate::rasterizer::Rasterizer;
    use crate::triangle::Triangle;

    fn lower_left_triangle() -> (Vec<Point>, RasterContext) {
        let points = vec![
            Point::new(0.0, 0.0, -1.0),
            Point::new(1.0, 0.0, -2.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let bounds = TerrainBounds::from_points(&points);
        let ctx = RasterContext::new(4, 4, &bounds, &RenderSettings::default()).unwrap();
        (points, ctx)
    }

    #[test]
    fn unpainted_is_black_and_painted_is_shaded_palette() {
        let (points, ctx) = lower_left_triangle();
        let mut triangle = Triangle::new(&points[0], &points[1], &points[2]);
        triangle.compute_illumination(ctx.sun_dir);

        let mut buffer = PixelBuffer::new(&ctx);
        Rasterizer::new(&ctx).rasterize(&[triangle], &mut buffer);

        let colormap = Colormap::haxby();
        let image = shade_image(&buffer, &colormap, ctx.nb_colors);
        assert_eq!(image.dimensions(), (4, 4));

        let mut unpainted = 0;
        for (offset, pixel) in image.pixels().enumerate() {
            let color = buffer.colors()[offset];
            if color == buffer.default_color() {
                unpainted += 1;
                assert_eq!(*pixel, Rgb([0, 0, 0]), "offset {offset}");
            } else {
                let expected = darken(
                    colormap.map_value(color as f64 / ctx.nb_colors as f64),
                    buffer.illumination()[offset],
                );
                assert_eq!(*pixel, expected, "offset {offset}");
            }
        }
        // centres above the hypotenuse x + y = 1 stay unpainted
        assert_eq!(unpainted, 6);
        assert_eq!(buffer.painted_count(), 10);
    }

    #[test]
    fn shallowest_colour_index_is_not_background() {
        let (_, ctx) = lower_left_triangle();
        let mut buffer = PixelBuffer::new(&ctx);
        assert!(buffer.try_claim(0, 0, FULL_ILLUMINATION));

        let colormap = Colormap::haxby();
        let image = shade_image(&buffer, &colormap, ctx.nb_colors);
        assert_eq!(*image.get_pixel(0, 0), colormap.map_value(0.0));
        assert_ne!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(1, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn full_light_keeps_colour() {
        assert_eq!(darken(Rgb([200, 100, 50]), 1.0), Rgb([200, 100, 50]));
    }

    #[test]
    fn darkening_truncates() {
        assert_eq!(darken(Rgb([200, 101, 255]), 0.5), Rgb([100, 50, 127]));
        assert_eq!(darken(Rgb([10, 10, 10]), 0.8), Rgb([8, 8, 8]));
    }
}
