/// Mapping between planar coordinates, grid row/column and flat pixel indices.
///
/// The grid is row-major with its origin at the top-left: row 1 holds the
/// northernmost (max y) pixels. Rows, columns and linear indices are
/// 1-based; storage is 0-based, see [`storage_offset`].
use crate::context::RasterContext;
use crate::point::Point;

/// 1-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PixelCoord {
    pub row: usize,
    pub col: usize,
}

/// Linear index of the pixel containing `point`, saturating at the grid edge.
pub fn pixel_of_point(point: &Point, ctx: &RasterContext) -> usize {
    let coord = coord_of_point(point.x, point.y, ctx);
    linear_index(coord, ctx.width)
}

/// Row and column of the pixel containing `(x, y)`.
pub fn coord_of_point(x: f64, y: f64, ctx: &RasterContext) -> PixelCoord {
    let elongation_x = (ctx.max_x - ctx.min_x).abs();
    let percent_x = (x - ctx.min_x) / elongation_x;

    // rows grow southward while y grows northward
    let elongation_y = (ctx.max_y - ctx.min_y).abs();
    let percent_y = 1.0 - (y - ctx.min_y) / elongation_y;

    PixelCoord {
        row: cell(percent_y, ctx.height),
        col: cell(percent_x, ctx.width),
    }
}

/// `row * width - (width - col)`
pub fn linear_index(coord: PixelCoord, width: usize) -> usize {
    coord.row * width - (width - coord.col)
}

/// Row of a linear index. An exact multiple of `width` is the last column of
/// row `index / width`, not the first of the next one.
pub fn compute_coords_y(index: usize, width: usize) -> usize {
    if index % width == 0 {
        index / width
    } else {
        index / width + 1
    }
}

/// Column of a linear index whose row is already known.
pub fn compute_coords_x(index: usize, row: usize, width: usize) -> usize {
    width - (row * width - index)
}

/// Inverse of [`linear_index`].
pub fn coord_of_index(index: usize, width: usize) -> PixelCoord {
    let row = compute_coords_y(index, width);
    PixelCoord {
        row,
        col: compute_coords_x(index, row, width),
    }
}

/// Offset into the 0-based pixel storage.
pub fn storage_offset(index: usize) -> usize {
    index - 1
}

/// Real-world centre of a pixel.
pub fn pixel_center(coord: PixelCoord, ctx: &RasterContext) -> (f64, f64) {
    let center_x = (coord.col as f64 * ctx.lg_pix + ctx.min_x) - ctx.lg_pix / 2.0;
    let center_y = (ctx.max_y - coord.row as f64 * ctx.h_pix) + ctx.h_pix / 2.0;
    (center_x, center_y)
}

/// Inclusive bounding box, in grid cells, of a set of points.
pub fn bounding_box(points: &[&Point], ctx: &RasterContext) -> (PixelCoord, PixelCoord) {
    let mut min = PixelCoord {
        row: usize::MAX,
        col: usize::MAX,
    };
    let mut max = PixelCoord { row: 1, col: 1 };

    for point in points {
        let coord = coord_of_index(pixel_of_point(point, ctx), ctx.width);
        min.row = min.row.min(coord.row);
        min.col = min.col.min(coord.col);
        max.row = max.row.max(coord.row);
        max.col = max.col.max(coord.col);
    }
    (min, max)
}

/// Scale a 0-1 fraction to a 1-based cell clamped to `[1, cells]`.
fn cell(fraction: f64, cells: usize) -> usize {
    // NaN (zero extent) saturates to 0 and lands on the first cell
    let cell = (fraction * cells as f64) as i64 + 1;
    cell.clamp(1, cells as i64) as usize
}
