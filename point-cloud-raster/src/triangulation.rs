/// Delaunay triangulation of the flat coordinate buffer
use crate::error::{RasterError, Result};
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};

/// Triangulation vertex remembering its index in the point list.
#[derive(Debug, Clone, Copy)]
struct IndexedVertex {
    position: Point2<f64>,
    index: usize,
}

impl HasPosition for IndexedVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Triangulate `{x0, y0, x1, y1, ...}` and return a flat list of point
/// indices, three per triangle, counter-clockwise.
///
/// Samples sharing a planar position collapse to one vertex; the others are
/// simply not referenced.
pub fn triangulate(coords: &[f64]) -> Result<Vec<usize>> {
    let vertices: Vec<IndexedVertex> = coords
        .chunks_exact(2)
        .enumerate()
        .map(|(index, xy)| IndexedVertex {
            position: Point2::new(xy[0], xy[1]),
            index,
        })
        .collect();

    if vertices.len() < 3 {
        return Err(RasterError::NotEnoughPoints {
            found: vertices.len(),
        });
    }
    if let Some(bad) = vertices
        .iter()
        .find(|v| !(v.position.x.is_finite() && v.position.y.is_finite()))
    {
        return Err(RasterError::Triangulation(format!(
            "point {} has non-finite coordinates",
            bad.index
        )));
    }

    let triangulation = DelaunayTriangulation::<IndexedVertex>::bulk_load(vertices)
        .map_err(|e| RasterError::Triangulation(format!("{e:?}")))?;

    let mut indices = Vec::with_capacity(triangulation.num_inner_faces() * 3);
    for face in triangulation.inner_faces() {
        for vertex in face.vertices() {
            indices.push(vertex.data().index);
        }
    }
    Ok(indices)
}
