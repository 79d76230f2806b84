/// Statistical removal of triangles that bridge concave parts of the footprint.
///
/// A Delaunay mesh always covers the convex hull of the samples, so on a
/// non-convex survey the triangles spanning the gaps have abnormally long
/// edges. The longest edge of every triangle is measured, and triangles above
/// `min(max + 1, mean * (1 + 1 / relative_std))` are discarded.
use crate::triangle::longest_edge;
use serde::Serialize;

/// Statistics of the longest-edge distribution and the resulting cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStatistics {
    pub mean: f64,
    pub std_dev: f64,
    /// `|std_dev / mean|`
    pub relative_std: f64,
    pub max_edge: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Surviving triangles, in input order
    pub kept: Vec<[usize; 3]>,
    pub rejected: usize,
    /// `None` when there was nothing to measure
    pub stats: Option<EdgeStatistics>,
}

/// Longest plan-view edge of every triangle of a flat index list. Panics on
/// indices outside `coords`, like [`filter_triangles`].
pub fn longest_edges(coords: &[f64], triangles: &[usize]) -> Vec<f64> {
    triangles
        .chunks_exact(3)
        .map(|t| longest_edge(vertex(coords, t[0]), vertex(coords, t[1]), vertex(coords, t[2])))
        .collect()
}

/// Mean, population standard deviation and threshold of longest edges.
pub fn edge_statistics(edges: &[f64]) -> Option<EdgeStatistics> {
    if edges.is_empty() {
        return None;
    }

    let count = edges.len() as f64;
    let mean = edges.iter().sum::<f64>() / count;
    let variance = edges.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / count;
    let std_dev = variance.sqrt();
    let max_edge = edges.iter().copied().fold(0.0, f64::max);

    let ceiling = max_edge + 1.0;
    let (relative_std, threshold) = if mean > 0.0 && std_dev > 0.0 {
        let relative_std = (std_dev / mean).abs();
        (relative_std, ceiling.min(mean * (1.0 + 1.0 / relative_std)))
    } else {
        // uniform (or collapsed) mesh: nothing stands out
        (0.0, ceiling)
    };

    Some(EdgeStatistics {
        mean,
        std_dev,
        relative_std,
        max_edge,
        threshold,
    })
}

/// Keep triangles whose longest edge does not exceed the adaptive threshold.
///
/// # Panics
///
/// Every index must address a point of `coords` (`2 * index + 1 < coords.len()`).
/// Untrusted lists go through [`crate::rasterizer::validate_mesh`] first.
pub fn filter_triangles(coords: &[f64], triangles: &[usize]) -> FilterOutcome {
    let edges = longest_edges(coords, triangles);
    let Some(stats) = edge_statistics(&edges) else {
        return FilterOutcome::default();
    };

    let kept: Vec<[usize; 3]> = triangles
        .chunks_exact(3)
        .zip(&edges)
        .filter(|(_, edge)| **edge <= stats.threshold)
        .map(|(t, _)| [t[0], t[1], t[2]])
        .collect();

    FilterOutcome {
        rejected: edges.len() - kept.len(),
        kept,
        stats: Some(stats),
    }
}

fn vertex(coords: &[f64], index: usize) -> (f64, f64) {
    (coords[2 * index], coords[2 * index + 1])
}
