use super::{position, squared_distance, Point};
use crate::prelude::*;

use std::cmp::Ordering;

/// The nearest mesh nodes of every probe, closest first
///
/// A search is only valid for the mesh it was run against. Meshes of a time series usually
/// share their nodes, so the same `Neighbors` is reused for every snapshot with the same
/// number of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Neighbors {
    indices: Vec<Vec<usize>>,
    num_nodes: usize,
}

impl Neighbors {
    /// find the `k` nodes of `points` closest to each probe
    ///
    /// Distances are measured over the first `dim.count()` coordinates. Every probe costs a
    /// single partial selection over all nodes, ties are broken by node index.
    pub fn search(points: ArrayView2<'_, f64>, probes: &[Point], k: usize, dim: Dim) -> Self {
        let num_nodes = points.nrows();
        let k = k.min(num_nodes);

        let indices = probes
            .iter()
            .map(|probe| {
                if k == 0 {
                    return Vec::new();
                }

                let mut distances: Vec<(f64, usize)> = (0..num_nodes)
                    .map(|node| {
                        let distance = squared_distance(&position(points, node, dim), probe, dim);
                        (distance, node)
                    })
                    .collect();

                if k < num_nodes {
                    distances.select_nth_unstable_by(k - 1, by_distance);
                    distances.truncate(k);
                }
                distances.sort_unstable_by(by_distance);

                distances.into_iter().map(|(_, node)| node).collect()
            })
            .collect();

        log::trace!(
            "searched {} neighbours for {} probes among {} nodes",
            k,
            probes.len(),
            num_nodes
        );

        Self { indices, num_nodes }
    }

    /// neighbours of probe `probe`, closest first
    pub fn of(&self, probe: usize) -> &[usize] {
        self.indices.get(probe).map(Vec::as_slice).unwrap_or(&[])
    }

    /// number of nodes of the mesh the search ran against
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// number of probes
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn by_distance(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of_nodes() -> Array2<f64> {
        let mut points = Array2::zeros((10, 3));
        for (i, mut row) in points.outer_iter_mut().enumerate() {
            row[0] = i as f64;
            // the z offset only matters in three dimensions
            row[2] = if i % 2 == 0 { 0.0 } else { 100.0 };
        }
        points
    }

    #[test]
    fn closest_first() {
        let points = line_of_nodes();
        let probes = [[3.2, 0.0, 0.0]];
        let neighbors = Neighbors::search(points.view(), &probes, 3, Dim::Two);

        assert_eq!(neighbors.of(0), &[3, 4, 2]);
        assert_eq!(neighbors.num_nodes(), 10);
    }

    #[test]
    fn three_dimensional_distance() {
        let points = line_of_nodes();
        let probes = [[3.2, 0.0, 0.0]];
        let neighbors = Neighbors::search(points.view(), &probes, 2, Dim::Three);

        assert_eq!(neighbors.of(0), &[4, 2]);
    }

    #[test]
    fn more_neighbors_than_nodes() {
        let points = line_of_nodes();
        let probes = [[0.0; 3], [9.0, 0.0, 0.0]];
        let neighbors = Neighbors::search(points.view(), &probes, 20, Dim::Two);

        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors.of(0).len(), 10);
        assert_eq!(neighbors.of(1)[0], 9);
        assert!(neighbors.of(5).is_empty());
    }

    #[test]
    fn ties_break_by_index() {
        let points = line_of_nodes();
        let probes = [[4.5, 0.0, 0.0]];
        let neighbors = Neighbors::search(points.view(), &probes, 2, Dim::Two);

        assert_eq!(neighbors.of(0), &[4, 5]);
    }
}
