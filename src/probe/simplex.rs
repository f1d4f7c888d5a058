//! barycentric interpolation over simplices built from a probe's neighbours

use super::Point;
use crate::mesh::Dim;

/// relative size below which a simplex is considered flat
const DEGENERATE: f64 = 1e-10;

/// barycentric coordinates down to this value still count as inside
const INSIDE: f64 = -1e-10;

/// A simplex (triangle or tetrahedron) containing a probe
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Containing {
    /// indices into the candidate list
    pub(crate) vertices: Vec<usize>,
    pub(crate) weights: Vec<f64>,
}

/// Among every simplex that can be formed from `candidates`, find the non-degenerate one that
/// contains `probe` and whose vertices are closest to it
///
/// `candidates` must hold positions with unused coordinates set to zero, `distances` the
/// squared distance of each candidate to the probe.
pub(crate) fn locate(
    probe: &Point,
    candidates: &[Point],
    distances: &[f64],
    dim: Dim,
) -> Option<Containing> {
    let size = dim.count() + 1;
    let mut best: Option<(f64, Containing)> = None;

    for combination in Combinations::new(candidates.len(), size) {
        let score: f64 = combination.iter().map(|&i| distances[i]).sum();

        if matches!(&best, Some((best_score, _)) if *best_score <= score) {
            continue;
        }

        let vertices: Vec<&Point> = combination.iter().map(|&i| &candidates[i]).collect();

        let weights = match dim {
            Dim::Two => barycentric_2d(probe, &vertices),
            Dim::Three => barycentric_3d(probe, &vertices),
        };

        if let Some(weights) = weights.filter(|w| w.iter().all(|x| *x >= INSIDE)) {
            best = Some((
                score,
                Containing {
                    vertices: combination,
                    weights,
                },
            ));
        }
    }

    best.map(|(_, containing)| containing)
}

fn sub(a: &Point, b: &Point) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(a: &[f64; 3]) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

fn barycentric_2d(probe: &Point, vertices: &[&Point]) -> Option<Vec<f64>> {
    let e1 = sub(vertices[1], vertices[0]);
    let e2 = sub(vertices[2], vertices[0]);
    let r = sub(probe, vertices[0]);

    let det = e1[0] * e2[1] - e2[0] * e1[1];
    if det.abs() <= DEGENERATE * norm(&e1) * norm(&e2) {
        return None;
    }

    let l1 = (r[0] * e2[1] - e2[0] * r[1]) / det;
    let l2 = (e1[0] * r[1] - r[0] * e1[1]) / det;

    Some(vec![1.0 - l1 - l2, l1, l2])
}

fn det3(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    // columns a, b, c
    a[0] * (b[1] * c[2] - c[1] * b[2]) - b[0] * (a[1] * c[2] - c[1] * a[2])
        + c[0] * (a[1] * b[2] - b[1] * a[2])
}

fn barycentric_3d(probe: &Point, vertices: &[&Point]) -> Option<Vec<f64>> {
    let e1 = sub(vertices[1], vertices[0]);
    let e2 = sub(vertices[2], vertices[0]);
    let e3 = sub(vertices[3], vertices[0]);
    let r = sub(probe, vertices[0]);

    let det = det3(&e1, &e2, &e3);
    if det.abs() <= DEGENERATE * norm(&e1) * norm(&e2) * norm(&e3) {
        return None;
    }

    let l1 = det3(&r, &e2, &e3) / det;
    let l2 = det3(&e1, &r, &e3) / det;
    let l3 = det3(&e1, &e2, &r) / det;

    Some(vec![1.0 - l1 - l2 - l3, l1, l2, l3])
}

/// every `size` element subset of `0..n` in lexicographic order
struct Combinations {
    n: usize,
    current: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, size: usize) -> Self {
        Self {
            n,
            current: (0..size).collect(),
            done: size > n || size == 0,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let out = self.current.clone();
        let size = self.current.len();

        // advance the right-most index that still has room
        match (0..size).rev().find(|&i| self.current[i] < self.n - size + i) {
            Some(i) => {
                self.current[i] += 1;
                for j in i + 1..size {
                    self.current[j] = self.current[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 3).collect();
        assert_eq!(
            all,
            vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]]
        );
        assert_eq!(Combinations::new(20, 4).count(), 4845);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn triangle_weights() {
        let a = [0.0, 0.0, 0.0];
        let b = [2.0, 0.0, 0.0];
        let c = [0.0, 2.0, 0.0];
        let w = barycentric_2d(&[0.5, 0.5, 0.0], &[&a, &b, &c]).unwrap();

        assert!((w[0] - 0.5).abs() < 1e-12);
        assert!((w[1] - 0.25).abs() < 1e-12);
        assert!((w[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn collinear_triangle_is_rejected() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.0, 0.0];
        let c = [2.0, 0.0, 0.0];
        assert!(barycentric_2d(&[0.5, 0.0, 0.0], &[&a, &b, &c]).is_none());
    }

    #[test]
    fn tetrahedron_weights_sum_to_one() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.0, 0.0];
        let c = [0.0, 1.0, 0.0];
        let d = [0.0, 0.0, 1.0];
        let w = barycentric_3d(&[0.1, 0.2, 0.3], &[&a, &b, &c, &d]).unwrap();

        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[1] - 0.1).abs() < 1e-12);
        assert!((w[3] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn closest_containing_triangle() {
        let candidates = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [10.0, 10.0, 0.0],
            [-10.0, 0.0, 0.0],
        ];
        let probe: [f64; 3] = [0.2, 0.2, 0.0];
        let distances: Vec<f64> = candidates
            .iter()
            .map(|c| (c[0] - probe[0]).powi(2) + (c[1] - probe[1]).powi(2))
            .collect();

        let found = locate(&probe, &candidates, &distances, Dim::Two).unwrap();
        assert_eq!(found.vertices, vec![0, 1, 2]);

        let outside = locate(&[50.0, 0.0, 0.0], &candidates, &distances, Dim::Two);
        assert!(outside.is_none());
    }
}
