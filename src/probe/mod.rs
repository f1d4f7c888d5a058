//! # Probes
//!
//! Spatial interpolation of mesh fields at arbitrary points.
//!
//! Interpolation is done in two steps. [`Neighbors::search`] finds the closest mesh nodes of
//! every probe, then [`interpolate`] evaluates a field from the values at those nodes with one
//! of the available [`Method`]s. The search is the expensive part and only depends on the
//! node coordinates, so it can be reused for every field and every snapshot of a time series
//! that shares the mesh.
//!
//! ```
//! use vtu_probe::prelude::*;
//! use vtu_probe::{interpolate, Neighbors};
//! use vtu_probe::ndarray::Array2;
//!
//! // a unit square split into two triangles, with the field `x + 2y`
//! let points = Array2::from_shape_vec(
//!     (4, 3),
//!     vec![0., 0., 0., 1., 0., 0., 0., 1., 0., 1., 1., 0.],
//! )
//! .unwrap();
//! let field = DataArray::scalar("f", vec![0.0, 1.0, 2.0, 3.0]);
//!
//! let options = ProbeOptions::default().with_dim(Dim::Two);
//! let probes = [[0.25, 0.5, 0.0]];
//!
//! let neighbors = Neighbors::search(points.view(), &probes, options.neighbors, options.dim);
//! let values = interpolate(&neighbors, points.view(), &probes, &field, &options)?;
//!
//! assert!((values[[0, 0]] - 1.25).abs() < 1e-12);
//! # Ok::<(), vtu_probe::Error>(())
//! ```

mod neighbors;
mod simplex;

pub use neighbors::Neighbors;

use crate::prelude::*;

use std::collections::BTreeMap;

/// A location in space. For two dimensional meshes the last coordinate is ignored.
pub type Point = [f64; 3];

/// How a field is evaluated from the values at a probe's neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// barycentric interpolation on the closest triangle (2D) or tetrahedron (3D) around the
    /// probe. Linear fields are reproduced exactly, probes outside of the neighbours' hull
    /// are NaN.
    #[default]
    Linear,
    /// value at the closest node
    Nearest,
    /// inverse squared distance weighting of all neighbours
    InverseDistance,
}

/// Settings shared by every probing operation of a [`VtuFile`](crate::VtuFile) or
/// [`PvdFile`](crate::PvdFile)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    pub dim: Dim,
    /// number of nearest nodes considered for each probe
    pub neighbors: usize,
    pub method: Method,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            dim: Dim::Three,
            neighbors: 20,
            method: Method::Linear,
        }
    }
}

impl ProbeOptions {
    #[must_use]
    pub const fn with_dim(mut self, dim: Dim) -> Self {
        self.dim = dim;
        self
    }

    #[must_use]
    pub const fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    #[must_use]
    pub const fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// An ordered set of labelled query points
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Probes {
    labels: Vec<String>,
    points: Vec<Point>,
}

impl Probes {
    pub fn new() -> Self {
        Self::default()
    }

    /// label the points `pt0`, `pt1`, ... in order
    pub fn from_points(points: &[Point]) -> Self {
        points
            .iter()
            .enumerate()
            .map(|(i, point)| (format!("pt{i}"), *point))
            .collect()
    }

    /// add a probe. A label that is already present is moved to the new location.
    pub fn push<T: Into<String>>(&mut self, label: T, point: Point) {
        let label = label.into();
        match self.index_of(&label) {
            Some(index) => self.points[index] = point,
            None => {
                self.labels.push(label);
                self.points.push(point);
            }
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|x| x == label)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Point)> {
        self.labels.iter().map(String::as_str).zip(self.points.iter())
    }
}

impl<T: Into<String>> FromIterator<(T, Point)> for Probes {
    fn from_iter<I: IntoIterator<Item = (T, Point)>>(iter: I) -> Self {
        let mut probes = Probes::new();
        for (label, point) in iter {
            probes.push(label, point);
        }
        probes
    }
}

/// Values of one or more fields at a set of probes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbeData {
    labels: Vec<String>,
    fields: BTreeMap<String, Array2<f64>>,
}

impl ProbeData {
    pub(crate) fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            fields: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, field: String, values: Array2<f64>) {
        self.fields.insert(field, values);
    }

    /// values of a field, one row per probe
    pub fn field(&self, name: &str) -> Option<&Array2<f64>> {
        self.fields.get(name)
    }

    /// every component of a field at a single probe
    pub fn value(&self, field: &str, label: &str) -> Option<ArrayView1<'_, f64>> {
        let index = self.labels.iter().position(|x| x == label)?;
        self.fields.get(field).map(|values| values.row(index))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Field values sampled along a straight line
#[derive(Debug, Clone, PartialEq)]
pub struct LineSample {
    /// distance of every sample from the start of the line
    pub distance: Array1<f64>,
    /// one row per sample
    pub values: Array2<f64>,
}

/// `resolution + 1` evenly spaced points from `a` to `b` (inclusive) and their distance to `a`
pub fn line_points(a: Point, b: Point, resolution: usize) -> (Vec<Point>, Array1<f64>) {
    let length = squared_distance(&a, &b, Dim::Three).sqrt();

    let (points, distance): (Vec<Point>, Vec<f64>) = (0..=resolution)
        .map(|i| {
            let t = if resolution == 0 {
                0.0
            } else {
                i as f64 / resolution as f64
            };
            let point = [
                a[0] + (b[0] - a[0]) * t,
                a[1] + (b[1] - a[1]) * t,
                a[2] + (b[2] - a[2]) * t,
            ];
            (point, length * t)
        })
        .unzip();

    (points, Array1::from(distance))
}

/// squared distance under which a probe is taken to sit on a node
const COINCIDENT: f64 = 1e-24;

/// evaluate `field` at every probe from the values at its neighbours
///
/// `points` are the node coordinates of the mesh that `neighbors` was searched on and `field`
/// must hold one tuple per node, otherwise `Error::ShapeMismatch` is returned. The output has
/// one row per probe and one column per component of the field.
pub fn interpolate(
    neighbors: &Neighbors,
    points: ArrayView2<'_, f64>,
    probes: &[Point],
    field: &DataArray,
    options: &ProbeOptions,
) -> Result<Array2<f64>, Error> {
    if points.nrows() != neighbors.num_nodes() {
        return Err(Error::ShapeMismatch {
            name: "neighbors".into(),
            expected: points.nrows(),
            actual: neighbors.num_nodes(),
        });
    }

    if field.len() != neighbors.num_nodes() {
        return Err(Error::ShapeMismatch {
            name: field.name.clone(),
            expected: neighbors.num_nodes(),
            actual: field.len(),
        });
    }

    let dim = options.dim;
    let mut out = Array2::from_elem((probes.len(), field.components()), f64::NAN);

    for (i, (probe, mut row)) in probes.iter().zip(out.outer_iter_mut()).enumerate() {
        let probe = flatten(probe, dim);
        let candidates = neighbors.of(i);

        if candidates.is_empty() {
            continue;
        }

        let positions: Vec<Point> = candidates.iter().map(|&n| position(points, n, dim)).collect();
        let distances: Vec<f64> = positions
            .iter()
            .map(|p| squared_distance(p, &probe, dim))
            .collect();

        // on top of a node
        if distances[0] <= COINCIDENT {
            row.assign(&field.values.row(candidates[0]));
            continue;
        }

        match options.method {
            Method::Nearest => row.assign(&field.values.row(candidates[0])),
            Method::Linear => match simplex::locate(&probe, &positions, &distances, dim) {
                Some(containing) => {
                    row.fill(0.0);
                    for (vertex, weight) in containing.vertices.iter().zip(&containing.weights) {
                        row.scaled_add(*weight, &field.values.row(candidates[*vertex]));
                    }
                }
                None => log::warn!(
                    "probe {} at {:?} is outside of its neighbours' hull, value is NaN",
                    i,
                    probe
                ),
            },
            Method::InverseDistance => {
                let total: f64 = distances.iter().map(|d| 1.0 / d).sum();
                row.fill(0.0);
                for (node, distance) in candidates.iter().zip(&distances) {
                    row.scaled_add(1.0 / distance / total, &field.values.row(*node));
                }
            }
        }
    }

    Ok(out)
}

/// coordinates of a node with unused dimensions set to zero
pub(crate) fn position(points: ArrayView2<'_, f64>, node: usize, dim: Dim) -> Point {
    let row = points.row(node);
    let mut out = [0.0; 3];
    for (axis, value) in out.iter_mut().enumerate().take(dim.count().min(row.len())) {
        *value = row[axis];
    }
    out
}

fn flatten(point: &Point, dim: Dim) -> Point {
    match dim {
        Dim::Two => [point[0], point[1], 0.0],
        Dim::Three => *point,
    }
}

pub(crate) fn squared_distance(a: &Point, b: &Point, dim: Dim) -> f64 {
    a.iter()
        .zip(b)
        .take(dim.count())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
