//! # Mesh Information
//!
//! An [`UnstructuredGrid`] holds the node coordinates of a mesh, its cell topology
//! ([`Cells`]) and every named array attached to the nodes (`point_data`) or to the cells
//! (`cell_data`). It is what [`read_vtu`](crate::read_vtu) produces and what
//! [`write_vtu`](crate::write_vtu) consumes.
//!
//! Coordinates are always stored with three columns. Two dimensional meshes written by most
//! solvers carry a constant `z`, so spatial operations take a [`Dim`] and drop the last
//! column for [`Dim::Two`].
//!
//! Interpolation only needs the point cloud. The cells are used to move cell centred arrays
//! onto the nodes ([`UnstructuredGrid::cell_data_to_point_data`]), which is what happens when a
//! field is only available as cell data.

mod cells;

pub use cells::{CellIter, Cells};

use crate::prelude::*;

use ndarray::s;

/// Spatial dimensionality used for neighbour search and interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dim {
    /// x and y only, the z coordinate is ignored
    Two,
    #[default]
    Three,
}

impl Dim {
    /// number of coordinates considered
    pub const fn count(&self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredGrid {
    /// node coordinates, one row per node
    pub points: Array2<f64>,
    pub cells: Cells,
    pub point_data: Vec<DataArray>,
    pub cell_data: Vec<DataArray>,
}

impl Default for UnstructuredGrid {
    fn default() -> Self {
        Self::new(Array2::zeros((0, 3)), Cells::default())
    }
}

impl UnstructuredGrid {
    /// a grid without any arrays attached
    pub fn new(points: Array2<f64>, cells: Cells) -> Self {
        Self {
            points,
            cells,
            point_data: Vec::new(),
            cell_data: Vec::new(),
        }
    }

    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// node coordinates restricted to the first `dim.count()` columns
    pub fn coordinates(&self, dim: Dim) -> ArrayView2<'_, f64> {
        let columns = dim.count().min(self.points.ncols());
        self.points.slice(s![.., ..columns])
    }

    pub fn point_field(&self, name: &str) -> Option<&DataArray> {
        self.point_data.iter().find(|array| array.name == name)
    }

    pub fn cell_field(&self, name: &str) -> Option<&DataArray> {
        self.cell_data.iter().find(|array| array.name == name)
    }

    pub fn point_field_names(&self) -> Vec<&str> {
        self.point_data.iter().map(|x| x.name.as_str()).collect()
    }

    pub fn cell_field_names(&self) -> Vec<&str> {
        self.cell_data.iter().map(|x| x.name.as_str()).collect()
    }

    /// attach a point array, replacing any array of the same name
    pub fn add_point_field(&mut self, array: DataArray) -> Result<(), Error> {
        let actual = array.len();
        if actual != self.num_points() {
            return Err(Error::ShapeMismatch {
                name: array.name,
                expected: self.num_points(),
                actual,
            });
        }

        match self.point_data.iter_mut().find(|x| x.name == array.name) {
            Some(existing) => *existing = array,
            None => self.point_data.push(array),
        }

        Ok(())
    }

    /// average a cell array onto the nodes
    ///
    /// Every node receives the mean value of the cells that reference it. Nodes that are not
    /// part of any cell are NaN.
    pub fn cell_to_point(&self, array: &DataArray) -> DataArray {
        let components = array.components();
        let mut sums = Array2::<f64>::zeros((self.num_points(), components));
        let mut counts = vec![0usize; self.num_points()];

        for (cell, nodes) in self.cells.iter().enumerate().take(array.len()) {
            let value = array.values.row(cell);

            for &node in nodes {
                if node >= counts.len() {
                    continue;
                }
                let mut sum = sums.row_mut(node);
                sum += &value;
                counts[node] += 1;
            }
        }

        for (mut row, count) in sums.outer_iter_mut().zip(counts) {
            if count == 0 {
                row.fill(f64::NAN);
            } else {
                row /= count as f64;
            }
        }

        DataArray::new(array.name.clone(), array.precision, sums)
    }

    /// convert every cell array to a point array
    ///
    /// Point arrays that already exist under the same name are kept as they are.
    pub fn cell_data_to_point_data(&mut self) {
        let converted: Vec<DataArray> = self
            .cell_data
            .iter()
            .filter(|array| self.point_field(&array.name).is_none())
            .map(|array| self.cell_to_point(array))
            .collect();

        log::debug!("converted {} cell arrays to point arrays", converted.len());

        self.point_data.extend(converted);
    }

    /// merge the pieces of a file into a single grid
    ///
    /// Node indices of every piece are shifted by the number of nodes before it. Arrays are
    /// kept only if every piece carries them with the same number of components.
    pub fn combine(mut pieces: Vec<UnstructuredGrid>) -> UnstructuredGrid {
        if pieces.len() <= 1 {
            return pieces.pop().unwrap_or_default();
        }

        let views: Vec<_> = pieces.iter().map(|piece| piece.points.view()).collect();
        let points = ndarray::concatenate(Axis(0), &views).unwrap_or_else(|_| {
            log::warn!("pieces do not share a coordinate layout, dropping points");
            Array2::zeros((0, 3))
        });

        let mut cells = Cells::default();
        let mut point_offset = 0;
        for piece in &pieces {
            cells.extend_shifted(&piece.cells, point_offset);
            point_offset += piece.num_points();
        }

        let point_data = combine_arrays(&pieces, |piece| &piece.point_data);
        let cell_data = combine_arrays(&pieces, |piece| &piece.cell_data);

        UnstructuredGrid {
            points,
            cells,
            point_data,
            cell_data,
        }
    }
}

fn combine_arrays<F>(pieces: &[UnstructuredGrid], section: F) -> Vec<DataArray>
where
    F: Fn(&UnstructuredGrid) -> &Vec<DataArray>,
{
    let mut combined = Vec::new();

    for first in section(&pieces[0]) {
        let parts: Option<Vec<&DataArray>> = pieces
            .iter()
            .map(|piece| section(piece).iter().find(|x| x.name == first.name))
            .collect();

        let concatenated = parts.and_then(|parts| {
            let views: Vec<_> = parts.iter().map(|x| x.values.view()).collect();
            ndarray::concatenate(Axis(0), &views).ok()
        });

        match concatenated {
            Some(values) => combined.push(DataArray::new(first.name.clone(), first.precision, values)),
            None => log::warn!("array `{}` is not present in every piece, skipping", first.name),
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    /// two triangles sharing an edge, plus a node that is not used by any cell
    fn grid() -> UnstructuredGrid {
        let points = Array2::from_shape_vec(
            (5, 3),
            vec![
                0., 0., 0., //
                1., 0., 0., //
                0., 1., 0., //
                1., 1., 0., //
                5., 5., 0.,
            ],
        )
        .unwrap();

        let mut cells = Cells::default();
        cells.push(&[0, 1, 2], 5);
        cells.push(&[1, 3, 2], 5);

        let mut grid = UnstructuredGrid::new(points, cells);
        grid.cell_data.push(DataArray::scalar("id", vec![1.0, 3.0]));
        grid
    }

    #[test]
    fn cell_values_are_averaged() {
        let mut grid = grid();
        grid.cell_data_to_point_data();

        let id = grid.point_field("id").unwrap().column(0).to_vec();
        assert_eq!(id[0], 1.0);
        assert_eq!(id[1], 2.0);
        assert_eq!(id[2], 2.0);
        assert_eq!(id[3], 3.0);
        assert!(id[4].is_nan());
    }

    #[test]
    fn existing_point_arrays_are_kept() {
        let mut grid = grid();
        grid.add_point_field(DataArray::scalar("id", vec![9.0; 5]))
            .unwrap();
        grid.cell_data_to_point_data();

        assert_eq!(grid.point_data.len(), 1);
        assert_eq!(grid.point_field("id").unwrap().values[[0, 0]], 9.0);
    }

    #[test]
    fn point_field_length_is_checked() {
        let mut grid = grid();
        let out = grid.add_point_field(DataArray::scalar("p", vec![0.0; 3]));
        assert!(matches!(
            out,
            Err(Error::ShapeMismatch {
                expected: 5,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn two_dimensional_coordinates() {
        let grid = grid();
        assert_eq!(grid.coordinates(Dim::Two).shape(), &[5, 2]);
        assert_eq!(grid.coordinates(Dim::Three).shape(), &[5, 3]);
    }

    #[test]
    fn combine_pieces() {
        let mut second = grid();
        second.cell_data.clear();
        let combined = UnstructuredGrid::combine(vec![grid(), grid(), second]);

        assert_eq!(combined.num_points(), 15);
        assert_eq!(combined.num_cells(), 6);
        assert_eq!(combined.cells.iter().nth(2).unwrap(), &[5, 6, 7]);
        // `id` is missing from the last piece
        assert!(combined.cell_data.is_empty());
    }
}
