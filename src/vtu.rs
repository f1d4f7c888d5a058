use crate::prelude::*;
use crate::probe::{self, LineSample, Neighbors, ProbeData};

use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// A single `.vtu` snapshot that can be probed at arbitrary points
///
/// ```no_run
/// use vtu_probe::prelude::*;
///
/// let vtu = VtuFile::open("results/step_10.vtu")?;
/// let probes = Probes::from_points(&[[0.5, 0.5, 0.0], [1.0, 0.25, 0.0]]);
///
/// let data = vtu.point_data(&["pressure", "velocity"], &probes)?;
/// let pressure = data.value("pressure", "pt0");
/// # Ok::<(), vtu_probe::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct VtuFile {
    path: PathBuf,
    grid: UnstructuredGrid,
    options: ProbeOptions,
}

impl VtuFile {
    /// read a file with the default [`ProbeOptions`]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::open_with(path, ProbeOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: ProbeOptions) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let grid = parse::read_vtu(&path)?;

        log::debug!(
            "opened {} with {} points and {} cells",
            path.display(),
            grid.num_points(),
            grid.num_cells()
        );

        Ok(Self {
            path,
            grid,
            options,
        })
    }

    /// wrap a grid that is already in memory
    pub fn from_grid(grid: UnstructuredGrid, options: ProbeOptions) -> Self {
        Self {
            path: PathBuf::new(),
            grid,
            options,
        }
    }

    pub fn grid(&self) -> &UnstructuredGrid {
        &self.grid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// node coordinates, with the z column dropped for two dimensional options
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.grid.coordinates(self.options.dim)
    }

    /// names of all point arrays
    pub fn field_names(&self) -> Vec<&str> {
        self.grid.point_field_names()
    }

    /// a point array by name
    ///
    /// If there is no point array with this name but a cell array is present, the cell array
    /// is averaged onto the nodes.
    pub fn field(&self, name: &str) -> Result<Cow<'_, DataArray>, Error> {
        if let Some(array) = self.grid.point_field(name) {
            return Ok(Cow::Borrowed(array));
        }

        match self.grid.cell_field(name) {
            Some(array) => {
                log::debug!("`{}` is cell data, converting to point data", name);
                Ok(Cow::Owned(self.grid.cell_to_point(array)))
            }
            None => Err(Error::MissingField {
                name: name.to_string(),
                file: self.path.display().to_string(),
            }),
        }
    }

    /// closest nodes of every probe
    pub fn neighbors(&self, probes: &Probes) -> Neighbors {
        Neighbors::search(
            self.grid.points.view(),
            probes.points(),
            self.options.neighbors,
            self.options.dim,
        )
    }

    /// values of `field` at every probe, one row per probe
    ///
    /// `neighbors` must have been searched on a mesh with the same nodes as this one.
    pub fn data(
        &self,
        neighbors: &Neighbors,
        probes: &Probes,
        field: &str,
    ) -> Result<Array2<f64>, Error> {
        let array = self.field(field)?;

        probe::interpolate(
            neighbors,
            self.grid.points.view(),
            probes.points(),
            &array,
            &self.options,
        )
    }

    /// values of several fields at labelled probes
    pub fn point_data(&self, fields: &[&str], probes: &Probes) -> Result<ProbeData, Error> {
        let neighbors = self.neighbors(probes);
        let mut out = ProbeData::new(probes.labels().to_vec());

        for field in fields {
            let values = self.data(&neighbors, probes, field)?;
            out.insert(field.to_string(), values);
        }

        Ok(out)
    }

    /// values of `field` at `points`, one row per point in input order
    pub fn point_set_data(&self, field: &str, points: &[Point]) -> Result<Array2<f64>, Error> {
        let probes = Probes::from_points(points);
        let neighbors = self.neighbors(&probes);
        self.data(&neighbors, &probes, field)
    }

    /// sample `field` at `resolution + 1` evenly spaced points from `a` to `b`
    pub fn line_data(
        &self,
        field: &str,
        a: Point,
        b: Point,
        resolution: usize,
    ) -> Result<LineSample, Error> {
        let (points, distance) = probe::line_points(a, b, resolution);
        let values = self.point_set_data(field, &points)?;

        Ok(LineSample { distance, values })
    }

    /// attach `values` as the point array `name` and write the whole grid to `path`
    ///
    /// The array is kept on this file, so later calls to [`field`](Self::field) return it.
    pub fn write_field<P: AsRef<Path>>(
        &mut self,
        values: Array2<f64>,
        name: &str,
        path: P,
        encoding: Encoding,
    ) -> Result<(), Error> {
        let array = DataArray::new(name.to_string(), Precision::Float64, values);
        self.grid.add_point_field(array)?;

        let writer = BufWriter::new(File::create(path.as_ref())?);
        write_vtk::write_vtu(writer, &self.grid, encoding)?;

        log::debug!("wrote `{}` to {}", name, path.as_ref().display());

        Ok(())
    }
}
