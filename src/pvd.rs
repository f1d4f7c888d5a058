use crate::parse::error as parse_error;
use crate::parse::pvd::CollectionEntry;
use crate::prelude::*;
use crate::probe::{LineSample, Neighbors, ProbeData};
use crate::time::{blend, TimeBracket};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A time series of `.vtu` snapshots described by a `.pvd` collection
///
/// Requested times do not have to match a time step. Between two steps every value is
/// interpolated linearly from the snapshots on either side.
///
/// ```no_run
/// use vtu_probe::prelude::*;
///
/// let pvd = PvdFile::open("results", "run.pvd")?;
/// let probes = Probes::from_points(&[[0.5, 0.5, 0.0]]);
///
/// let series = pvd.read_time_series(&["temperature"], &probes)?;
/// let history = series.at("temperature", "pt0");
///
/// // halfway between two outputs
/// let temperature = pvd.read_point_set_data(12.5, "temperature", &[[0.5, 0.5, 0.0]])?;
/// # Ok::<(), vtu_probe::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PvdFile {
    folder: PathBuf,
    path: PathBuf,
    entries: Vec<CollectionEntry>,
    options: ProbeOptions,
}

impl PvdFile {
    /// read the collection `filename` within `folder`. Dataset paths are relative to `folder`.
    pub fn open<P: AsRef<Path>, F: AsRef<Path>>(folder: P, filename: F) -> Result<Self, Error> {
        Self::open_with(folder, filename, ProbeOptions::default())
    }

    pub fn open_with<P: AsRef<Path>, F: AsRef<Path>>(
        folder: P,
        filename: F,
        options: ProbeOptions,
    ) -> Result<Self, Error> {
        let folder = folder.as_ref().to_path_buf();
        let path = folder.join(filename);

        let mut entries = parse::read_pvd(&path)?;
        if entries.is_empty() {
            return Err(Error::EmptyCollection(path.display().to_string()));
        }

        // stable, so datasets sharing a time step keep their document order
        entries.sort_by(|a, b| a.timestep.total_cmp(&b.timestep));

        log::debug!(
            "{} holds {} time steps from {} to {}",
            path.display(),
            entries.len(),
            entries[0].timestep,
            entries[entries.len() - 1].timestep
        );

        Ok(Self {
            folder,
            path,
            entries,
            options,
        })
    }

    /// time of every dataset, ascending
    pub fn timesteps(&self) -> Vec<f64> {
        self.entries.iter().map(|x| x.timestep).collect()
    }

    /// dataset paths as written in the collection, in time order
    pub fn files(&self) -> Vec<&str> {
        self.entries.iter().map(|x| x.file.as_str()).collect()
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    /// location of the `.pvd` file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// location of dataset `index`
    pub fn path_of(&self, index: usize) -> Option<PathBuf> {
        self.entries
            .get(index)
            .map(|entry| self.folder.join(&entry.file))
    }

    fn open_step(&self, index: usize) -> Result<VtuFile, Error> {
        let path = self.folder.join(&self.entries[index].file);
        VtuFile::open_with(path, self.options)
    }

    fn locate(&self, time: f64) -> Result<TimeBracket, Error> {
        TimeBracket::locate(&self.timesteps(), time)
    }

    /// values of `fields` at every probe for every time step
    ///
    /// The neighbour search is only repeated when the number of nodes changes from one
    /// snapshot to the next.
    pub fn read_time_series(&self, fields: &[&str], probes: &Probes) -> Result<TimeSeries, Error> {
        let mut neighbors: Option<Neighbors> = None;
        let mut snapshots: BTreeMap<&str, Vec<Array2<f64>>> = BTreeMap::new();

        for index in 0..self.entries.len() {
            let vtu = self.open_step(index)?;

            let stale = neighbors
                .as_ref()
                .map_or(true, |nb| nb.num_nodes() != vtu.grid().num_points());

            if stale {
                log::debug!("searching neighbours on {}", vtu.path().display());
                neighbors = Some(vtu.neighbors(probes));
            }

            if let Some(neighbors) = &neighbors {
                for field in fields {
                    let values = vtu.data(neighbors, probes, field)?;
                    snapshots.entry(*field).or_default().push(values);
                }
            }
        }

        let mut series = BTreeMap::new();

        for (field, values) in snapshots {
            let views: Vec<_> = values.iter().map(|x| x.view()).collect();
            let stacked = ndarray::stack(Axis(0), &views).map_err(|_| Error::ShapeMismatch {
                name: field.to_string(),
                expected: views[0].ncols(),
                actual: views.iter().map(|x| x.ncols()).max().unwrap_or(0),
            })?;
            series.insert(field.to_string(), stacked);
        }

        Ok(TimeSeries {
            times: Array1::from(self.timesteps()),
            labels: probes.labels().to_vec(),
            fields: series,
        })
    }

    /// a whole-mesh field at `time`
    pub fn read_time_step(&self, time: f64, field: &str) -> Result<DataArray, Error> {
        match self.locate(time)? {
            TimeBracket::Exact(index) => Ok(self.open_step(index)?.field(field)?.into_owned()),
            TimeBracket::Between {
                lower,
                upper,
                weight,
            } => {
                let lower = self.open_step(lower)?;
                let upper = self.open_step(upper)?;
                let lower = lower.field(field)?;
                let upper = upper.field(field)?;

                let values = checked_blend(field, &lower.values, &upper.values, weight)?;
                Ok(DataArray::new(field.to_string(), lower.precision, values))
            }
        }
    }

    /// values of `field` at `points` and `time`, one row per point in input order
    pub fn read_point_set_data(
        &self,
        time: f64,
        field: &str,
        points: &[Point],
    ) -> Result<Array2<f64>, Error> {
        match self.locate(time)? {
            TimeBracket::Exact(index) => self.open_step(index)?.point_set_data(field, points),
            TimeBracket::Between {
                lower,
                upper,
                weight,
            } => {
                let lower = self.open_step(lower)?.point_set_data(field, points)?;
                let upper = self.open_step(upper)?.point_set_data(field, points)?;
                checked_blend(field, &lower, &upper, weight)
            }
        }
    }

    /// sample `field` along the line from `a` to `b` at `time`
    pub fn read_line_data(
        &self,
        time: f64,
        field: &str,
        a: Point,
        b: Point,
        resolution: usize,
    ) -> Result<LineSample, Error> {
        match self.locate(time)? {
            TimeBracket::Exact(index) => self.open_step(index)?.line_data(field, a, b, resolution),
            TimeBracket::Between {
                lower,
                upper,
                weight,
            } => {
                let lower = self.open_step(lower)?.line_data(field, a, b, resolution)?;
                let upper = self.open_step(upper)?.line_data(field, a, b, resolution)?;

                Ok(LineSample {
                    values: checked_blend(field, &lower.values, &upper.values, weight)?,
                    distance: lower.distance,
                })
            }
        }
    }

    /// strip the directories from every `file` attribute of the collection
    ///
    /// The `.pvd` file is rewritten in place, everything but the `file` attributes is kept
    /// as it was.
    pub fn clear_relative_paths(&mut self) -> Result<(), Error> {
        let input = std::fs::read(&self.path)?;
        let output = strip_dataset_directories(&input)?;
        std::fs::write(&self.path, output)?;

        for entry in &mut self.entries {
            entry.file = file_name(&entry.file).to_string();
        }

        log::debug!("cleared relative paths of {}", self.path.display());

        Ok(())
    }
}

/// last component of a path written with either separator
fn file_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

/// copy a collection document event by event, rewriting `DataSet` file attributes
fn strip_dataset_directories(input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut reader = Reader::from_reader(input);
    let mut writer = Writer::new(Vec::with_capacity(input.len()));

    loop {
        let event = reader
            .read_event()
            .map_err(parse_error::MalformedXml::from)
            .map_err(parse_error::Collection::from)
            .map_err(ParseError::from)?;

        match event {
            Event::Eof => break,
            Event::Empty(start) if start.name().as_ref() == b"DataSet" => {
                writer.write_event(Event::Empty(rewrite_dataset(&start)?))?;
            }
            Event::Start(start) if start.name().as_ref() == b"DataSet" => {
                writer.write_event(Event::Start(rewrite_dataset(&start)?))?;
            }
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

fn rewrite_dataset(start: &BytesStart<'_>) -> Result<BytesStart<'static>, Error> {
    let mut dataset = BytesStart::new("DataSet");

    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(parse_error::MalformedAttribute::from)
            .map_err(parse_error::Collection::from)
            .map_err(ParseError::from)?;

        if attribute.key.as_ref() == b"file" {
            let file = parse::attribute_string(&attribute)
                .map_err(parse_error::Collection::from)
                .map_err(ParseError::from)?;
            dataset.push_attribute(("file", file_name(&file)));
        } else {
            dataset.push_attribute(attribute);
        }
    }

    Ok(dataset)
}

fn checked_blend(
    field: &str,
    lower: &Array2<f64>,
    upper: &Array2<f64>,
    weight: f64,
) -> Result<Array2<f64>, Error> {
    if lower.dim() != upper.dim() {
        return Err(Error::ShapeMismatch {
            name: field.to_string(),
            expected: lower.len(),
            actual: upper.len(),
        });
    }

    Ok(blend(lower, upper, weight))
}

/// Probe values of one or more fields over every time step of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    times: Array1<f64>,
    labels: Vec<String>,
    /// `(time, probe, component)` per field
    fields: BTreeMap<String, Array3<f64>>,
}

impl TimeSeries {
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn field(&self, name: &str) -> Option<&Array3<f64>> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// history of a field at one probe, one row per time step
    pub fn at(&self, field: &str, label: &str) -> Option<ArrayView2<'_, f64>> {
        let index = self.labels.iter().position(|x| x == label)?;
        self.fields
            .get(field)
            .map(|values| values.index_axis(Axis(1), index))
    }

    /// every field at every probe at `time`, blending the neighbouring steps
    pub fn interpolate(&self, time: f64) -> Result<ProbeData, Error> {
        let times = self.times.to_vec();
        let bracket = TimeBracket::locate(&times, time)?;

        let mut out = ProbeData::new(self.labels.clone());

        for (name, values) in &self.fields {
            let at_time = match bracket {
                TimeBracket::Exact(index) => values.index_axis(Axis(0), index).to_owned(),
                TimeBracket::Between {
                    lower,
                    upper,
                    weight,
                } => blend(
                    &values.index_axis(Axis(0), lower),
                    &values.index_axis(Axis(0), upper),
                    weight,
                ),
            };
            out.insert(name.clone(), at_time);
        }

        Ok(out)
    }
}
