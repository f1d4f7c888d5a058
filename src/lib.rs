#![doc = include_str!("../README.md")]

pub mod array;
mod data;
pub mod mesh;
pub mod parse;
pub mod prelude;
pub mod probe;
mod pvd;
pub mod time;
mod traits;
mod utils;
mod vtu;
mod write_vtk;

pub use traits::Array;
pub use traits::LeBytes;

pub use data::{DataArray, Precision};

pub use mesh::{Cells, Dim, UnstructuredGrid};

pub use probe::{
    interpolate, line_points, LineSample, Method, Neighbors, Point, ProbeData, ProbeOptions,
    Probes,
};

pub use pvd::{PvdFile, TimeSeries};
pub use vtu::VtuFile;

pub use time::TimeBracket;

pub use write_vtk::{write_appended_dataarray_header, write_pvd, write_vtu, Encoding};

pub use parse::pvd::CollectionEntry;
pub use parse::read_pvd;
pub use parse::{parse_pvd, parse_vtu, read_vtu};
pub use parse::ParseError;

pub use ndarray;

pub use quick_xml::reader::Reader;
pub use quick_xml::writer::Writer;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing VTK xml: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Could not convert file to uf8 encoding: `{0}`")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("field `{name}` is neither a point nor a cell array of `{file}`")]
    MissingField { name: String, file: String },
    #[error("time {time} is outside of the collection range [{first}, {last}]")]
    TimeOutOfRange { time: f64, first: f64, last: f64 },
    #[error("could not convert timestep `{0}` to a float")]
    InvalidTimestep(String),
    #[error("array `{name}` has {actual} tuples, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("collection file `{0}` does not reference any datasets")]
    EmptyCollection(String),
}
