//! Common traits and types that are useful for working with `vtu_probe`
#![allow(unused_imports)]

pub use crate::data::{DataArray, Precision};
pub use crate::mesh::{Cells, Dim, UnstructuredGrid};
pub use crate::probe::{Method, Point, ProbeOptions, Probes};
pub use crate::pvd::PvdFile;
pub use crate::traits::{Array, LeBytes};
pub use crate::vtu::VtuFile;
pub use crate::write_vtk::Encoding;

pub(crate) use crate::data::{ByteOrder, HeaderType};
pub(crate) use crate::{Error, ParseError};
pub(crate) use std::io::BufRead;
pub(crate) use std::io::Write;

pub(crate) use crate::{parse, traits, utils, write_vtk};

pub(crate) use derive_more::{Constructor, Deref, Display, From};

pub(crate) use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};
