use crate::prelude::*;

use std::fmt;
use std::str::FromStr;

/// The numeric type of an array as stored on disk (the `type` attribute of a `<DataArray>`)
///
/// In memory every array is held as `f64`; the precision is remembered so that a grid that is
/// read and written again keeps its on-disk types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl Precision {
    /// number of bytes a single value occupies
    pub fn size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let precision = match s {
            "Int8" | "Char" => Self::Int8,
            "UInt8" | "UChar" => Self::UInt8,
            "Int16" => Self::Int16,
            "UInt16" => Self::UInt16,
            "Int32" => Self::Int32,
            "UInt32" => Self::UInt32,
            "Int64" => Self::Int64,
            "UInt64" => Self::UInt64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            other => return Err(other.to_string()),
        };
        Ok(precision)
    }
}

/// `byte_order` attribute of the `VTKFile` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

/// `header_type` attribute of the `VTKFile` element. Files written before version 1.0 of the
/// format have no attribute and use 32 bit headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderType {
    #[default]
    UInt32,
    UInt64,
}

impl HeaderType {
    pub(crate) fn size(&self) -> usize {
        match self {
            Self::UInt32 => 4,
            Self::UInt64 => 8,
        }
    }

    /// read the byte count stored in a block header
    pub(crate) fn read(&self, bytes: &[u8], order: ByteOrder) -> Option<usize> {
        let header = bytes.get(0..self.size())?;
        let count = match self {
            Self::UInt32 => u32::from_slice(header, order) as usize,
            Self::UInt64 => u64::from_slice(header, order) as usize,
        };
        Some(count)
    }
}

#[derive(Debug, Clone, PartialEq, Constructor)]
/// A named array of tuples, as found in the `<PointData>` or `<CellData>` section of a file.
///
/// `values` has one row per point (or cell) and one column per component, so a pressure
/// field over 100 nodes is `(100, 1)` and a velocity field is `(100, 3)`.
pub struct DataArray {
    pub name: String,
    pub precision: Precision,
    pub values: Array2<f64>,
}

impl DataArray {
    /// construct a `Float64` array from a flat buffer of interleaved components
    ///
    /// ## Panics
    ///
    /// if `buffer.len()` is not a multiple of `components`
    pub fn from_flat<T: Into<String>>(name: T, buffer: Vec<f64>, components: usize) -> Self {
        let components = components.max(1);
        let tuples = buffer.len() / components;
        let values = Array2::from_shape_vec((tuples, components), buffer)
            .expect("buffer length is not a multiple of the number of components");

        Self::new(name.into(), Precision::Float64, values)
    }

    /// construct a single component `Float64` array
    pub fn scalar<T: Into<String>>(name: T, values: Vec<f64>) -> Self {
        Self::from_flat(name, values, 1)
    }

    /// number of tuples (points or cells) in the array
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn components(&self) -> usize {
        self.values.ncols()
    }

    /// a view of a single component over all tuples
    pub fn column(&self, component: usize) -> ArrayView1<'_, f64> {
        self.values.column(component)
    }
}
