//! # Traits
//!
//! General purpose traits for moving field arrays in and out of the VTK XML formats.
//!
//! [`Array`] describes how an array is written to a `<DataArray>` element (inline ascii,
//! inline base64 or raw bytes destined for the `<AppendedData>` section). It is implemented for
//! everything that implements [`Components`](crate::array::Components): `ndarray` 2D arrays,
//! slices, and [`DataArray`](crate::DataArray).
//!
//! [`LeBytes`] is the glue between the numeric types a file may declare in its `type`
//! attribute and the `f64` values every field is stored as in memory.

use crate::data::ByteOrder;
use crate::Error;
use crate::Precision;
use quick_xml::writer::Writer;
use std::io::Write;

/// describes how to write an array of values to a vtk file
///
/// There are two main ways to write data to a vtk file. Either you can write the data inline
/// within the `DataArray` element or you can write the data as binary to an appended section
/// with a specified offset. Writing the data inline, while more clear, requires either an ascii or
/// base64 encoding which uses significantly more space than the appended data.
///
/// ```ignore
/// <PointData>
///     <DataArray type="Float64" Name="p" NumberOfComponents="1" format="ascii">0 1 2 3</DataArray>
///     <DataArray type="Float64" Name="u" NumberOfComponents="3" format="appended" offset="40"/>
/// </PointData>
/// ...
/// <AppendedData encoding="raw">_BUNCH OF BINARY STUFF HERE</AppendedData>
/// ```
pub trait Array {
    /// write a complete `<DataArray>` element with the values inline as ascii text
    fn write_ascii<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: &str,
        precision: Precision,
    ) -> Result<(), Error>;

    /// write a complete `<DataArray>` element with the values inline as base64 encoded
    /// binary, preceded by a `UInt64` block header
    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: &str,
        precision: Precision,
    ) -> Result<(), Error>;

    /// the raw bytes of this array (without block header) in the requested precision
    ///
    /// You must ensure that you have written a header with
    /// [`write_appended_dataarray_header`](crate::write_appended_dataarray_header)
    /// at the correct offset before placing these bytes in the appended section.
    fn binary_bytes(&self, precision: Precision) -> Vec<u8>;

    /// number of tuples in the array
    fn length(&self) -> usize;

    fn components(&self) -> usize {
        1
    }
}

/// Fixed-width numeric types that may appear in the `type` attribute of a `<DataArray>`
pub trait LeBytes: Copy + Default + num_traits::NumCast {
    const SIZE: usize;

    /// read a value from the start of `bytes` in the given byte order
    fn from_slice(bytes: &[u8], order: ByteOrder) -> Self;

    /// append the little endian representation of the value
    fn extend_le(self, out: &mut Vec<u8>);
}
