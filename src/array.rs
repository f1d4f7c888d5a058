//! container types for data to be written to files

use crate::prelude::*;
use crate::write_vtk::{close_inline_array_header, write_inline_array_header, InlineFormat};

use quick_xml::events::{BytesText, Event};
use quick_xml::writer::Writer;

/// Anything that can be flattened into interleaved tuples of `f64`
pub trait Components {
    type Iter<'a>: Iterator<Item = f64>
    where
        Self: 'a;

    fn array_components(&self) -> usize;

    /// number of tuples
    fn length(&self) -> usize;

    /// iterate every value, tuple by tuple, components interleaved
    fn iter(&self) -> Self::Iter<'_>;
}

impl Components for Array2<f64> {
    type Iter<'a> = std::iter::Copied<ndarray::iter::Iter<'a, f64, ndarray::Ix2>>;

    fn array_components(&self) -> usize {
        self.ncols()
    }

    fn length(&self) -> usize {
        self.nrows()
    }

    fn iter(&self) -> Self::Iter<'_> {
        ndarray::ArrayBase::iter(self).copied()
    }
}

impl Components for [f64] {
    type Iter<'a> = std::iter::Copied<std::slice::Iter<'a, f64>>;

    fn array_components(&self) -> usize {
        1
    }

    fn length(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        <[f64]>::iter(self).copied()
    }
}

impl Components for [usize] {
    type Iter<'a> = std::iter::Map<std::slice::Iter<'a, usize>, fn(&usize) -> f64>;

    fn array_components(&self) -> usize {
        1
    }

    fn length(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        let to_float: fn(&usize) -> f64 = |x| *x as f64;
        <[usize]>::iter(self).map(to_float)
    }
}

impl Components for [u8] {
    type Iter<'a> = std::iter::Map<std::slice::Iter<'a, u8>, fn(&u8) -> f64>;

    fn array_components(&self) -> usize {
        1
    }

    fn length(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        let to_float: fn(&u8) -> f64 = |x| *x as f64;
        <[u8]>::iter(self).map(to_float)
    }
}

impl Components for DataArray {
    type Iter<'a> = <Array2<f64> as Components>::Iter<'a>;

    fn array_components(&self) -> usize {
        self.components()
    }

    fn length(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        Components::iter(&self.values)
    }
}

impl<T> Array for T
where
    T: Components + ?Sized,
{
    fn write_ascii<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: &str,
        precision: Precision,
    ) -> Result<(), Error> {
        write_inline_array_header(
            writer,
            InlineFormat::Ascii,
            name,
            self.array_components(),
            precision,
        )?;

        let mut data =
            String::with_capacity(Components::length(self) * self.array_components() * 8);

        for float in Components::iter(self) {
            data.push_str(&utils::format_float(float, precision));
            data.push(' ');
        }

        writer.write_event(Event::Text(BytesText::new(data.trim_end())))?;

        close_inline_array_header(writer)?;

        Ok(())
    }

    fn write_base64<W: Write>(
        &self,
        writer: &mut Writer<W>,
        name: &str,
        precision: Precision,
    ) -> Result<(), Error> {
        write_inline_array_header(
            writer,
            InlineFormat::Base64,
            name,
            self.array_components(),
            precision,
        )?;

        let data = self.binary_bytes(precision);

        // uncompressed blocks carry a single header with the number of bytes that follow
        let mut byte_data: Vec<u8> = Vec::with_capacity(data.len() + 8);
        byte_data.extend_from_slice(&(data.len() as u64).to_le_bytes());
        byte_data.extend_from_slice(&data);

        let encoded = base64::encode(byte_data.as_slice());

        writer.write_event(Event::Text(BytesText::new(&encoded)))?;

        close_inline_array_header(writer)?;

        Ok(())
    }

    fn binary_bytes(&self, precision: Precision) -> Vec<u8> {
        let size_hint = Components::length(self) * self.array_components();
        utils::floats_to_bytes(Components::iter(self), precision, size_hint)
    }

    fn length(&self) -> usize {
        Components::length(self)
    }

    fn components(&self) -> usize {
        Components::array_components(self)
    }
}
