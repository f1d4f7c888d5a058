use crate::parse::pvd::CollectionEntry;
use crate::prelude::*;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;

/// the encoding used for every `<DataArray>` of a written file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// values written inline as text
    Ascii,
    /// values written inline as base64 encoded bytes (`format="binary"`)
    Base64,
    /// values written as raw bytes to the `<AppendedData>` section
    #[default]
    Appended,
}

/// the encoding to use when writing an inline dataarray
pub(crate) enum InlineFormat {
    Ascii,
    Base64,
}

impl InlineFormat {
    fn to_str(&self) -> &'static str {
        match &self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// Write an unstructured grid to a `.vtu` document
///
/// All block headers are written as `UInt64`. Points are always written as `Float64`,
/// connectivity and offsets as `Int64` and cell types as `UInt8`. Field arrays keep the
/// precision they were read with.
pub fn write_vtu<W: Write>(
    writer: W,
    grid: &UnstructuredGrid,
    encoding: Encoding,
) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    let vtk_file = BytesStart::new("VTKFile").with_attributes([
        ("type", "UnstructuredGrid"),
        ("version", "1.0"),
        ("byte_order", "LittleEndian"),
        ("header_type", "UInt64"),
    ]);
    writer.write_event(Event::Start(vtk_file))?;
    writer.write_event(Event::Start(BytesStart::new("UnstructuredGrid")))?;

    let num_points = grid.num_points().to_string();
    let num_cells = grid.cells.len().to_string();
    let piece = BytesStart::new("Piece").with_attributes([
        ("NumberOfPoints", num_points.as_str()),
        ("NumberOfCells", num_cells.as_str()),
    ]);
    writer.write_event(Event::Start(piece))?;

    // raw bytes for the appended section, each block prefixed by its byte count
    let mut appended = Vec::new();

    writer.write_event(Event::Start(BytesStart::new("PointData")))?;
    for array in &grid.point_data {
        write_array(&mut writer, array, &array.name, array.precision, encoding, &mut appended)?;
    }
    writer.write_event(Event::End(BytesEnd::new("PointData")))?;

    writer.write_event(Event::Start(BytesStart::new("CellData")))?;
    for array in &grid.cell_data {
        write_array(&mut writer, array, &array.name, array.precision, encoding, &mut appended)?;
    }
    writer.write_event(Event::End(BytesEnd::new("CellData")))?;

    writer.write_event(Event::Start(BytesStart::new("Points")))?;
    write_array(
        &mut writer,
        &grid.points,
        "Points",
        Precision::Float64,
        encoding,
        &mut appended,
    )?;
    writer.write_event(Event::End(BytesEnd::new("Points")))?;

    writer.write_event(Event::Start(BytesStart::new("Cells")))?;
    write_array(
        &mut writer,
        grid.cells.connectivity.as_slice(),
        "connectivity",
        Precision::Int64,
        encoding,
        &mut appended,
    )?;
    write_array(
        &mut writer,
        grid.cells.offsets.as_slice(),
        "offsets",
        Precision::Int64,
        encoding,
        &mut appended,
    )?;
    write_array(
        &mut writer,
        grid.cells.types.as_slice(),
        "types",
        Precision::UInt8,
        encoding,
        &mut appended,
    )?;
    writer.write_event(Event::End(BytesEnd::new("Cells")))?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("UnstructuredGrid")))?;

    if appended.is_empty() {
        writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;
        return Ok(());
    }

    // the appended section is not valid xml text, so it is written around the xml writer
    let mut inner = writer.into_inner();
    appended_binary_header_start(&mut inner)?;
    inner.write_all(&appended)?;
    appended_binary_header_end(&mut inner)?;
    inner.write_all(b"\n</VTKFile>\n")?;

    Ok(())
}

fn write_array<W: Write, A: Array + ?Sized>(
    writer: &mut Writer<W>,
    array: &A,
    name: &str,
    precision: Precision,
    encoding: Encoding,
    appended: &mut Vec<u8>,
) -> Result<(), Error> {
    match encoding {
        Encoding::Ascii => array.write_ascii(writer, name, precision),
        Encoding::Base64 => array.write_base64(writer, name, precision),
        Encoding::Appended => {
            let offset = appended.len() as i64;
            write_appended_dataarray_header(writer, name, offset, array.components(), precision)?;

            let bytes = array.binary_bytes(precision);
            appended.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            appended.extend_from_slice(&bytes);
            Ok(())
        }
    }
}

pub(crate) fn appended_binary_header_start<W: Write>(writer: &mut W) -> Result<(), Error> {
    writer.write_all(b"\n  <AppendedData encoding=\"raw\">\n   _")?;
    Ok(())
}

pub(crate) fn appended_binary_header_end<W: Write>(writer: &mut W) -> Result<(), Error> {
    writer.write_all(b"\n  </AppendedData>")?;
    Ok(())
}

pub(crate) fn write_inline_array_header<W: Write>(
    writer: &mut Writer<W>,
    format: InlineFormat,
    name: &str,
    components: usize,
    precision: Precision,
) -> Result<(), Error> {
    let components = components.to_string();
    let header = BytesStart::new("DataArray").with_attributes([
        ("type", precision.as_str()),
        ("Name", name),
        ("NumberOfComponents", components.as_str()),
        ("format", format.to_str()),
    ]);

    writer.write_event(Event::Start(header))?;

    Ok(())
}

pub(crate) fn close_inline_array_header<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;
    Ok(())
}

/// Write an empty `<DataArray>` element pointing `offset` bytes into the appended section
pub fn write_appended_dataarray_header<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    offset: i64,
    components: usize,
    precision: Precision,
) -> Result<(), Error> {
    let components = components.to_string();
    let offset = offset.to_string();
    let header = BytesStart::new("DataArray").with_attributes([
        ("type", precision.as_str()),
        ("Name", name),
        ("NumberOfComponents", components.as_str()),
        ("format", "appended"),
        ("offset", offset.as_str()),
    ]);

    writer.write_event(Event::Empty(header))?;

    Ok(())
}

/// Write a `.pvd` collection document referencing one dataset per entry
pub fn write_pvd<W: Write>(writer: W, entries: &[CollectionEntry]) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    let vtk_file = BytesStart::new("VTKFile").with_attributes([
        ("type", "Collection"),
        ("version", "0.1"),
        ("byte_order", "LittleEndian"),
    ]);
    writer.write_event(Event::Start(vtk_file))?;
    writer.write_event(Event::Start(BytesStart::new("Collection")))?;

    for entry in entries {
        let timestep = utils::format_float(entry.timestep, Precision::Float64);
        let mut dataset = BytesStart::new("DataSet");
        dataset.push_attribute(("timestep", timestep.as_str()));
        if let Some(group) = &entry.group {
            dataset.push_attribute(("group", group.as_str()));
        }
        if let Some(part) = &entry.part {
            dataset.push_attribute(("part", part.as_str()));
        }
        dataset.push_attribute(("file", entry.file.as_str()));

        writer.write_event(Event::Empty(dataset))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Collection")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;

    Ok(())
}
