//! reading and parsing xml VTK files
//!
//! Two document types are understood: `UnstructuredGrid` (`.vtu`) snapshots and `Collection`
//! (`.pvd`) files tying snapshots to time steps. Most of the time you will not need to interact
//! with this module directly, instead use [`VtuFile`](crate::VtuFile) and
//! [`PvdFile`](crate::PvdFile).
//!
//! ## Encodings
//!
//! `<DataArray>` elements may hold their values inline as ascii (`format="ascii"`), inline as
//! base64 (`format="binary"`), or as an `offset` into the raw `<AppendedData>` block at the end
//! of the document (`format="appended"`). Every binary block starts with a header holding the
//! number of bytes in the block. The header is a `UInt32` unless the `VTKFile` element
//! declares `header_type="UInt64"`. Compressed blocks are not supported.

pub mod error;
mod event_summary;
pub mod pvd;

pub use error::ParseError;
pub use pvd::{parse_pvd, read_pvd};

use event_summary::EventSummary;

use crate::prelude::*;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use std::path::Path;
use std::str::FromStr;

/// read in and parse an entire `.vtu` file for a given path
pub fn read_vtu<P: AsRef<Path>>(path: P) -> Result<UnstructuredGrid, Error> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());

    parse_vtu(&bytes)
}

/// parse a `.vtu` document held in memory
pub fn parse_vtu(bytes: &[u8]) -> Result<UnstructuredGrid, Error> {
    let mut reader = Reader::from_reader(bytes);
    // ignore whitespace in the reader
    reader.trim_text(true);

    let file = read_to_file_header(&mut reader, "UnstructuredGrid").map_err(ParseError::from)?;
    log::trace!("file header: {:?}", file);

    let mut raw_pieces = Vec::new();
    let mut appended_position = None;

    loop {
        let event = reader
            .read_event()
            .map_err(error::MalformedXml::from)
            .map_err(error::Piece::from)
            .map_err(ParseError::from)?;

        match event {
            Event::Start(start) => match start.name().as_ref() {
                b"Piece" => {
                    let header = read_piece_header(&start).map_err(ParseError::from)?;
                    let piece = read_piece(&mut reader, header, file)?;
                    raw_pieces.push(piece);
                }
                b"AppendedData" => {
                    check_appended_encoding(&start).map_err(ParseError::from)?;
                    // the reader has consumed everything up to the closing `>`,
                    // the raw bytes are never handed to the xml parser
                    appended_position = Some(reader.buffer_position());
                    break;
                }
                b"UnstructuredGrid" => (),
                _ => skip_element::<error::Piece>(&mut reader).map_err(ParseError::from)?,
            },
            Event::Eof => break,
            Event::End(end) if end.name().as_ref() == b"VTKFile" => break,
            _ => (),
        }
    }

    log::debug!("found {} piece(s) in the document", raw_pieces.len());

    let appended_start = match appended_position {
        Some(position) => Some(appended_data_start(bytes, position).map_err(|e| {
            ParseError::from(error::AppendedData::from(e))
        })?),
        None => None,
    };

    let mut pieces = Vec::with_capacity(raw_pieces.len());

    for raw in raw_pieces {
        let resolved = raw.resolve(|partial| resolve_array(partial, bytes, appended_start, file))?;
        pieces.push(resolved.into_grid().map_err(ParseError::from)?);
    }

    Ok(UnstructuredGrid::combine(pieces))
}

/// Information from the `VTKFile` element that is needed to decode binary data
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct FileHeader {
    pub(crate) byte_order: ByteOrder,
    pub(crate) header_type: HeaderType,
}

/// find the leading `VTKFile` element and check that it describes a `file_type` document
pub(crate) fn read_to_file_header(
    reader: &mut Reader<&[u8]>,
    file_type: &str,
) -> Result<FileHeader, error::Header> {
    loop {
        let event = reader.read_event().map_err(error::MalformedXml::from)?;

        let inner_start = match event {
            // sometimes there are headers for type of file, we just continue
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) => continue,
            Event::Start(start) if start.name().as_ref() == b"VTKFile" => start,
            other => {
                let actual_event = EventSummary::new(&other);
                let element_mismatch = error::UnexpectedElement::new("VTKFile", actual_event);
                return Err(error::Header::from(element_mismatch));
            }
        };

        let mut header = FileHeader::default();

        for attribute in inner_start.attributes() {
            let attribute = attribute.map_err(error::MalformedAttribute::from)?;

            match attribute.key.as_ref() {
                b"type" => check_attribute_value(&attribute, "VTKFile", "type", file_type)?,
                b"byte_order" => {
                    header.byte_order = match attribute.value.as_ref() {
                        b"LittleEndian" => ByteOrder::LittleEndian,
                        b"BigEndian" => ByteOrder::BigEndian,
                        _ => {
                            return Err(unexpected_value(
                                &attribute,
                                "VTKFile",
                                "byte_order",
                                "LittleEndian or BigEndian",
                            )
                            .into())
                        }
                    }
                }
                b"header_type" => {
                    header.header_type = match attribute.value.as_ref() {
                        b"UInt32" => HeaderType::UInt32,
                        b"UInt64" => HeaderType::UInt64,
                        _ => {
                            return Err(unexpected_value(
                                &attribute,
                                "VTKFile",
                                "header_type",
                                "UInt32 or UInt64",
                            )
                            .into())
                        }
                    }
                }
                b"compressor" => {
                    return Err(unexpected_value(
                        &attribute,
                        "VTKFile",
                        "compressor",
                        "uncompressed data",
                    )
                    .into())
                }
                _ => (),
            }
        }

        return Ok(header);
    }
}

#[derive(Debug, Clone, Copy)]
struct PieceHeader {
    num_points: usize,
    num_cells: usize,
}

fn read_piece_header(piece: &BytesStart<'_>) -> Result<PieceHeader, error::Piece> {
    let num_points = parse_attribute::<usize, error::Piece>(
        piece,
        "NumberOfPoints",
        "Piece",
        "a positive integer",
    )?;
    let num_cells =
        parse_attribute::<usize, error::Piece>(piece, "NumberOfCells", "Piece", "a positive integer")?;

    Ok(PieceHeader {
        num_points,
        num_cells,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    PointData,
    CellData,
    Points,
    Cells,
}

/// The arrays of a single `<Piece>`, either already parsed or waiting on the appended section
struct RawPiece<T> {
    header: PieceHeader,
    points: Option<T>,
    connectivity: Option<T>,
    offsets: Option<T>,
    types: Option<T>,
    point_data: Vec<T>,
    cell_data: Vec<T>,
}

impl<T> RawPiece<T> {
    fn new(header: PieceHeader) -> Self {
        Self {
            header,
            points: None,
            connectivity: None,
            offsets: None,
            types: None,
            point_data: Vec::new(),
            cell_data: Vec::new(),
        }
    }

    /// apply a fallible conversion to every array of the piece
    fn resolve<U, F>(self, mut f: F) -> Result<RawPiece<U>, ParseError>
    where
        F: FnMut(T) -> Result<U, ParseError>,
    {
        let mut resolve_option = |x: Option<T>| x.map(&mut f).transpose();

        let points = resolve_option(self.points)?;
        let connectivity = resolve_option(self.connectivity)?;
        let offsets = resolve_option(self.offsets)?;
        let types = resolve_option(self.types)?;

        let point_data = self
            .point_data
            .into_iter()
            .map(&mut f)
            .collect::<Result<Vec<_>, _>>()?;
        let cell_data = self
            .cell_data
            .into_iter()
            .map(&mut f)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawPiece {
            header: self.header,
            points,
            connectivity,
            offsets,
            types,
            point_data,
            cell_data,
        })
    }
}

fn read_piece(
    reader: &mut Reader<&[u8]>,
    header: PieceHeader,
    file: FileHeader,
) -> Result<RawPiece<PartialDataArray>, ParseError> {
    let mut piece = RawPiece::new(header);
    let mut section = None;

    log::trace!("reading piece with {:?}", header);

    loop {
        let event = reader
            .read_event()
            .map_err(error::MalformedXml::from)
            .map_err(error::Piece::from)?;

        match event {
            Event::Start(start) => match start.name().as_ref() {
                b"PointData" => section = Some(Section::PointData),
                b"CellData" => section = Some(Section::CellData),
                b"Points" => section = Some(Section::Points),
                b"Cells" => section = Some(Section::Cells),
                b"DataArray" => {
                    let array = read_dataarray(reader, &start, false, file)?;
                    piece.store(section, array);
                }
                // FieldData and anything else we do not know about
                _ => skip_element::<error::Piece>(reader)?,
            },
            Event::Empty(start) => {
                if start.name().as_ref() == b"DataArray" {
                    let array = read_dataarray(reader, &start, true, file)?;
                    piece.store(section, array);
                }
            }
            Event::End(end) => {
                if end.name().as_ref() == b"Piece" {
                    break;
                }
                section = None;
            }
            Event::Eof => {
                let unexpected = error::UnexpectedElement::new("/Piece", EventSummary::eof());
                return Err(error::Piece::from(unexpected).into());
            }
            _ => (),
        }
    }

    Ok(piece)
}

impl RawPiece<PartialDataArray> {
    fn store(&mut self, section: Option<Section>, array: PartialDataArray) {
        match section {
            Some(Section::PointData) => self.point_data.push(array),
            Some(Section::CellData) => self.cell_data.push(array),
            Some(Section::Points) => self.points = Some(array),
            Some(Section::Cells) => match array.name.as_str() {
                "connectivity" => self.connectivity = Some(array),
                "offsets" => self.offsets = Some(array),
                "types" => self.types = Some(array),
                // polyhedron `faces` / `faceoffsets`
                other => log::debug!("ignoring cell array `{}`", other),
            },
            None => log::debug!("ignoring array `{}` outside of a data section", array.name),
        }
    }
}

impl RawPiece<ResolvedArray> {
    /// check every array against the piece header and assemble the grid
    fn into_grid(self) -> Result<UnstructuredGrid, error::Piece> {
        let PieceHeader {
            num_points,
            num_cells,
        } = self.header;

        let points = match self.points {
            Some(points) => {
                check_length(&points, num_points * 3)?;
                Array2::from_shape_vec((num_points, 3), points.values)
                    .map_err(|_| error::LengthMismatch::new("Points".into(), num_points * 3, 0))?
            }
            None if num_points == 0 => Array2::zeros((0, 3)),
            None => return Err(error::LengthMismatch::new("Points".into(), num_points * 3, 0).into()),
        };

        let offsets = cell_array(self.offsets, "offsets", num_cells)?;
        let types = cell_array(self.types, "types", num_cells)?;
        let expected_connectivity = offsets.last().map(|x| *x as usize).unwrap_or(0);
        let connectivity = cell_array(self.connectivity, "connectivity", expected_connectivity)?;

        let cells = Cells::new(
            connectivity.into_iter().map(|x| x as usize).collect(),
            offsets.into_iter().map(|x| x as usize).collect(),
            types.into_iter().map(|x| x as u8).collect(),
        );

        let point_data = self
            .point_data
            .into_iter()
            .map(|array| array.into_data_array(num_points))
            .collect::<Result<Vec<_>, _>>()?;

        let cell_data = self
            .cell_data
            .into_iter()
            .map(|array| array.into_data_array(num_cells))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UnstructuredGrid {
            points,
            cells,
            point_data,
            cell_data,
        })
    }
}

fn cell_array(
    array: Option<ResolvedArray>,
    name: &str,
    expected: usize,
) -> Result<Vec<f64>, error::LengthMismatch> {
    match array {
        Some(array) => {
            check_length(&array, expected)?;
            Ok(array.values)
        }
        None if expected == 0 => Ok(Vec::new()),
        None => Err(error::LengthMismatch::new(name.into(), expected, 0)),
    }
}

fn check_length(array: &ResolvedArray, expected: usize) -> Result<(), error::LengthMismatch> {
    if array.values.len() != expected {
        return Err(error::LengthMismatch::new(
            array.name.clone(),
            expected,
            array.values.len(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
/// Describes if the data for this array has already been parsed (regardless of format), or its
/// offset in the `AppendedData` section
pub enum ArrayData {
    Parsed(Vec<f64>),
    AppendedBinary { offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
/// A `<DataArray>` element whose header has been read
pub struct PartialDataArray {
    pub name: String,
    pub precision: Precision,
    pub components: usize,
    pub data: ArrayData,
}

#[cfg(test)]
impl PartialDataArray {
    /// unwrap the data as `ArrayData::Parsed` or panic
    fn unwrap_parsed(self) -> Vec<f64> {
        match self.data {
            ArrayData::Parsed(x) => x,
            _ => panic!("called unwrap_parsed on a ArrayData::AppendedBinary"),
        }
    }

    /// unwrap the data as `ArrayData::AppendedBinary` or panic
    fn unwrap_appended(self) -> usize {
        match self.data {
            ArrayData::AppendedBinary { offset } => offset,
            _ => panic!("called unwrap_appended on a ArrayData::Parsed"),
        }
    }
}

/// A `<DataArray>` with all of its values in memory
#[derive(Debug, Clone, PartialEq)]
struct ResolvedArray {
    name: String,
    precision: Precision,
    components: usize,
    values: Vec<f64>,
}

impl ResolvedArray {
    fn into_data_array(self, tuples: usize) -> Result<DataArray, error::LengthMismatch> {
        let expected = tuples * self.components;
        check_length(&self, expected)?;

        let values = Array2::from_shape_vec((tuples, self.components), self.values)
            .map_err(|_| error::LengthMismatch::new(self.name.clone(), expected, 0))?;

        Ok(DataArray::new(self.name, self.precision, values))
    }
}

fn resolve_array(
    partial: PartialDataArray,
    bytes: &[u8],
    appended_start: Option<usize>,
    file: FileHeader,
) -> Result<ResolvedArray, ParseError> {
    let PartialDataArray {
        name,
        precision,
        components,
        data,
    } = partial;

    let values = match data {
        ArrayData::Parsed(values) => values,
        ArrayData::AppendedBinary { offset } => {
            let start = appended_start.ok_or_else(|| {
                error::AppendedData::from(error::ParsingBinary::MissingSection(name.clone()))
            })?;
            read_appended_array(bytes, start, offset, &name, precision, file)
                .map_err(error::AppendedData::from)?
        }
    };

    Ok(ResolvedArray {
        name,
        precision,
        components,
        values,
    })
}

/// read through a `DataArray` element, parsing inline values or recording the offset of
/// appended ones. `start` is the opening (or empty) element that was just read.
///
/// `<InformationKey>` children that some writers add to arrays are skipped.
pub(crate) fn read_dataarray(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    was_empty: bool,
    file: FileHeader,
) -> Result<PartialDataArray, error::Array> {
    let name = match find_attribute(start, "Name")? {
        Some(name) => attribute_string(&name)?,
        None => String::new(),
    };

    let precision =
        parse_attribute::<Precision, error::Array>(start, "type", "DataArray", "a VTK data type")?;

    let components = match find_attribute(start, "NumberOfComponents")? {
        Some(att) => parse_attribute_value::<usize>(
            &att,
            "DataArray",
            "NumberOfComponents",
            "a positive integer",
        )?
        .max(1),
        None => 1,
    };

    let format = get_attribute_value::<error::Array>(start, "format", "DataArray")?;

    let header = match format.value.as_ref() {
        b"appended" => {
            // appended binary data, we should have an extra `offset` attribute that we can read
            let offset = parse_attribute::<usize, error::Array>(
                start,
                "offset",
                "DataArray",
                "a positive integer",
            )?;
            DataArrayHeader::AppendedBinary { offset }
        }
        b"binary" => DataArrayHeader::InlineBase64,
        b"ascii" => DataArrayHeader::InlineAscii,
        _ => {
            return Err(
                unexpected_value(&format, "DataArray", "format", "ascii, binary or appended")
                    .into(),
            )
        }
    };

    log::trace!("array `{}` ({}x{}) stored as {:?}", name, precision, components, header);

    // read the body of the element, if there is one
    let mut text = None;

    if !was_empty {
        loop {
            let event = reader.read_event().map_err(error::MalformedXml::from)?;

            match event {
                Event::Text(body) => text = Some(body.into_inner()),
                Event::Start(_) => skip_element::<error::Array>(reader)?,
                // nested elements are skipped whole, so this closes the DataArray
                Event::End(_) => break,
                Event::Eof => {
                    let unexpected =
                        error::UnexpectedElement::new("/DataArray", EventSummary::eof());
                    return Err(unexpected.into());
                }
                _ => (),
            }
        }
    }

    let body: &[u8] = text.as_deref().unwrap_or(&[]);

    let data = match header {
        DataArrayHeader::AppendedBinary { offset } => ArrayData::AppendedBinary { offset },
        DataArrayHeader::InlineAscii => ArrayData::Parsed(parse_ascii_inner_dataarray(body, &name)?),
        DataArrayHeader::InlineBase64 => {
            ArrayData::Parsed(parse_base64_inner_dataarray(body, &name, precision, file)?)
        }
    };

    Ok(PartialDataArray {
        name,
        precision,
        components,
        data,
    })
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// Describes what kind of information is in a header
pub enum DataArrayHeader {
    /// Ascii information is contained directly within the `DataArray` elements
    InlineAscii,
    /// Base64 information is contained directly within the `DataArray` elements
    InlineBase64,
    /// Information is not stored inline, it is stored at a specified `offset`
    /// in the `AppendedData` section
    AppendedBinary { offset: usize },
}

/// parse the values for a single inline ascii encoded array
fn parse_ascii_inner_dataarray(body: &[u8], array_name: &str) -> Result<Vec<f64>, error::InlineArray> {
    let text = std::str::from_utf8(body)
        .map_err(|e| error::InlineArray::new(array_name.into(), e.to_string()))?;

    text.split_ascii_whitespace()
        .map(|x| {
            x.parse::<f64>().map_err(|_| {
                error::InlineArray::new(array_name.into(), format!("`{x}` is not a number"))
            })
        })
        .collect()
}

/// parse the values for a single inline base64 encoded array
fn parse_base64_inner_dataarray(
    body: &[u8],
    array_name: &str,
    precision: Precision,
    file: FileHeader,
) -> Result<Vec<f64>, error::InlineArray> {
    let encoded: Vec<u8> = body
        .iter()
        .copied()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let block = decode_base64_block(&encoded, file).ok_or_else(|| {
        error::InlineArray::new(array_name.into(), "invalid base64 data block".into())
    })?;

    Ok(utils::bytes_to_floats(&block, precision, file.byte_order))
}

/// decode a base64 block and strip its header. Writers either encode the header and the data
/// as one stream or as two separately padded streams, both layouts are accepted.
fn decode_base64_block(encoded: &[u8], file: FileHeader) -> Option<Vec<u8>> {
    let header_size = file.header_type.size();

    if let Ok(decoded) = base64::decode(encoded) {
        let end = file
            .header_type
            .read(&decoded, file.byte_order)
            .and_then(|count| header_size.checked_add(count));
        if let Some(block) = end.and_then(|end| decoded.get(header_size..end)) {
            return Some(block.to_vec());
        }
    }

    let header_chars = (header_size + 2) / 3 * 4;
    let header = base64::decode(encoded.get(..header_chars)?).ok()?;
    let count = file.header_type.read(&header, file.byte_order)?;
    let data = base64::decode(encoded.get(header_chars..)?).ok()?;

    data.get(..count).map(<[u8]>::to_vec)
}

fn check_appended_encoding(appended: &BytesStart<'_>) -> Result<(), error::AppendedData> {
    let encoding =
        get_attribute_value::<error::AppendedData>(appended, "encoding", "AppendedData")?;
    check_attribute_value(&encoding, "AppendedData", "encoding", "raw")?;
    Ok(())
}

/// find the first byte of appended data: the reader stops right after `<AppendedData ...>`,
/// which is followed by optional whitespace and a single `_`
fn appended_data_start(bytes: &[u8], position: usize) -> Result<usize, error::ParsingBinary> {
    let rest = bytes
        .get(position..)
        .ok_or(error::ParsingBinary::LeadingBytes)?;

    let underscore = rest
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .filter(|idx| rest[*idx] == b'_')
        .ok_or(error::ParsingBinary::LeadingBytes)?;

    Ok(position + underscore + 1)
}

/// read information from the appended data binary buffer
fn read_appended_array(
    bytes: &[u8],
    appended_start: usize,
    offset: usize,
    array_name: &str,
    precision: Precision,
    file: FileHeader,
) -> Result<Vec<f64>, error::ParsingBinary> {
    let out_of_bounds = || error::ParsingBinary::OutOfBounds(array_name.into(), offset);

    let block_start = appended_start
        .checked_add(offset)
        .ok_or_else(out_of_bounds)?;
    let header_size = file.header_type.size();

    let count = bytes
        .get(block_start..)
        .and_then(|block| file.header_type.read(block, file.byte_order))
        .ok_or_else(out_of_bounds)?;

    let data_start = block_start
        .checked_add(header_size)
        .ok_or_else(out_of_bounds)?;
    let data_end = data_start.checked_add(count).ok_or_else(out_of_bounds)?;
    let data = bytes
        .get(data_start..data_end)
        .ok_or_else(out_of_bounds)?;

    Ok(utils::bytes_to_floats(data, precision, file.byte_order))
}

/// skip everything up to and including the end of the element that was just opened
pub(crate) fn skip_element<E>(reader: &mut Reader<&[u8]>) -> Result<(), E>
where
    E: From<error::UnexpectedElement> + From<error::MalformedXml>,
{
    let mut depth = 1usize;

    loop {
        let event = reader.read_event().map_err(error::MalformedXml::from)?;

        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                let unexpected = error::UnexpectedElement::new("closing element", EventSummary::eof());
                return Err(E::from(unexpected));
            }
            _ => (),
        }
    }
}

pub(crate) fn find_attribute<'a>(
    bytes_start: &'a BytesStart<'_>,
    attribute_key: &str,
) -> Result<Option<Attribute<'a>>, error::MalformedAttribute> {
    for attribute in bytes_start.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == attribute_key.as_bytes() {
            return Ok(Some(attribute));
        }
    }

    Ok(None)
}

pub(crate) fn get_attribute_value<'a, E>(
    bytes_start: &'a BytesStart<'_>,
    attribute_key: &str,
    element_name: &str,
) -> Result<Attribute<'a>, E>
where
    E: From<error::MissingAttribute> + From<error::MalformedAttribute>,
{
    // find the `attribute_key` attribute on the `element_name` element
    match find_attribute(bytes_start, attribute_key)? {
        Some(att) => Ok(att),
        None => {
            let err = error::MissingAttribute::new(element_name.into(), attribute_key.into());
            Err(E::from(err))
        }
    }
}

/// the unescaped value of an attribute
pub(crate) fn attribute_string(att: &Attribute<'_>) -> Result<String, error::MalformedXml> {
    let value = att.unescape_value()?;
    Ok(value.into_owned())
}

fn parse_attribute<T: FromStr, E>(
    bytes_start: &BytesStart<'_>,
    attribute_key: &str,
    element_name: &str,
    expected: &str,
) -> Result<T, E>
where
    E: From<error::MissingAttribute>
        + From<error::MalformedAttribute>
        + From<error::UnexpectedAttributeValue>,
{
    let att = get_attribute_value::<E>(bytes_start, attribute_key, element_name)?;
    let value = parse_attribute_value(&att, element_name, attribute_key, expected)?;
    Ok(value)
}

fn parse_attribute_value<T: FromStr>(
    att: &Attribute<'_>,
    element_name: &str,
    attribute_name: &str,
    expected: &str,
) -> Result<T, error::UnexpectedAttributeValue> {
    std::str::from_utf8(&att.value)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| unexpected_value(att, element_name, attribute_name, expected))
}

fn unexpected_value(
    att: &Attribute<'_>,
    element_name: &str,
    attribute_name: &str,
    expected: &str,
) -> error::UnexpectedAttributeValue {
    error::UnexpectedAttributeValue {
        element_name: element_name.into(),
        attribute_name: attribute_name.into(),
        expected_value: expected.into(),
        actual_value: error::ParsedNameOrBytes::new(&att.value),
    }
}

/// ensure that an attribute's value is what we expect it to be, otherwise return an error with
/// some location information
fn check_attribute_value(
    att: &Attribute<'_>,
    element_name: &str,
    attribute_name: &str,
    expected_attribute_value: &str,
) -> Result<(), error::UnexpectedAttributeValue> {
    if att.value.as_ref() != expected_attribute_value.as_bytes() {
        Err(unexpected_value(
            att,
            element_name,
            attribute_name,
            expected_attribute_value,
        ))
    } else {
        Ok(())
    }
}
