//! reading `.pvd` collection files

use super::error;
use super::event_summary::EventSummary;
use super::{attribute_string, find_attribute, get_attribute_value, read_to_file_header};

use crate::prelude::*;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use std::path::Path;

/// A single `<DataSet>` element of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub timestep: f64,
    pub group: Option<String>,
    pub part: Option<String>,
    /// path of the dataset, relative to the folder of the `.pvd` file
    pub file: String,
}

impl CollectionEntry {
    pub fn new<T: Into<String>>(timestep: f64, file: T) -> Self {
        Self {
            timestep,
            group: None,
            part: None,
            file: file.into(),
        }
    }
}

/// read and parse the datasets of a `.pvd` file, in document order
pub fn read_pvd<P: AsRef<Path>>(path: P) -> Result<Vec<CollectionEntry>, Error> {
    let bytes = std::fs::read(path)?;
    parse_pvd(&bytes)
}

/// parse the datasets of a `.pvd` document held in memory, in document order
pub fn parse_pvd(bytes: &[u8]) -> Result<Vec<CollectionEntry>, Error> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    read_to_file_header(&mut reader, "Collection").map_err(ParseError::from)?;

    let mut entries = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(error::MalformedXml::from)
            .map_err(error::Collection::from)
            .map_err(ParseError::from)?;

        match event {
            Event::Start(start) | Event::Empty(start) if start.name().as_ref() == b"DataSet" => {
                entries.push(read_dataset(&start)?);
            }
            Event::Start(start) | Event::Empty(start)
                if start.name().as_ref() != b"Collection" =>
            {
                let unexpected =
                    error::UnexpectedElement::new("DataSet", EventSummary::start(&start));
                return Err(ParseError::from(error::Collection::from(unexpected)).into());
            }
            Event::Eof => break,
            _ => (),
        }
    }

    log::debug!("collection references {} datasets", entries.len());

    Ok(entries)
}

fn read_dataset(start: &BytesStart<'_>) -> Result<CollectionEntry, Error> {
    let collection_err = |e: error::Collection| Error::from(ParseError::from(e));

    let timestep = get_attribute_value::<error::Collection>(start, "timestep", "DataSet")
        .map_err(collection_err)?;
    let timestep = attribute_string(&timestep)
        .map_err(error::Collection::from)
        .map_err(collection_err)?;

    let file = get_attribute_value::<error::Collection>(start, "file", "DataSet")
        .map_err(collection_err)?;
    let file = attribute_string(&file)
        .map_err(error::Collection::from)
        .map_err(collection_err)?;

    let optional = |key: &str| -> Result<Option<String>, Error> {
        let attribute = find_attribute(start, key)
            .map_err(error::Collection::from)
            .map_err(collection_err)?;

        attribute
            .map(|att| attribute_string(&att))
            .transpose()
            .map_err(error::Collection::from)
            .map_err(collection_err)
    };

    Ok(CollectionEntry {
        timestep: parse_timestep(&timestep)?,
        group: optional("group")?.filter(|x| !x.is_empty()),
        part: optional("part")?.filter(|x| !x.is_empty()),
        file,
    })
}

/// convert a `timestep` attribute to a float
///
/// Some writers emit exponents without digits (`1e`), these are read as `1e0`.
pub fn parse_timestep(value: &str) -> Result<f64, Error> {
    if let Ok(time) = value.parse::<f64>() {
        return Ok(time);
    }

    let mut cleaned = value.trim().to_lowercase();
    if cleaned.ends_with('e') {
        cleaned.push('0');
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidTimestep(value.to_string()))
}
