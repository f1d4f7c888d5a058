use vtu_probe::prelude::*;
use vtu_probe::{parse_vtu, read_vtu, write_vtu, Error, ParseError};

fn square_nodes() -> Vec<(f64, f64)> {
    (0..3)
        .flat_map(|j| (0..3).map(move |i| (i as f64, j as f64)))
        .collect()
}

#[test]
fn inline_ascii() {
    let grid = read_vtu("./static/square_ascii.vtu").unwrap();

    assert_eq!(grid.num_points(), 9);
    assert_eq!(grid.num_cells(), 8);
    assert_eq!(grid.cells.iter().next().unwrap(), &[0, 1, 4]);
    assert!(grid.cells.types.iter().all(|t| *t == 5));

    let pressure = grid.point_field("pressure").unwrap();
    assert_eq!(pressure.precision, Precision::Float64);
    for ((x, y), p) in square_nodes().into_iter().zip(pressure.column(0)) {
        assert_eq!(*p, 1.0 + 2.0 * x + 3.0 * y);
    }

    let velocity = grid.point_field("velocity").unwrap();
    assert_eq!(velocity.components(), 3);
    assert_eq!(velocity.values.row(5).to_vec(), vec![2.0, 1.0, 0.0]);

    let material = grid.cell_field("material").unwrap();
    assert_eq!(material.precision, Precision::Int32);
    assert_eq!(material.column(0).to_vec(), (0..8).map(f64::from).collect::<Vec<_>>());
}

#[test]
fn inline_base64_matches_ascii() {
    let ascii = read_vtu("./static/square_ascii.vtu").unwrap();
    let base64 = read_vtu("./static/square_base64.vtu").unwrap();

    assert_eq!(ascii.points, base64.points);
    assert_eq!(ascii.cells, base64.cells);

    // pressure is stored as Float32 in the base64 file
    let pressure = base64.point_field("pressure").unwrap();
    assert_eq!(pressure.precision, Precision::Float32);
    assert_eq!(pressure.values, ascii.point_field("pressure").unwrap().values);

    assert_eq!(
        base64.point_field("velocity").unwrap().values,
        ascii.point_field("velocity").unwrap().values
    );
    assert_eq!(base64.cell_field("material"), ascii.cell_field("material"));
}

#[test]
fn appended_raw_with_64_bit_headers() {
    let grid = read_vtu("./static/cube_appended.vtu").unwrap();

    assert_eq!(grid.num_points(), 27);
    assert_eq!(grid.num_cells(), 8);
    assert_eq!(grid.cells.iter().next().unwrap(), &[0, 1, 4, 3, 9, 10, 13, 12]);
    assert!(grid.cells.types.iter().all(|t| *t == 12));

    // FieldData is not part of the point arrays
    assert_eq!(grid.point_field_names(), vec!["temperature"]);
    assert_eq!(grid.cell_field_names(), vec!["zone"]);

    let temperature = grid.point_field("temperature").unwrap();
    for (point, t) in grid.points.outer_iter().zip(temperature.column(0)) {
        assert_eq!(*t, 2.0 + point[0] - point[1] + 0.5 * point[2]);
    }
}

#[test]
fn write_and_read_every_encoding() {
    let original = read_vtu("./static/square_base64.vtu").unwrap();

    for encoding in [Encoding::Ascii, Encoding::Base64, Encoding::Appended] {
        let mut output = Vec::new();
        write_vtu(&mut output, &original, encoding).unwrap();

        let parsed = parse_vtu(&output).unwrap();
        assert_eq!(parsed, original, "{:?} output differs", encoding);
    }
}

#[test]
fn written_file_is_on_disk() {
    std::fs::create_dir_all("./test_vtks").unwrap();
    let path = "./test_vtks/cube_written.vtu";

    let original = read_vtu("./static/cube_appended.vtu").unwrap();
    let file = std::fs::File::create(path).unwrap();
    write_vtu(std::io::BufWriter::new(file), &original, Encoding::Appended).unwrap();

    assert_eq!(read_vtu(path).unwrap(), original);
}

#[test]
fn missing_file() {
    let out = read_vtu("./static/does_not_exist.vtu");
    assert!(matches!(out, Err(Error::Io(_))));
}

#[test]
fn compressed_files_are_rejected() {
    let input = std::fs::read_to_string("./static/square_ascii.vtu")
        .unwrap()
        .replace(
            r#"byte_order="LittleEndian""#,
            r#"byte_order="LittleEndian" compressor="vtkZLibDataCompressor""#,
        );

    let out = parse_vtu(input.as_bytes());
    assert!(matches!(out, Err(Error::Parse(ParseError::Header(_)))));
}

#[test]
fn truncated_appended_data() {
    let mut input = std::fs::read("./static/cube_appended.vtu").unwrap();
    input.truncate(input.len() - 300);

    let out = parse_vtu(&input);
    assert!(matches!(out, Err(Error::Parse(ParseError::AppendedData(_)))));
}
