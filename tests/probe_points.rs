use vtu_probe::ndarray::Array2;
use vtu_probe::prelude::*;
use vtu_probe::Error;

fn square() -> VtuFile {
    VtuFile::open_with(
        "./static/square_ascii.vtu",
        ProbeOptions::default().with_dim(Dim::Two),
    )
    .unwrap()
}

fn pressure(x: f64, y: f64) -> f64 {
    1.0 + 2.0 * x + 3.0 * y
}

#[test]
fn linear_field_at_points() {
    let vtu = square();
    let points = [[0.3, 0.6, 0.0], [1.75, 1.1, 0.0], [2.0, 2.0, 0.0], [1.0, 0.5, 0.0]];

    let values = vtu.point_set_data("pressure", &points).unwrap();
    assert_eq!(values.dim(), (4, 1));

    for (point, value) in points.iter().zip(values.column(0)) {
        assert!((value - pressure(point[0], point[1])).abs() < 1e-9);
    }
}

#[test]
fn vector_field_at_labelled_probes() {
    let vtu = square();
    let probes: Probes = [("a", [0.25, 1.5, 0.0]), ("b", [1.5, 0.25, 0.0])]
        .into_iter()
        .collect();

    let data = vtu.point_data(&["pressure", "velocity"], &probes).unwrap();

    let velocity = data.value("velocity", "b").unwrap();
    assert!((velocity[0] - 1.5).abs() < 1e-9);
    assert!((velocity[1] - 0.25).abs() < 1e-9);
    assert_eq!(velocity[2], 0.0);

    let p = data.value("pressure", "a").unwrap();
    assert!((p[0] - pressure(0.25, 1.5)).abs() < 1e-9);

    assert_eq!(data.field_names().collect::<Vec<_>>(), vec!["pressure", "velocity"]);
}

#[test]
fn cell_data_is_moved_to_the_nodes() {
    let vtu = square();

    // node 0 only belongs to the first two cells
    let material = vtu.field("material").unwrap();
    assert_eq!(material.values[[0, 0]], 0.5);
    // the centre node is shared by six cells
    assert_eq!(material.values[[4, 0]], (0.0 + 1.0 + 3.0 + 4.0 + 6.0 + 7.0) / 6.0);

    assert!(matches!(vtu.field("density"), Err(Error::MissingField { .. })));
}

#[test]
fn outside_of_the_mesh() {
    let vtu = square();
    let values = vtu
        .point_set_data("pressure", &[[5.0, 5.0, 0.0], [-1.0, 1.0, 0.0]])
        .unwrap();

    assert!(values.iter().all(|x| x.is_nan()));
}

#[test]
fn other_methods() {
    let nearest = VtuFile::open_with(
        "./static/square_ascii.vtu",
        ProbeOptions::default()
            .with_dim(Dim::Two)
            .with_method(Method::Nearest),
    )
    .unwrap();
    let values = nearest.point_set_data("pressure", &[[1.9, 0.2, 0.0]]).unwrap();
    assert_eq!(values[[0, 0]], pressure(2.0, 0.0));

    let idw = VtuFile::open_with(
        "./static/square_ascii.vtu",
        ProbeOptions::default()
            .with_dim(Dim::Two)
            .with_method(Method::InverseDistance)
            .with_neighbors(4),
    )
    .unwrap();
    // the centre of a square is equally far from its four corners
    let values = idw.point_set_data("pressure", &[[0.5, 0.5, 0.0]]).unwrap();
    assert!((values[[0, 0]] - pressure(0.5, 0.5)).abs() < 1e-9);
}

#[test]
fn three_dimensional_appended_mesh() {
    let vtu = VtuFile::open("./static/cube_appended.vtu").unwrap();
    let points = [[0.5, 1.2, 1.7], [1.9, 0.1, 0.3], [1.0, 1.0, 1.0]];

    let values = vtu.point_set_data("temperature", &points).unwrap();
    for (p, value) in points.iter().zip(values.column(0)) {
        let expected = 2.0 + p[0] - p[1] + 0.5 * p[2];
        assert!((value - expected).abs() < 1e-9, "{value} != {expected}");
    }
}

#[test]
fn line_sample() {
    let vtu = square();
    let sample = vtu
        .line_data("pressure", [0.0, 1.0, 0.0], [2.0, 1.0, 0.0], 8)
        .unwrap();

    assert_eq!(sample.distance.len(), 9);
    assert_eq!(sample.values.nrows(), 9);
    assert!((sample.distance[8] - 2.0).abs() < 1e-12);

    for (d, value) in sample.distance.iter().zip(sample.values.column(0)) {
        assert!((value - pressure(*d, 1.0)).abs() < 1e-9);
    }
}

#[test]
fn shared_neighbours() {
    let vtu = square();
    let probes = Probes::from_points(&[[0.5, 0.5, 0.0], [1.5, 1.5, 0.0]]);
    let neighbors = vtu.neighbors(&probes);

    assert_eq!(neighbors.num_nodes(), 9);
    assert_eq!(vtu.points().ncols(), 2);

    let first = vtu.data(&neighbors, &probes, "pressure").unwrap();
    let second = vtu.point_data(&["pressure"], &probes).unwrap();
    assert_eq!(&first, second.field("pressure").unwrap());
}

#[test]
fn write_a_new_field() {
    std::fs::create_dir_all("./test_vtks").unwrap();
    let path = "./test_vtks/square_with_speed.vtu";

    let mut vtu = square();
    let speed: Vec<f64> = vtu
        .field("velocity")
        .unwrap()
        .values
        .outer_iter()
        .map(|v| v.dot(&v).sqrt())
        .collect();
    let speed = Array2::from_shape_vec((9, 1), speed).unwrap();

    vtu.write_field(speed.clone(), "speed", path, Encoding::Appended)
        .unwrap();

    let written = VtuFile::open(path).unwrap();
    assert_eq!(written.field("speed").unwrap().values, speed);
    assert!(written.field_names().contains(&"pressure"));

    let wrong_length = Array2::zeros((3, 1));
    assert!(matches!(
        vtu.write_field(wrong_length, "bad", path, Encoding::Ascii),
        Err(Error::ShapeMismatch { .. })
    ));
}
