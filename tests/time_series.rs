use vtu_probe::prelude::*;
use vtu_probe::{parse_pvd, read_pvd, write_pvd, CollectionEntry, Error};

/// the field stored in every snapshot of the series
fn h(t: f64, x: f64, y: f64) -> f64 {
    2.0 + t * (1.0 + x + y)
}

fn series() -> PvdFile {
    PvdFile::open_with(
        "./static/series",
        "run.pvd",
        ProbeOptions::default().with_dim(Dim::Two),
    )
    .unwrap()
}

#[test]
fn entries_are_sorted_by_time() {
    let pvd = series();

    assert_eq!(pvd.timesteps(), vec![0.0, 1.0, 3.0]);
    assert_eq!(
        pvd.files(),
        vec!["data/step_0.vtu", "data/step_1.vtu", "data/step_2.vtu"]
    );
    assert_eq!(
        pvd.path_of(2).unwrap(),
        std::path::Path::new("./static/series").join("data/step_2.vtu")
    );
    assert!(pvd.path_of(3).is_none());

    // the file on disk keeps its own order
    let on_disk = read_pvd("./static/series/run.pvd").unwrap();
    assert_eq!(on_disk[0].timestep, 1.0);
    assert_eq!(on_disk[0].part.as_deref(), Some("0"));
}

#[test]
fn probes_over_every_step() {
    let pvd = series();
    let probes = Probes::from_points(&[[0.5, 0.5, 0.0], [1.2, 1.9, 0.0]]);

    let series = pvd.read_time_series(&["h", "k"], &probes).unwrap();
    assert_eq!(series.times().to_vec(), vec![0.0, 1.0, 3.0]);
    assert_eq!(series.labels(), &["pt0", "pt1"]);

    let values = series.field("h").unwrap();
    assert_eq!(values.dim(), (3, 2, 1));

    for (i, t) in [0.0, 1.0, 3.0].into_iter().enumerate() {
        assert!((values[[i, 0, 0]] - h(t, 0.5, 0.5)).abs() < 1e-9);
        assert!((values[[i, 1, 0]] - h(t, 1.2, 1.9)).abs() < 1e-9);
    }

    // `k` only exists as cell data and is constant in space
    let history = series.at("k", "pt1").unwrap();
    assert!((history[[2, 0]] - 3.0).abs() < 1e-9);

    let later = series.interpolate(2.0).unwrap();
    let value = later.value("h", "pt1").unwrap()[0];
    assert!((value - h(2.0, 1.2, 1.9)).abs() < 1e-9);

    assert!(matches!(
        series.interpolate(3.5),
        Err(Error::TimeOutOfRange { .. })
    ));
}

#[test]
fn whole_mesh_between_steps() {
    let pvd = series();

    let exact = pvd.read_time_step(1.0, "h").unwrap();
    assert_eq!(exact.values[[8, 0]], h(1.0, 2.0, 2.0));

    let blended = pvd.read_time_step(0.25, "h").unwrap();
    assert_eq!(blended.name, "h");
    assert!((blended.values[[4, 0]] - h(0.25, 1.0, 1.0)).abs() < 1e-12);

    let cells = pvd.read_time_step(2.0, "k").unwrap();
    assert!(cells.values.iter().all(|k| (k - 2.0).abs() < 1e-12));
}

#[test]
fn point_sets_and_lines_between_steps() {
    let pvd = series();
    let points = [[0.3, 1.4, 0.0], [1.8, 0.2, 0.0]];

    let values = pvd.read_point_set_data(0.6, "h", &points).unwrap();
    for (p, value) in points.iter().zip(values.column(0)) {
        assert!((value - h(0.6, p[0], p[1])).abs() < 1e-9);
    }

    let line = pvd
        .read_line_data(2.5, "h", [0.0, 0.0, 0.0], [2.0, 2.0, 0.0], 10)
        .unwrap();
    assert_eq!(line.distance.len(), 11);
    assert!((line.distance[10] - 8f64.sqrt()).abs() < 1e-12);
    assert!((line.values[[5, 0]] - h(2.5, 1.0, 1.0)).abs() < 1e-9);
}

#[test]
fn times_outside_of_the_collection() {
    let pvd = series();

    for t in [-1.0, 3.1] {
        assert!(matches!(
            pvd.read_time_step(t, "h"),
            Err(Error::TimeOutOfRange { .. })
        ));
    }

    assert!(matches!(
        pvd.read_point_set_data(1.0, "missing", &[[0.0; 3]]),
        Err(Error::MissingField { .. })
    ));
}

#[test]
fn clear_relative_paths() {
    let folder = std::path::Path::new("./test_vtks/clear_relative_paths");
    std::fs::create_dir_all(folder).unwrap();

    std::fs::copy("./static/series/run.pvd", folder.join("run.pvd")).unwrap();
    for step in 0..3 {
        let name = format!("step_{step}.vtu");
        std::fs::copy(format!("./static/series/data/{name}"), folder.join(&name)).unwrap();
    }

    let mut pvd = PvdFile::open(folder, "run.pvd").unwrap();
    pvd.clear_relative_paths().unwrap();
    assert_eq!(pvd.files(), vec!["step_0.vtu", "step_1.vtu", "step_2.vtu"]);

    let on_disk = read_pvd(folder.join("run.pvd")).unwrap();
    assert!(on_disk.iter().all(|entry| !entry.file.contains('/')));
    assert_eq!(on_disk[2].timestep, 3.0);

    // the datasets are now found next to the collection
    let reopened = PvdFile::open(folder, "run.pvd").unwrap();
    let value = reopened.read_time_step(3.0, "h").unwrap();
    assert_eq!(value.values[[0, 0]], h(3.0, 0.0, 0.0));
}

#[test]
fn write_collection() {
    let mut entries = vec![
        CollectionEntry::new(0.0, "a.vtu"),
        CollectionEntry::new(0.5, "b.vtu"),
    ];
    entries[1].part = Some("1".into());

    let mut output = Vec::new();
    write_pvd(&mut output, &entries).unwrap();

    assert_eq!(parse_pvd(&output).unwrap(), entries);
}

#[test]
fn empty_collection() {
    std::fs::create_dir_all("./test_vtks").unwrap();
    let mut output = Vec::new();
    write_pvd(&mut output, &[]).unwrap();
    std::fs::write("./test_vtks/empty.pvd", output).unwrap();

    assert!(matches!(
        PvdFile::open("./test_vtks", "empty.pvd"),
        Err(Error::EmptyCollection(_))
    ));
}

#[test]
fn meshes_that_change_between_steps() {
    // 4, 25 and 4 nodes carrying `(1 + t)(x + 2y)`
    let pvd = PvdFile::open_with(
        "./static/refined",
        "run.pvd",
        ProbeOptions::default().with_dim(Dim::Two),
    )
    .unwrap();
    let probes = Probes::from_points(&[[0.3, 0.6, 0.0], [1.7, 0.4, 0.0]]);

    let series = pvd.read_time_series(&["f"], &probes).unwrap();
    let values = series.field("f").unwrap();
    assert_eq!(values.dim(), (3, 2, 1));

    for (i, t) in [0.0, 1.0, 2.0].into_iter().enumerate() {
        assert!((values[[i, 0, 0]] - (1.0 + t) * 1.5).abs() < 1e-9);
        assert!((values[[i, 1, 0]] - (1.0 + t) * 2.5).abs() < 1e-9);
    }

    let later = series.interpolate(1.5).unwrap();
    assert!((later.value("f", "pt0").unwrap()[0] - 3.75).abs() < 1e-9);

    // whole-mesh values cannot be blended between different meshes
    assert!(matches!(
        pvd.read_time_step(0.5, "f"),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(pvd.read_time_step(1.0, "f"), Ok(array) if array.len() == 25));
}
