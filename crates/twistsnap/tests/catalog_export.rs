use twistsnap::fittings::ptfe_connector;
use twistsnap::{
    export_catalog, Catalog, ExportFormat, FittingKind, FittingSpec, TwistSnapConnector,
    TwistSnapError,
};

fn coarse_connector() -> TwistSnapConnector {
    let mut c = ptfe_connector();
    c.set_circle_segments(32);
    c
}

#[test]
fn export_writes_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::default()
        .select(&["snap-connector", "snap-socket-straight-OD4"])
        .unwrap();
    let records =
        export_catalog(&catalog, &coarse_connector(), dir.path(), &ExportFormat::ALL).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].name, "snap-connector");
    assert_eq!(records[0].format, ExportFormat::Step);
    assert_eq!(records[3].format, ExportFormat::Stl);

    for r in &records {
        assert!(r.path.starts_with(dir.path().join(r.format.extension())));
        assert!(r.triangles > 0);
        let bytes = std::fs::read(&r.path).unwrap();
        match r.format {
            ExportFormat::Stl => assert_eq!(bytes.len(), 84 + 50 * r.triangles),
            ExportFormat::Step => {
                let text = String::from_utf8(bytes).unwrap();
                assert!(text.starts_with("ISO-10303-21;"));
                assert!(text.contains("FACETED_BREP"));
            }
        }
    }

    let step_path = dir.path().join("step/snap-socket-straight-OD4.step");
    let step = std::fs::read_to_string(step_path).unwrap();
    assert!(step.contains("'Socket Fitting'"));
    assert!(step.contains("'thread'"));
}

#[test]
fn export_stl_only_skips_step_dir() {
    let dir = tempfile::tempdir().unwrap();
    let catalog =
        Catalog::from_toml_str("[[fitting]]\nname = \"plug\"\nkind = \"connector\"\n").unwrap();
    let records =
        export_catalog(&catalog, &coarse_connector(), dir.path(), &[ExportFormat::Stl]).unwrap();
    assert_eq!(records.len(), 1);
    assert!(dir.path().join("stl/plug.stl").is_file());
    assert!(!dir.path().join("step").exists());
}

#[test]
fn invalid_connector_fails_before_building() {
    let dir = tempfile::tempdir().unwrap();
    let mut connector = coarse_connector();
    connector.set_snapfit_count(0);
    let err = export_catalog(
        &Catalog::default(),
        &connector,
        dir.path(),
        &[ExportFormat::Stl],
    );
    assert!(matches!(err, Err(TwistSnapError::Config(_))));
}

#[test]
fn config_file_changes_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("connector.toml");
    std::fs::write(&path, "[snapfit]\ncount = 3\n\n[mesh]\ncircle_segments = 32\n").unwrap();

    let mut three = ptfe_connector();
    three.load_config(&path).unwrap();
    assert_eq!(three.snapfit_count(), 3);

    let four = coarse_connector();
    let v3 = three.twist_snap_connector().unwrap().volume();
    let v4 = four.twist_snap_connector().unwrap().volume();
    assert!(v3 < v4);

    // A missing file leaves the connector unchanged.
    let mut same = ptfe_connector();
    same.load_config(dir.path().join("absent.toml")).unwrap();
    assert_eq!(same, ptfe_connector());
}

#[test]
fn catalog_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, Catalog::default().to_toml_string().unwrap()).unwrap();
    let loaded = Catalog::load(&path).unwrap();
    assert_eq!(loaded, Catalog::default());
    assert!(matches!(
        Catalog::load(dir.path().join("nope.toml")),
        Err(TwistSnapError::Io { .. })
    ));
}

#[test]
fn repeated_names_never_share_an_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let picked = Catalog::default()
        .select(&["snap-connector", "snap-connector"])
        .unwrap();
    let records =
        export_catalog(&picked, &coarse_connector(), dir.path(), &[ExportFormat::Stl]).unwrap();
    assert_eq!(records.len(), 1);

    let twice = Catalog {
        fittings: vec![
            FittingSpec::new("plug", FittingKind::Connector),
            FittingSpec::new("plug", FittingKind::Socket),
        ],
    };
    let err = export_catalog(&twice, &coarse_connector(), dir.path(), &[ExportFormat::Stl]);
    assert!(matches!(err, Err(TwistSnapError::Catalog { .. })));
    assert!(!dir.path().join("stl/plug.stl").exists());

    let text = "[[fitting]]\nname = \"a\"\nkind = \"socket\"\n\n\
                [[fitting]]\nname = \"a\"\nkind = \"connector\"\n";
    assert!(matches!(
        Catalog::from_toml_str(text),
        Err(TwistSnapError::Catalog { .. })
    ));
}
