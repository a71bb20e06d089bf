use super::{
    config_stub, default_config, load_config, validate_config, write_config_stub,
    CONFIG_SCHEMA_VERSION,
};
use std::path::Path;

#[test]
fn stub_round_trips_through_load() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("docs/schemadoc.yaml");
    write_config_stub(&path, false).expect("write stub");

    let loaded = load_config(&path).expect("load stub");
    assert_eq!(loaded.config, default_config());
    assert_eq!(loaded.schema_path(), dir.path().join("docs/schema.yaml"));
    assert_eq!(loaded.output_dir(), dir.path().join("docs/generated"));
}

#[test]
fn stub_is_not_overwritten_without_force() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("schemadoc.yaml");
    std::fs::write(&path, "keep me").expect("write existing");

    let err = write_config_stub(&path, false).expect_err("refuse overwrite");
    assert!(err.to_string().contains("--force"));
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "keep me");

    write_config_stub(&path, true).expect("overwrite with force");
    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        config_stub().expect("stub")
    );
}

#[test]
fn optional_fields_take_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("schemadoc.yaml");
    std::fs::write(
        &path,
        "schema_version: 1\nschema: /abs/schema.yaml\ndimensions: dims.yaml\noutput_dir: out\n",
    )
    .expect("write config");

    let loaded = load_config(&path).expect("load");
    assert_eq!(loaded.config.link_table, "Dataset");
    assert_eq!(loaded.config.wrap_width, 70);
    assert_eq!(loaded.config.edge_colors.len(), 12);
    assert_eq!(loaded.schema_path(), Path::new("/abs/schema.yaml"));
    assert_eq!(loaded.dimensions_path(), dir.path().join("dims.yaml"));
}

#[test]
fn validation_rejects_bad_values() {
    let mut config = default_config();
    config.schema_version = CONFIG_SCHEMA_VERSION + 1;
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.wrap_width = 5;
    let err = validate_config(&config).expect_err("narrow wrap");
    assert!(err.to_string().contains("wrap_width"));

    let mut config = default_config();
    config.edge_colors.clear();
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.link_table = " ".to_string();
    assert!(validate_config(&config).is_err());
}
