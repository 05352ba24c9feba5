use std::fs;

use assert_matches::assert_matches;

use biosamples_annotations::config::{
    Config, ConfigLoader, ConfigOverrides, DEFAULT_ENDPOINT, DEFAULT_OUTPUT, DEFAULT_QUERY,
};
use biosamples_annotations::domain::OntologyTermMode;
use biosamples_annotations::error::AnnotationError;

#[test]
fn load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biosamples-annotations.json");
    fs::write(
        &path,
        r#"{
            "endpoint": "https://www.ebi.ac.uk/biosamples/solr/samples/select",
            "rows": 250,
            "ontology_terms": "per-term",
            "timeout_secs": 45
        }"#,
    )
    .unwrap();

    let resolved =
        ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap();
    assert_eq!(
        resolved.search.endpoint,
        "https://www.ebi.ac.uk/biosamples/solr/samples/select"
    );
    assert_eq!(resolved.search.query, DEFAULT_QUERY);
    assert_eq!(resolved.rows, 250);
    assert_eq!(resolved.ontology_terms, OntologyTermMode::PerTerm);
    assert_eq!(resolved.search.timeout.map(|t| t.as_secs()), Some(45));
    assert_eq!(resolved.output.as_str(), DEFAULT_OUTPUT);
}

#[test]
fn overrides_take_precedence() {
    let config = Config {
        rows: Some(250),
        output: Some("from-file.csv".to_string()),
        ..Config::default()
    };
    let overrides = ConfigOverrides {
        rows: Some(50),
        output: Some("from-cli.csv".to_string()),
        ..ConfigOverrides::default()
    };

    let resolved = ConfigLoader::resolve_config(config, overrides).unwrap();
    assert_eq!(resolved.rows, 50);
    assert_eq!(resolved.output.as_str(), "from-cli.csv");
    assert_eq!(resolved.search.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn zero_rows_rejected() {
    let config = Config {
        rows: Some(0),
        ..Config::default()
    };
    let err = ConfigLoader::resolve_config(config, ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, AnnotationError::InvalidPageSize(0));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, AnnotationError::ConfigRead(_));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ rows: ").unwrap();
    let err = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, AnnotationError::ConfigParse(_));
}
