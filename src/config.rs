use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::OntologyTermMode;
use crate::error::AnnotationError;

pub const DEFAULT_CONFIG_FILE: &str = "biosamples-annotations.json";
pub const DEFAULT_ENDPOINT: &str = "http://cocoa.ebi.ac.uk:8989/solr/samples/select";
pub const DEFAULT_QUERY: &str = "*:*";
pub const DEFAULT_FIELDS: &str = "accession,*_crt_json";
pub const DEFAULT_OUTPUT: &str = "biosamples-annotations.csv";
pub const DEFAULT_ROWS: u64 = 1000;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub fields: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub ontology_terms: Option<OntologyTermMode>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line; these win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub output: Option<String>,
    pub rows: Option<u64>,
    pub ontology_terms: Option<OntologyTermMode>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub query: String,
    pub fields: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub search: SearchSettings,
    pub output: Utf8PathBuf,
    pub rows: u64,
    pub ontology_terms: OntologyTermMode,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, AnnotationError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|_| AnnotationError::ConfigRead(config_path.clone()))?;
            serde_json::from_str(&content)
                .map_err(|err| AnnotationError::ConfigParse(err.to_string()))?
        };

        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, AnnotationError> {
        let rows = overrides.rows.or(config.rows).unwrap_or(DEFAULT_ROWS);
        if rows == 0 {
            return Err(AnnotationError::InvalidPageSize(rows));
        }

        let endpoint = overrides
            .endpoint
            .or(config.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if endpoint.trim().is_empty() {
            return Err(AnnotationError::InvalidEndpoint(endpoint));
        }

        let timeout = overrides
            .timeout_secs
            .or(config.timeout_secs)
            .map(Duration::from_secs);

        Ok(ResolvedConfig {
            search: SearchSettings {
                endpoint,
                query: config.query.unwrap_or_else(|| DEFAULT_QUERY.to_string()),
                fields: config.fields.unwrap_or_else(|| DEFAULT_FIELDS.to_string()),
                timeout,
            },
            output: Utf8PathBuf::from(
                overrides
                    .output
                    .or(config.output)
                    .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            ),
            rows,
            ontology_terms: overrides
                .ontology_terms
                .or(config.ontology_terms)
                .unwrap_or_default(),
        })
    }
}
