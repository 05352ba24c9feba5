use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;

/// Suffix the search index appends to every sample characteristic field.
pub const CHARACTERISTIC_SUFFIX: &str = "_crt_json";

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accession(String);

impl Accession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Accession {
    type Err = AnnotationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AnnotationError::InvalidAccession(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// One flattened output row. Field order matches the CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub accession: String,
    pub attribute_type: String,
    pub attribute_value: String,
    pub ontology_term: String,
}

impl Annotation {
    pub fn new(
        accession: &Accession,
        attribute_type: &str,
        attribute_value: &str,
        ontology_term: &str,
    ) -> Self {
        Self {
            accession: accession.as_str().to_string(),
            attribute_type: attribute_type.to_string(),
            attribute_value: attribute_value.to_string(),
            ontology_term: ontology_term.to_string(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Annotation{{accession='{}','{}'='{}',ontologyTerm='{}'}}",
            self.accession, self.attribute_type, self.attribute_value, self.ontology_term
        )
    }
}

/// How a characteristic value carrying several ontology terms is flattened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OntologyTermMode {
    /// One row per value, tagged with the last listed term.
    #[default]
    LastWins,
    /// One row per ontology term.
    PerTerm,
}

impl fmt::Display for OntologyTermMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OntologyTermMode::LastWins => write!(f, "last-wins"),
            OntologyTermMode::PerTerm => write!(f, "per-term"),
        }
    }
}

pub fn is_characteristic_field(name: &str) -> bool {
    name.ends_with(CHARACTERISTIC_SUFFIX) && name.len() > CHARACTERISTIC_SUFFIX.len()
}

/// Converts a camel-cased identifier to lower snake case.
pub fn underscore(identifier: &str) -> String {
    let split = ACRONYM_BOUNDARY.replace_all(identifier, "${1}_${2}");
    let split = CAMEL_BOUNDARY.replace_all(&split, "${1}_${2}");
    split.replace('-', "_").to_lowercase()
}

pub fn titleize(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `organismPart_crt_json` -> `Organism Part`.
pub fn attribute_type(field_name: &str) -> Option<String> {
    if !is_characteristic_field(field_name) {
        return None;
    }
    let stem = field_name.strip_suffix(CHARACTERISTIC_SUFFIX)?;
    Some(titleize(&underscore(stem)))
}
