use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Accession, Annotation, OntologyTermMode, attribute_type};
use crate::error::AnnotationError;
use crate::search::Document;

/// Decoded body of one `*_crt_json` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacteristicValue {
    pub text: String,
    #[serde(rename = "ontologyTerms", default)]
    pub ontology_terms: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractFailure {
    pub accession: Option<String>,
    pub field: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractBatch {
    pub annotations: Vec<Annotation>,
    pub failures: Vec<ExtractFailure>,
}

impl ExtractBatch {
    pub fn merge(&mut self, other: ExtractBatch) {
        self.annotations.extend(other.annotations);
        self.failures.extend(other.failures);
    }
}

pub fn extract_page(docs: &[Document], mode: OntologyTermMode) -> ExtractBatch {
    let mut batch = ExtractBatch::default();
    for doc in docs {
        batch.merge(extract_document(doc, mode));
    }
    batch
}

pub fn extract_document(doc: &Document, mode: OntologyTermMode) -> ExtractBatch {
    let mut batch = ExtractBatch::default();

    let accession = match document_accession(doc) {
        Ok(accession) => accession,
        Err(err) => {
            batch.failures.push(ExtractFailure {
                accession: None,
                field: None,
                reason: err.to_string(),
            });
            return batch;
        }
    };

    for (field, value) in doc {
        let Some(attribute) = attribute_type(field) else {
            continue;
        };
        for entry in characteristic_entries(field, value) {
            let result = entry.and_then(|raw| decode_characteristic(field, raw));
            match result {
                Ok(characteristic) => batch.annotations.extend(flatten(
                    &accession,
                    &attribute,
                    characteristic,
                    mode,
                )),
                Err(err) => {
                    debug!(
                        accession = %accession,
                        field = field.as_str(),
                        %err,
                        "skipping characteristic"
                    );
                    batch.failures.push(ExtractFailure {
                        accession: Some(accession.to_string()),
                        field: Some(field.clone()),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    batch
}

fn document_accession(doc: &Document) -> Result<Accession, AnnotationError> {
    doc.get("accession")
        .and_then(|v| v.as_str())
        .ok_or(AnnotationError::MissingAccession)?
        .parse()
}

/// Characteristic fields are multi-valued, but a lone string is accepted too.
fn characteristic_entries<'a>(
    field: &str,
    value: &'a Value,
) -> Vec<Result<&'a str, AnnotationError>> {
    match value {
        Value::String(raw) => vec![Ok(raw.as_str())],
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| malformed(field, "entry is not a string"))
            })
            .collect(),
        _ => vec![Err(malformed(field, "value is neither a string nor a list"))],
    }
}

pub fn decode_characteristic(
    field: &str,
    raw: &str,
) -> Result<CharacteristicValue, AnnotationError> {
    serde_json::from_str(raw).map_err(|err| malformed(field, &err.to_string()))
}

fn flatten(
    accession: &Accession,
    attribute: &str,
    characteristic: CharacteristicValue,
    mode: OntologyTermMode,
) -> Vec<Annotation> {
    let terms = characteristic.ontology_terms.unwrap_or_default();
    match (mode, terms.last()) {
        (_, None) => vec![Annotation::new(accession, attribute, &characteristic.text, "")],
        (OntologyTermMode::LastWins, Some(last)) => {
            vec![Annotation::new(accession, attribute, &characteristic.text, last)]
        }
        (OntologyTermMode::PerTerm, Some(_)) => terms
            .iter()
            .map(|term| Annotation::new(accession, attribute, &characteristic.text, term))
            .collect(),
    }
}

fn malformed(field: &str, reason: &str) -> AnnotationError {
    AnnotationError::MalformedCharacteristic {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn decode_without_terms() {
        let value = decode_characteristic("sex_crt_json", r#"{"text":"female"}"#).unwrap();
        assert_eq!(value.text, "female");
        assert!(value.ontology_terms.is_none());
    }

    #[test]
    fn empty_term_list_yields_empty_term() {
        let d = doc(json!({
            "accession": "SAMEA1",
            "sex_crt_json": [r#"{"text":"male","ontologyTerms":[]}"#]
        }));
        let batch = extract_document(&d, OntologyTermMode::LastWins);
        assert_eq!(batch.annotations.len(), 1);
        assert_eq!(batch.annotations[0].ontology_term, "");
    }

    #[test]
    fn lone_string_value_is_accepted() {
        let d = doc(json!({
            "accession": "SAMEA1",
            "organism_crt_json": r#"{"text":"Homo sapiens","ontologyTerms":["NCBITaxon_9606"]}"#
        }));
        let batch = extract_document(&d, OntologyTermMode::LastWins);
        assert_eq!(batch.annotations.len(), 1);
        assert_eq!(batch.annotations[0].attribute_type, "Organism");
        assert_eq!(batch.annotations[0].ontology_term, "NCBITaxon_9606");
    }

    #[test]
    fn non_characteristic_fields_are_ignored() {
        let d = doc(json!({
            "accession": "SAMEA1",
            "name": "sample one",
            "update_date": "2016-01-01"
        }));
        let batch = extract_document(&d, OntologyTermMode::LastWins);
        assert!(batch.annotations.is_empty());
        assert!(batch.failures.is_empty());
    }
}
