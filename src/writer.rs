use std::fs::{File, OpenOptions};

use camino::{Utf8Path, Utf8PathBuf};
use csv::WriterBuilder;

use crate::domain::Annotation;
use crate::error::AnnotationError;

pub const HEADER: [&str; 4] = [
    "ACCESSION",
    "ATTRIBUTE_TYPE",
    "ATTRIBUTE_VALUE",
    "ONTOLOGY_TERM",
];

/// Appends annotation rows to a CSV file, reopening it for every batch.
#[derive(Debug, Clone)]
pub struct AnnotationWriter {
    path: Utf8PathBuf,
}

impl AnnotationWriter {
    /// Truncates `path` and writes the header row.
    pub fn create(path: impl Into<Utf8PathBuf>) -> Result<Self, AnnotationError> {
        let path = path.into();
        let file = File::create(path.as_std_path())
            .map_err(|err| AnnotationError::Filesystem(format!("create {path}: {err}")))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(HEADER)?;
        writer
            .flush()
            .map_err(|err| AnnotationError::Filesystem(format!("flush {path}: {err}")))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the number of rows written.
    pub fn append(&self, annotations: &[Annotation]) -> Result<usize, AnnotationError> {
        if annotations.is_empty() {
            return Ok(0);
        }
        let file = OpenOptions::new()
            .append(true)
            .open(self.path.as_std_path())
            .map_err(|err| AnnotationError::Filesystem(format!("open {}: {err}", self.path)))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for annotation in annotations {
            writer.serialize(annotation)?;
        }
        writer
            .flush()
            .map_err(|err| AnnotationError::Filesystem(format!("flush {}: {err}", self.path)))?;
        Ok(annotations.len())
    }
}
