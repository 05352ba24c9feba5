use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ResolvedConfig;
use crate::domain::OntologyTermMode;
use crate::error::AnnotationError;
use crate::extract::{ExtractFailure, extract_page};
use crate::pagination::{PageOutcome, Paginator};
use crate::search::SearchClient;
use crate::writer::AnnotationWriter;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output: Utf8PathBuf,
    pub rows: u64,
    pub ontology_terms: OntologyTermMode,
}

impl From<&ResolvedConfig> for RunOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            output: config.output.clone(),
            rows: config.rows,
            ontology_terms: config.ontology_terms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output: String,
    pub total: u64,
    pub page_size: u64,
    pub ontology_terms: String,
    pub pages_fetched: usize,
    pub pages_skipped: usize,
    pub skipped_offsets: Vec<u64>,
    pub rows_written: usize,
    pub failures: Vec<ExtractFailure>,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Clone)]
pub struct App<C: SearchClient> {
    client: C,
}

impl<C: SearchClient> App<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn run(
        &self,
        options: &RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, AnnotationError> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let clock = Instant::now();

        // The header goes out before any request, so a failed first page
        // still leaves a valid, empty CSV behind.
        let writer = AnnotationWriter::create(options.output.clone())?;
        sink.event(ProgressEvent {
            message: format!(
                "phase=Search; collating annotations ({} samples at a time)",
                options.rows
            ),
            elapsed: None,
        });

        let pages = Paginator::start(&self.client, options.rows)?;
        let total = pages.total();
        let page_size = pages.page_size();
        sink.event(ProgressEvent {
            message: format!("phase=Search; found {total} sample documents in total"),
            elapsed: Some(clock.elapsed()),
        });

        let mut pages_fetched = 0usize;
        let mut skipped_offsets = Vec::new();
        let mut rows_written = 0usize;
        let mut failures = Vec::new();

        for outcome in pages {
            match outcome {
                PageOutcome::Fetched(page) => {
                    pages_fetched += 1;
                    let batch = extract_page(page.response.docs(), options.ontology_terms);
                    let written = writer.append(&batch.annotations)?;
                    rows_written += written;
                    if !batch.failures.is_empty() {
                        warn!(
                            start = page.start,
                            failures = batch.failures.len(),
                            "some characteristics could not be decoded"
                        );
                    }
                    failures.extend(batch.failures);
                    sink.event(ProgressEvent {
                        message: format!(
                            "phase=Write; samples {}..{} -> {written} rows",
                            page.start,
                            (page.start + page_size).min(total)
                        ),
                        elapsed: Some(clock.elapsed()),
                    });
                }
                PageOutcome::Skipped { start, error } => {
                    skipped_offsets.push(start);
                    sink.event(ProgressEvent {
                        message: format!("phase=Search; skipped samples from {start}: {error}"),
                        elapsed: Some(clock.elapsed()),
                    });
                }
            }
        }

        info!(
            rows_written,
            pages_fetched,
            pages_skipped = skipped_offsets.len(),
            "collation finished"
        );
        sink.event(ProgressEvent {
            message: "phase=Done; all done".to_string(),
            elapsed: Some(clock.elapsed()),
        });

        Ok(RunSummary {
            output: writer.path().to_string(),
            total,
            page_size,
            ontology_terms: options.ontology_terms.to_string(),
            pages_fetched,
            pages_skipped: skipped_offsets.len(),
            skipped_offsets,
            rows_written,
            failures,
            started_at,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
