#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use biosamples_annotations::error::AnnotationError;
use biosamples_annotations::search::{Document, SearchBody, SearchResponse, SearchClient};
use serde_json::json;

/// Serves `total` synthetic samples, each with one characteristic, and fails
/// the offsets listed in `failing`.
pub struct MockSearch {
    pub total: u64,
    pub failing: HashSet<u64>,
    pub calls: Mutex<Vec<(u64, u64)>>,
}

impl MockSearch {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, start: u64) -> Self {
        self.failing.insert(start);
        self
    }

    pub fn starts(&self) -> Vec<u64> {
        self.calls.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }
}

pub fn sample(index: u64) -> Document {
    json!({
        "accession": format!("SAMEA{index}"),
        "organismPart_crt_json": [
            format!(r#"{{"text":"tissue {index}","ontologyTerms":["UBERON_{index}"]}}"#)
        ]
    })
    .as_object()
    .unwrap()
    .clone()
}

impl SearchClient for MockSearch {
    fn fetch_page(&self, start: u64, rows: u64) -> Result<SearchResponse, AnnotationError> {
        self.calls.lock().unwrap().push((start, rows));
        if self.failing.contains(&start) {
            return Err(AnnotationError::SearchStatus {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        let end = (start + rows).min(self.total);
        Ok(SearchResponse {
            response: SearchBody {
                num_found: self.total,
                start,
                docs: (start..end).map(sample).collect(),
            },
        })
    }
}
