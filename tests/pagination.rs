mod common;

use assert_matches::assert_matches;

use biosamples_annotations::error::AnnotationError;
use biosamples_annotations::pagination::{PageOutcome, Paginator};

use common::MockSearch;

#[test]
fn pages_until_offset_reaches_total() {
    let client = MockSearch::new(2500);
    let pages = Paginator::start(&client, 1000).unwrap();
    assert_eq!(pages.total(), 2500);

    let starts: Vec<u64> = pages
        .map(|outcome| match outcome {
            PageOutcome::Fetched(page) => page.start,
            PageOutcome::Skipped { start, .. } => start,
        })
        .collect();
    assert_eq!(starts, vec![0, 1000, 2000]);
    assert_eq!(client.starts(), vec![0, 1000, 2000]);
}

#[test]
fn first_page_is_not_requested_twice() {
    let client = MockSearch::new(10);
    let pages: Vec<_> = Paginator::start(&client, 100).unwrap().collect();
    assert_eq!(pages.len(), 1);
    assert_eq!(client.starts(), vec![0]);
}

#[test]
fn empty_result_set_yields_no_pages() {
    let client = MockSearch::new(0);
    let pages: Vec<_> = Paginator::start(&client, 100).unwrap().collect();
    assert!(pages.is_empty());
}

#[test]
fn first_request_failure_is_fatal() {
    let client = MockSearch::new(2500).failing_at(0);
    let err = Paginator::start(&client, 1000).err().unwrap();
    assert_matches!(err, AnnotationError::SearchStatus { status: 503, .. });
    assert_eq!(client.starts(), vec![0]);
}

#[test]
fn later_failure_skips_page_and_continues() {
    let client = MockSearch::new(2500).failing_at(1000);
    let outcomes: Vec<_> = Paginator::start(&client, 1000).unwrap().collect();
    assert_eq!(outcomes.len(), 3);
    assert_matches!(outcomes[0], PageOutcome::Fetched(_));
    assert_matches!(outcomes[1], PageOutcome::Skipped { start: 1000, .. });
    assert_matches!(outcomes[2], PageOutcome::Fetched(ref page) if page.start == 2000);
}

#[test]
fn zero_page_size_is_rejected_before_any_request() {
    let client = MockSearch::new(10);
    let err = Paginator::start(&client, 0).err().unwrap();
    assert_matches!(err, AnnotationError::InvalidPageSize(0));
    assert!(client.starts().is_empty());
}
