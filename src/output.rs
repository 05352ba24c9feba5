use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, RunSummary};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Line-per-event progress on stdout.
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn print_summary(summary: &RunSummary) {
        println!(
            "{} rows written to {} ({} of {} pages fetched)",
            summary.rows_written,
            summary.output,
            summary.pages_fetched,
            summary.pages_fetched + summary.pages_skipped
        );
        if !summary.skipped_offsets.is_empty() {
            println!("skipped pages starting at: {:?}", summary.skipped_offsets);
        }
        if !summary.failures.is_empty() {
            println!(
                "{} characteristics could not be decoded",
                summary.failures.len()
            );
            for failure in &summary.failures {
                println!(
                    "  {} {}: {}",
                    failure.accession.as_deref().unwrap_or("<no accession>"),
                    failure.field.as_deref().unwrap_or("-"),
                    failure.reason
                );
            }
        }
    }
}

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => println!("[{:>7.1}s] {}", elapsed.as_secs_f64(), event.message),
            None => println!("{}", event.message),
        }
    }
}
