use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use biosamples_annotations::app::{App, RunOptions};
use biosamples_annotations::config::{ConfigLoader, ConfigOverrides};
use biosamples_annotations::domain::OntologyTermMode;
use biosamples_annotations::error::AnnotationError;
use biosamples_annotations::output::{ConsoleOutput, JsonOutput, OutputMode};
use biosamples_annotations::search::SolrHttpClient;

#[derive(Parser)]
#[command(name = "biosamples-annotations")]
#[command(
    about = "Read out BioSamples annotations into a CSV, doing 'n' samples at each step"
)]
#[command(version, author)]
struct Cli {
    /// Number of samples requested per page
    #[arg(
        short = 'n',
        long = "numberofrows",
        visible_alias = "rows",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    rows: Option<u64>,

    /// JSON config file (defaults to ./biosamples-annotations.json when present)
    #[arg(long)]
    config: Option<String>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<String>,

    /// Search endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long, value_enum)]
    ontology_terms: Option<OntologyTermMode>,

    /// Per-request timeout; unset means wait indefinitely
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(long)]
    non_interactive: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<AnnotationError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AnnotationError) -> u8 {
    match error {
        AnnotationError::ConfigRead(_)
        | AnnotationError::ConfigParse(_)
        | AnnotationError::InvalidPageSize(_)
        | AnnotationError::InvalidEndpoint(_) => 2,
        AnnotationError::SearchHttp(_)
        | AnnotationError::SearchStatus { .. }
        | AnnotationError::SearchDecode(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let overrides = ConfigOverrides {
        endpoint: cli.endpoint,
        output: cli.output,
        rows: cli.rows,
        ontology_terms: cli.ontology_terms,
        timeout_secs: cli.timeout_secs,
    };
    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;
    let client = SolrHttpClient::new(config.search.clone())?;
    let app = App::new(client);
    let options = RunOptions::from(&config);

    match output_mode {
        OutputMode::NonInteractive => {
            let summary = app.run(&options, &JsonOutput)?;
            JsonOutput::print_summary(&summary).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            let summary = app.run(&options, &ConsoleOutput)?;
            ConsoleOutput::print_summary(&summary);
        }
    }
    Ok(())
}
