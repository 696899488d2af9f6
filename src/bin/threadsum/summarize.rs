use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use threadsum::input::require_thread;
use threadsum::mock::MockSummarizer;
use threadsum::notice::Notice;
use threadsum::preprocess::{extract_email_metadata, preprocess_email_thread};
use threadsum::sections::SectionKind;
use threadsum::storage::{LocalStore, Theme};
use threadsum::submission::SummarySource;
use threadsum::view::ResultsView;

use crate::display::{self, print_metadata_table, render_original, render_results};
use crate::input::{read_stdin, InputArgs};

#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Print one raw section only: summary, actions, decisions or questions
    #[arg(long, conflicts_with = "json")]
    pub section: Option<SectionKind>,
    /// Print the parsed sections as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Fabricate a summary locally instead of calling the backend
    #[arg(long)]
    pub mock: bool,
    /// Backend base URL (defaults to SUMMARIZER_URL)
    #[arg(long)]
    pub server: Option<String>,
    /// Also print the original thread under the results
    #[arg(long)]
    pub show_original: bool,
    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File holding summary text (stdin when omitted)
    #[arg(long, short)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub view: ViewArgs,
}

fn summary_source(args: &SummarizeArgs) -> Result<SummarySource> {
    if args.mock {
        return Ok(SummarySource::Mock(MockSummarizer::default()));
    }

    let server = args
        .server
        .clone()
        .unwrap_or(threadsum::SUMMARIZER_URL.to_string());
    Ok(SummarySource::backend(&server)?)
}

fn show_results(
    summary_text: Option<&str>,
    view_args: &ViewArgs,
    theme: Theme,
    original: Option<&str>,
) -> Result<()> {
    let view = ResultsView::from_state(summary_text)?;

    if let Some(kind) = view_args.section {
        println!("{}", view.raw(kind));
        return Ok(());
    }

    if view_args.json {
        println!("{}", serde_json::to_string_pretty(view.sectioned())?);
        return Ok(());
    }

    print!("{}", render_results(&view, theme));
    if let Some(original) = original {
        println!();
        print!("{}", render_original(original, theme));
    }

    Ok(())
}

pub async fn handle_summarize_command(args: SummarizeArgs, storage: &Path) -> Result<()> {
    let store = LocalStore::open(storage)?;
    let email_thread = args.input.read(&store)?;
    let source = summary_source(&args)?;

    let spinner = display::spinner("Processing your email thread...");
    let outcome = source.fetch(&email_thread).await;
    spinner.finish_and_clear();
    let summary = outcome?;

    display::print_notice(&Notice::info(
        "Success",
        "Email thread processed successfully",
    ));

    show_results(
        Some(&summary),
        &args.view,
        store.theme(),
        args.show_original.then_some(email_thread.as_str()),
    )
}

pub fn handle_parse_command(args: ParseArgs, storage: &Path) -> Result<()> {
    let store = LocalStore::open(storage)?;
    let summary_text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => read_stdin("Paste the summary text")?,
    };

    show_results(Some(&summary_text), &args.view, store.theme(), None)
}

pub fn handle_inspect(args: InputArgs, storage: &Path) -> Result<()> {
    let store = LocalStore::open(storage)?;
    let email_thread = args.read(&store)?;
    require_thread(&email_thread).map_err(Notice::error)?;

    let cleaned = preprocess_email_thread(&email_thread);
    let metadata = extract_email_metadata(&cleaned);

    println!("{cleaned}");
    print_metadata_table(&metadata, cleaned.len());
    Ok(())
}
