use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod display;
mod input;
mod saved;
mod summarize;
mod system;

use input::InputArgs;
use saved::{handle_load, handle_save, handle_theme_command, ThemeArgs};
use summarize::{handle_inspect, handle_parse_command, handle_summarize_command, ParseArgs, SummarizeArgs};
use system::{handle_serve, handle_template};
use threadsum::notice::Notice;

#[derive(Parser)]
pub enum Commands {
    /// Generate .env.template file
    Template,
    /// Start the summarization backend
    Serve,
    /// Summarize an email thread (stdin, --file, --saved or --example)
    Summarize(SummarizeArgs),
    /// Render summary text that was produced earlier
    Parse(ParseArgs),
    /// Show the cleaned thread and the participants and dates found in it
    Inspect(InputArgs),
    /// Save an email thread locally
    Save(InputArgs),
    /// Print the saved email thread
    Load,
    /// Show or change the colour theme
    Theme(ThemeArgs),
}

#[derive(Parser)]
#[command(name = "threadsum")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Summarize email threads into key points and action items", long_about = None)]
struct Cli {
    /// Storage file for the saved thread and theme (defaults to STORAGE_PATH)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    threadsum::init_logging();
    let args = Cli::parse();

    let storage = args
        .storage
        .unwrap_or_else(|| PathBuf::from(threadsum::STORAGE_PATH.as_str()));

    let result = match args.command {
        Commands::Template => handle_template(),
        Commands::Serve => handle_serve().await,
        Commands::Summarize(args) => handle_summarize_command(args, &storage).await,
        Commands::Parse(args) => handle_parse_command(args, &storage),
        Commands::Inspect(args) => handle_inspect(args, &storage),
        Commands::Save(args) => handle_save(args, &storage),
        Commands::Load => handle_load(&storage),
        Commands::Theme(args) => handle_theme_command(args, &storage),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Notice>() {
                Some(notice) => display::print_notice(notice),
                None => display::print_notice(&Notice::error(format!("{e:#}"))),
            }
            ExitCode::FAILURE
        }
    }
}
