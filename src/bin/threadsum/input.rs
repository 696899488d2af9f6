use anyhow::Result;
use clap::Args;
use crossterm::tty::IsTty;
use std::io::{self, Read};
use std::path::PathBuf;
use threadsum::input::{example_thread, read_thread_file};
use threadsum::notice::Notice;
use threadsum::storage::LocalStore;

/// Where the email thread comes from. Without a flag it is read from stdin.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Read the thread from a plain-text (.txt) file
    #[arg(long, short, conflicts_with_all = ["saved", "example"])]
    pub file: Option<PathBuf>,
    /// Use the thread saved with `threadsum save`
    #[arg(long, conflicts_with = "example")]
    pub saved: bool,
    /// Use the bundled example thread
    #[arg(long)]
    pub example: bool,
}

pub fn read_stdin(prompt: &str) -> Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_tty() {
        eprintln!("{prompt} (finish with Ctrl-D)");
    }

    let mut text = String::new();
    stdin.read_to_string(&mut text)?;
    Ok(text)
}

impl InputArgs {
    pub fn read(&self, store: &LocalStore) -> Result<String> {
        if let Some(path) = &self.file {
            log::debug!("reading thread from {}", path.display());
            return read_thread_file(path).map_err(|e| Notice::destructive("Upload failed", e).into());
        }

        if self.saved {
            return store
                .saved_email()
                .map(str::to_string)
                .ok_or_else(|| {
                    Notice::destructive("No saved email", "You haven't saved any email thread yet")
                        .into()
                });
        }

        if self.example {
            return Ok(example_thread());
        }

        read_stdin("Paste your email thread here")
    }
}
