use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use threadsum::notice::Notice;
use threadsum::storage::{LocalStore, StorageError, Theme};

use crate::display::print_notice;
use crate::input::InputArgs;

#[derive(Parser)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeCommands>,
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Use the light palette
    Light,
    /// Use the dark palette
    Dark,
    /// Switch between light and dark
    Toggle,
}

pub fn handle_save(args: InputArgs, storage: &Path) -> Result<()> {
    let mut store = LocalStore::open(storage)?;
    let email_thread = args.read(&store)?;

    match store.save_email(&email_thread) {
        Ok(()) => {
            log::debug!("saved {} characters to {}", email_thread.len(), store.path().display());
            print_notice(&Notice::info(
                "Email thread saved",
                "Your email thread has been saved locally",
            ));
            Ok(())
        }
        Err(StorageError::EmptyInput) => {
            Err(Notice::destructive("Nothing to save", StorageError::EmptyInput).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn handle_load(storage: &Path) -> Result<()> {
    let store = LocalStore::open(storage)?;
    let email_thread = store.saved_email().ok_or_else(|| {
        Notice::destructive("No saved email", "You haven't saved any email thread yet")
    })?;

    print!("{email_thread}");
    print_notice(&Notice::info(
        "Email thread loaded",
        "Your saved email thread has been loaded",
    ));
    Ok(())
}

pub fn handle_theme_command(args: ThemeArgs, storage: &Path) -> Result<()> {
    let mut store = LocalStore::open(storage)?;

    let theme = match args.command {
        None => store.theme(),
        Some(ThemeCommands::Light) => {
            store.set_theme(Theme::Light)?;
            Theme::Light
        }
        Some(ThemeCommands::Dark) => {
            store.set_theme(Theme::Dark)?;
            Theme::Dark
        }
        Some(ThemeCommands::Toggle) => store.toggle_theme()?,
    };

    println!("{theme}");
    Ok(())
}
