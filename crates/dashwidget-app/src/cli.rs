//! Command line shell over the native file store.

use crate::render;
use clap::{Parser, Subcommand};
use dashwidget_core::storage::{create_default_store, FileStore};
use dashwidget_core::{
    ConfigError, Dashboard, DashboardConfig, FormError, FormField, StoreError, SubmitOutcome,
    SystemClock, WidgetId, EMPTY_STATE_MESSAGE,
};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "dashwidget")]
#[command(about = "Manage dashboard widgets and the widget draft")]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding the widget store (overrides the config).
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stat cards and every widget.
    List,
    /// Show one widget.
    Show { id: WidgetId },
    /// Delete a widget.
    Delete { id: WidgetId },
    /// Work with the creation form.
    Form {
        #[command(subcommand)]
        command: FormCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FormCommand {
    /// Print the current draft.
    Show,
    /// Set one field of the draft.
    Set { field: FormField, value: String },
    /// Create a widget from the draft.
    Submit,
    /// Discard the draft.
    Clear,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("No widget with id {0}")]
    NotFound(WidgetId),
    #[error("Widget was not created: {0}")]
    Invalid(String),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Cli {
    /// Load the config file if one was given, then apply flag overrides.
    pub fn resolve_config(&self) -> Result<DashboardConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(dir) = &self.store_dir {
            config.storage_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

/// Run one command against the configured store, writing to `out`.
pub fn run(command: &Command, config: &DashboardConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let storage = create_default_store(config.storage_dir.clone())?;
    log::debug!("Using widget store at {}", storage.base_path().display());
    let mut dashboard = Dashboard::mount(storage, config, Box::new(SystemClock));
    execute(&mut dashboard, command, out)
}

fn execute(
    dashboard: &mut Dashboard<FileStore>,
    command: &Command,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::List => {
            write!(out, "{}", render::stat_cards(dashboard.stat_cards()))?;
            writeln!(out)?;
            writeln!(out, "{}", dashboard.widget_count_label())?;
            let cards = dashboard.cards();
            if cards.is_empty() {
                writeln!(out, "{}", EMPTY_STATE_MESSAGE)?;
            }
            for card in &cards {
                writeln!(out)?;
                write!(out, "{}", render::widget_card(card))?;
            }
        }
        Command::Show { id } => {
            let card = dashboard
                .cards()
                .into_iter()
                .find(|c| c.id == *id)
                .ok_or(CliError::NotFound(*id))?;
            write!(out, "{}", render::widget_card(&card))?;
        }
        Command::Delete { id } => {
            let removed = dashboard.delete_widget(*id);
            print_signals(dashboard, out)?;
            if !removed {
                return Err(CliError::NotFound(*id));
            }
        }
        Command::Form { command } => execute_form(dashboard, command, out)?,
    }
    Ok(())
}

fn execute_form(
    dashboard: &mut Dashboard<FileStore>,
    command: &FormCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        FormCommand::Show => {
            dashboard.open_form();
            write!(out, "{}", render::form(dashboard.form()))?;
            dashboard.cancel_form();
        }
        FormCommand::Set { field, value } => {
            dashboard.open_form();
            dashboard.set_field(*field, value)?;
            write!(out, "{}", render::form(dashboard.form()))?;
            dashboard.cancel_form();
        }
        FormCommand::Submit => {
            dashboard.open_form();
            let outcome = dashboard.submit_form()?;
            match outcome {
                SubmitOutcome::Created(widget) => {
                    print_signals(dashboard, out)?;
                    if let Some(card) = dashboard.cards().into_iter().find(|c| c.id == widget.id) {
                        write!(out, "{}", render::widget_card(&card))?;
                    }
                }
                SubmitOutcome::Invalid(errors) => {
                    write!(out, "{}", render::form(dashboard.form()))?;
                    print_signals(dashboard, out)?;
                    dashboard.cancel_form();
                    let fields: Vec<String> = errors.keys().map(|f| f.label().to_string()).collect();
                    return Err(CliError::Invalid(fields.join(", ")));
                }
            }
        }
        FormCommand::Clear => {
            dashboard.clear_draft();
        }
    }
    print_signals(dashboard, out)
}

fn print_signals(dashboard: &mut Dashboard<FileStore>, out: &mut dyn Write) -> Result<(), CliError> {
    for signal in dashboard.take_signals() {
        writeln!(out, "{}", render::signal_line(&signal))?;
    }
    Ok(())
}
