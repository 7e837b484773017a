//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use famcal_core::{EventFilter, Priority};

/// famcal - Family events and public holidays
#[derive(Debug, Parser)]
#[command(name = "famcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "FAMCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Country code, overriding the configured one
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Path to the store file, overriding the configured one
    #[arg(long, env = "FAMCAL_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the holidays of a country
    Holidays {
        /// Year to list (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Only holidays in this month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Show the embedded sample holidays without network access
        #[arg(long, conflicts_with = "year")]
        sample: bool,
    },

    /// Show the merged calendar (the default command)
    Calendar(CalendarArgs),

    /// List family members
    Members,

    /// Create, update or delete family events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Holiday cache commands
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show or clear the persisted log journal
    Logs {
        /// Only the most recent N entries
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Remove every entry
        #[arg(long, conflicts_with = "limit")]
        clear: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Calendar view options.
#[derive(Debug, Clone, Default, Args)]
pub struct CalendarArgs {
    /// Which events to show: all, holidays or family
    #[arg(long, default_value = "all")]
    pub filter: EventFilter,

    /// Only high-priority events
    #[arg(long, conflicts_with = "member")]
    pub high_priority: bool,

    /// Only events assigned to this member id
    #[arg(long)]
    pub member: Option<String>,
}

/// Event actions.
#[derive(Debug, Subcommand)]
pub enum EventAction {
    /// Create a family event
    Add {
        /// Event title
        title: String,

        /// Start date or timestamp (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: String,

        /// End date or timestamp
        #[arg(long)]
        end: Option<String>,

        /// Event description
        #[arg(long)]
        description: Option<String>,

        /// Assign a member id (can be repeated)
        #[arg(long = "assign", action = clap::ArgAction::Append)]
        assignees: Vec<String>,

        /// Priority: high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Member id of the creator
        #[arg(long)]
        created_by: Option<String>,
    },

    /// Update a family event
    Update {
        /// Event id
        id: String,

        /// New title (empty resets to "Untitled")
        #[arg(long)]
        title: Option<String>,

        /// New start
        #[arg(long)]
        start: Option<String>,

        /// New end (empty removes it)
        #[arg(long)]
        end: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Replace the assignees (can be repeated)
        #[arg(long = "assign", action = clap::ArgAction::Append)]
        assignees: Vec<String>,

        /// Remove every assignee
        #[arg(long, conflicts_with = "assignees")]
        unassign_all: bool,

        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// Delete a family event
    Delete {
        /// Event id
        id: String,
    },
}

/// Cache actions.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// List cached holiday keys
    Keys,
    /// Remove every cached holiday list
    Clear,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the current configuration
    Dump,
    /// Validate the configuration
    Validate,
    /// Show the configuration file path
    Path,
}
