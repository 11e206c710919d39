use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk" --description "two liters"
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List tasks, optionally through a view filter
    ///
    /// Example: tasklist list pending
    /// Unrecognized filter names fall back to "all".
    List {
        filter: Option<String>,
    },
    /// Show details of a task
    ///
    /// Example: tasklist show a1b2c3
    Show {
        id: String,
    },
    /// Edit a task's fields
    ///
    /// Example: tasklist edit a1b2c3 --title "Buy organic milk"
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip a task between pending and completed
    ///
    /// Example: tasklist toggle a1b2c3
    Toggle {
        id: String,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete a1b2c3
    Delete {
        id: String,
    },
    /// Mark every task as completed
    CompleteAll,
    /// Delete every completed task
    Prune,
    /// Delete all tasks
    Clear,
    /// Show task counts
    Stats,
    /// Set the session view filter (useful in interactive mode)
    ///
    /// Example: tasklist filter pending
    Filter {
        name: String,
    },
}
