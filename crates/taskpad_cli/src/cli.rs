use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskpad", about = "Personal task list with notes and calendar")]
pub struct Cli {
    /// Path to the SQLite database [default: ~/.taskpad/taskpad.db]
    #[arg(long, env = "TASKPAD_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files [default: ~/.taskpad/logs]
    #[arg(long, env = "TASKPAD_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long, default_value = "")]
        desc: String,
        /// Person responsible
        #[arg(short, long, default_value = "")]
        assignee: String,
        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Free-form category
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// Edit a task
    Edit {
        /// Task id
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        desc: Option<String>,
        /// New assignee
        #[arg(short, long)]
        assignee: Option<String>,
        /// New priority (low, medium, high, none)
        #[arg(short, long)]
        priority: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_deadline: bool,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Flip a task between open and completed
    Toggle {
        /// Task id
        id: String,
    },

    /// Remove a task
    Rm {
        /// Task id
        id: String,
    },

    /// List tasks
    List {
        /// Completion filter (all, active, completed)
        #[arg(long, default_value = "all")]
        filter: String,
        /// Sort order as <key>-<asc|desc>; keys: createdAt, priority, assignee, deadline
        #[arg(long, default_value = "createdAt-desc")]
        sort: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the quick note of a task
    Note {
        /// Task id
        id: String,
        /// Note text, stored verbatim
        text: String,
    },

    /// Show deadlines for one month
    Calendar {
        /// Month as YYYY-MM [default: current month]
        #[arg(long)]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the core version
    Version,
}
