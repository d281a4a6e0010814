use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "redmine-today", version, about = "Redmine daily activity lookups")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the JSON HTTP server
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,
    },
    /// List issues a user updated today
    Today {
        /// Falls back to DEFAULT_TARGET_USER_ID
        #[arg(long)]
        user_id: Option<u64>,
        #[arg(long)]
        project_id: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Show profiles for STAFF_USER_IDS
    Users {
        #[arg(long)]
        json: bool,
    },
    /// Run one gateway event through the serverless handler
    Handle {
        /// Event JSON file; reads stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
}
