use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "ladder-league backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Apply the database schema
    Setup,
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Generate a division cycle's round-robin schedule
    Generate {
        /// Division cycle id
        #[arg(long)]
        cycle: i64,
        /// First tour's start, e.g. 2026-03-02 or 2026-03-02T18:00:00
        #[arg(long)]
        start_date: String,
        /// Booking window per tour in days (defaults from config)
        #[arg(long)]
        duration_days: Option<i64>,
    },
    /// Regenerate an existing cycle, carrying availability declarations over
    Regenerate {
        /// Division cycle id
        #[arg(long)]
        cycle: i64,
    },
}
