use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "sportfish tournament tracker backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,

        /// Tournament to track
        #[arg(short, long, default_value = "Big Rock")]
        tournament: String,

        /// Serve the demo dataset with synthetic hook-ups
        #[arg(long)]
        demo: bool,
    },
    /// Scrape all datasets for a tournament and cache them
    Refresh {
        /// Tournament to refresh
        #[arg(short, long, default_value = "Big Rock")]
        tournament: String,
    },
    /// Build the demo dataset with synthetic hook-ups injected
    Demo {
        /// Tournament to build the demo dataset for
        #[arg(short, long, default_value = "Big Rock")]
        tournament: String,
    },
}
