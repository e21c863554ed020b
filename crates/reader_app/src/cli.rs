use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "rssreader", version, about = "Merge RSS/Atom feeds into one offline timeline")]
pub struct Cli {
    /// RON configuration file (defaults to ./rssreader.ron when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the feed cache.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Feed fetched when the cache is empty; repeat for several. Replaces the configured list.
    #[arg(long = "default-feed", global = true)]
    pub default_feeds: Vec<String>,

    /// Log debug output to the terminal as well as the log file.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Reload feeds, refetching every source with --force.
    Refresh {
        #[arg(long)]
        force: bool,
    },
    /// Subscribe to a feed.
    Add { url: String },
    /// Unsubscribe from a feed.
    Delete { url: String },
    /// List subscribed feeds.
    Feeds,
    /// Print the merged timeline, newest first.
    Timeline {
        /// Only show posts from this feed URL.
        #[arg(long)]
        feed: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Print the effective configuration as RON.
    Config,
}
