use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wpwatch")]
#[command(about = "Watch WordPress sites and get notified about new posts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a site to watch
    Add {
        /// Site address, e.g. https://blog.example.com
        url: String,

        /// Display name used in notifications
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove a site (interactive selection)
    Remove,

    /// List watched sites
    List,

    /// Show or set the check interval in minutes
    Interval {
        /// New interval in minutes (at least 1)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        minutes: Option<u32>,
    },

    /// Check all sites now
    Check,

    /// Show the most recently fetched posts of each site
    Recent,

    /// Open a recently fetched post in the browser
    Open {
        /// Site number as shown by `list`
        site: usize,

        /// Post number within the site's recent list
        #[arg(short, long, default_value_t = 1)]
        item: usize,
    },

    /// Keep running and check sites on the configured interval
    Watch,

    /// Import sites from an OPML file
    Import {
        /// Path to OPML file
        path: String,
    },

    /// Export sites to OPML format
    Export {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}
