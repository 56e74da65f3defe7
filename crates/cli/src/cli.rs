use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jidanjia")]
#[command(author, version, about = "Per-episode pricing for paid Missevan audio dramas")]
pub struct Cli {
    /// Path to config file (overrides JIDANJIA_CONFIG_FILE)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze listing JSON (one object or an array) and print the records
    Analyze {
        /// Input file; reads stdin when absent or "-"
        input: Option<PathBuf>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Crawl every paid drama and export a CSV
    Crawl {
        /// Output CSV path (default: configured output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page cap (default: configured max_pages)
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Tally danmaku on paid episodes whose title contains a keyword
    Danmaku {
        /// Title keyword, matched case-insensitively
        #[arg(required = true)]
        keyword: String,

        /// Export first danmaku per user as CSV (default path: <keyword>_首次弹幕.csv)
        #[arg(long)]
        export: Option<Option<PathBuf>>,
    },

    /// Print the series title with season suffixes removed
    Title {
        /// Drama name
        #[arg(required = true)]
        name: String,
    },
}
