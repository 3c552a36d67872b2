// CLI module for captiond

use clap::Parser;

/// captiond - HTTP meme captioning service with a content-addressed render cache
#[derive(Parser, Debug)]
#[command(name = "captiond", version, about, long_about = None)]
pub struct Args {
    /// Validate configuration, font, and cache directory, then exit
    #[arg(long)]
    pub check: bool,
}
