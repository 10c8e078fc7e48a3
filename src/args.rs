use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shop-page")]
#[command(about = "Storefront GraphQL gateway and paginated catalog browser")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the Storefront proxy gateway
    Serve {
        /// Path to a JSON gateway configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Browse the product catalog through a running gateway
    Browse {
        /// Gateway products endpoint
        #[arg(short, long)]
        gateway_url: Option<String>,

        /// Path to a JSON view configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page to display; pages before it are walked to learn their cursors
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}
