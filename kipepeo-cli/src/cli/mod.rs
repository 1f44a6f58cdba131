#![cfg_attr(feature = "strict", deny(warnings))]

use std::path::PathBuf;

use clap::Parser;

const EXAMPLES: &str = "\
Examples:
  # Download specific models
  kipepeo-models --models 7B,34B

  # Download all models
  kipepeo-models --all

  # Preview what would be downloaded
  kipepeo-models --models 7B --dry-run

  # Custom output directory
  kipepeo-models --models 34B --output /path/to/models";

#[derive(Parser, Debug, PartialEq)]
#[command(name = "kipepeo-models")]
#[command(author, version, about = "Download Kipepeo AI models from HuggingFace", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Comma-separated list of models to download (e.g. 7B,13B,34B,70B)
    #[arg(long, value_name = "MODELS")]
    pub models: Option<String>,

    /// Download all available models
    #[arg(long)]
    pub all: bool,

    /// Output directory [default: <data dir>/kipepeo/models]
    #[arg(long, value_name = "DIR", env = "KIPEPEO_MODELS_DIR")]
    pub output: Option<PathBuf>,

    /// Simulate download without actually downloading files
    #[arg(long)]
    pub dry_run: bool,

    /// List available models and exit
    #[arg(long)]
    pub list: bool,

    /// Model catalog file
    #[arg(
        long,
        value_name = "FILE",
        env = "KIPEPEO_MODELS_CONFIG",
        default_value = "models_config.json"
    )]
    pub config: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
