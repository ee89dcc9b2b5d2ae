use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chat")]
#[command(about = "Interactive terminal chat for OpenAI-compatible endpoints")]
#[command(version)]
pub struct Args {
    /// Load chat history from a file
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Environment variable holding the API key
    #[arg(long, value_name = "ENV_VAR")]
    pub key: Option<String>,

    /// Enable multi-line mode
    #[arg(short = 'm', long)]
    pub multi: bool,

    /// Enable raw mode
    #[arg(short = 'r', long)]
    pub raw: bool,
}
