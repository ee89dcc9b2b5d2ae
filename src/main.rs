use anyhow::Result;
use clap::Parser;

use chat_cli::cli::Args;
use chat_cli::cli::chat::{ChatOptions, run_chat};
use chat_cli::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let options = ChatOptions {
        load: args.load,
        key: args.key,
        raw: args.raw,
        multi: args.multi,
    };
    run_chat(options).await
}
