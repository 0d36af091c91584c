//! shakedeck - terminal console for redis-shake sync task servers
//!
//! This is the binary entry point. All logic lives in the library.

use clap::Parser;

use shakedeck::cli::Cli;
use shakedeck_client::user_message;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = shakedeck::run(cli).await {
        eprintln!("Error: {}", user_message(&e));
        std::process::exit(1);
    }
}
