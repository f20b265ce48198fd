use clap::Parser;

use depsort::cli::Cli;
use depsort::core::style;
use depsort::util::logging::{self, LoggingConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_logging(LoggingConfig::verbose());
    } else {
        logging::init_from_env();
    }

    if let Err(e) = cli.run().await {
        eprintln!("{}", style::error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}
