use std::process;

use clap::Parser;
use tracing::error;

use wxarchive::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::run(&cli) {
        let trace = cli::error_chain(&e);
        error!("{trace}");
        eprintln!("error: {trace}");
        process::exit(1);
    }
}
