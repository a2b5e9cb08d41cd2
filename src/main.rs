use clap::Parser;
use tidydown::cli::{self, Cli};

fn main() {
    let args = Cli::parse();
    std::process::exit(cli::run(&args));
}
